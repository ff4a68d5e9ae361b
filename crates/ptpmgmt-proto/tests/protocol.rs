// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use ptp_proto::error::err_to_str;
use ptp_proto::ids::DataSize;
use ptp_proto::protocol::{ClockIdentity, PortIdentity};
use ptp_proto::tlv::{DefaultDataSet, Priority1, SubscribeEventsNp, TimeStatusNp, events};
use ptp_proto::{Action, Buffer, Message, MngId, MngTlv, MsgParams, ParseError};

const ACTION_OFFSET: usize = 46;

// A daemon answers by echoing the request with the reply action and its data.
fn reply_to(request: &Message, buf: &Buffer, data: Option<&MngTlv>, sequence: u16) -> Vec<u8> {
    let params = MsgParams {
        self_id: PortIdentity {
            clock_identity: ClockIdentity([0xc4, 0x7d, 0x46, 0xff, 0xfe, 0x20, 0xac, 0xae]),
            port_number: 0,
        },
        ..request.params().clone()
    };
    let mut daemon = Message::with_params(params);
    let id = request.tlv_id();
    let ok = match data {
        Some(tlv) => daemon.set_action_with(Action::Set, id, tlv.clone()),
        None => daemon.set_action(Action::Get, id),
    };
    assert!(ok);
    let mut out = Buffer::new(buf.len());
    daemon.build(&mut out, sequence).unwrap();
    let mut bytes = out.as_slice()[..daemon.msg_len()].to_vec();
    bytes[ACTION_OFFSET] = Action::Response as u8;
    bytes
}

#[test]
fn test_priority1_set_then_get_roundtrip() {
    let mut buf = Buffer::new(1000);
    for value in [147u8, 153] {
        let mut msg = Message::new();
        let tlv = MngTlv::Priority1(Priority1 { priority1: value });
        assert!(msg.set_action_with(Action::Set, MngId::Priority1, tlv.clone()));
        msg.build(&mut buf, 10).unwrap();
        msg.clear_data();
        assert_eq!(msg.action(), Action::Get);

        let rsp = reply_to(&msg, &buf, Some(&tlv), 10);
        msg.parse_bytes(&rsp).unwrap();
        assert_eq!(msg.tlv_id(), MngId::Priority1);
        assert_eq!(msg.sequence(), 10);
        match msg.data() {
            Some(MngTlv::Priority1(p)) => assert_eq!(p.priority1, value),
            other => panic!("unexpected reply data {other:?}"),
        }
        assert_eq!(msg.peer().to_string(), "c47d46.fffe.20acae-0");
    }
}

#[test]
fn test_time_status_np_reply() {
    let mut msg = Message::new();
    assert!(msg.set_action(Action::Get, MngId::TimeStatusNp));
    let mut buf = Buffer::new(1000);
    msg.build(&mut buf, 2).unwrap();
    let status = MngTlv::TimeStatusNp(TimeStatusNp {
        master_offset: -42,
        gm_present: 1,
        gm_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
        ..TimeStatusNp::default()
    });
    // TIME_STATUS_NP is not settable, so patch the data in behind a GET reply.
    let mut rsp = reply_to(&msg, &buf, None, 2);
    let data = status.to_vec().unwrap();
    let length = 2 + data.len() as u16;
    rsp[50..52].copy_from_slice(&length.to_be_bytes());
    rsp.extend_from_slice(&data);
    let total = rsp.len() as u16;
    rsp[2..4].copy_from_slice(&total.to_be_bytes());

    msg.parse_bytes(&rsp).unwrap();
    assert_eq!(msg.data(), Some(&status));
}

#[test]
fn test_default_data_set_is_get_only() {
    let mut msg = Message::new();
    assert!(msg.set_action(Action::Get, MngId::DefaultDataSet));
    let ds = MngTlv::DefaultDataSet(DefaultDataSet::default());
    assert!(!msg.set_action_with(Action::Set, MngId::DefaultDataSet, ds));
    assert_eq!(MngId::DefaultDataSet.data_size(), DataSize::Fixed(20));
}

#[test]
fn test_subscribe_events_np_build() {
    let mut ev = SubscribeEventsNp::default();
    ev.duration = 60;
    ev.set_event(events::NOTIFY_PORT_STATE);
    ev.set_event(events::NOTIFY_TIME_SYNC);
    let mut msg = Message::new();
    assert!(msg.set_action_with(
        Action::Set,
        MngId::SubscribeEventsNp,
        MngTlv::SubscribeEventsNp(ev)
    ));
    let mut buf = Buffer::new(1000);
    msg.build(&mut buf, 1).unwrap();
    assert_eq!(msg.msg_len(), 54 + 66);
    assert_eq!(&buf.as_slice()[54..57], &[0, 60, 0b11]);
}

#[test]
fn test_error_strings() {
    assert_eq!(err_to_str(Ok(())), "MNG_PARSE_ERROR_OK");
    assert_eq!(err_to_str(Err(ParseError::InvalidId)), "MNG_PARSE_ERROR_INVALID_ID");
    let io_err: std::io::Error = ParseError::Header.into();
    assert_eq!(io_err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn test_build_respects_buffer_capacity() {
    let mut msg = Message::new();
    assert!(msg.set_action(Action::Get, MngId::UserDescription));
    let mut small = Buffer::new(53);
    assert_eq!(msg.build(&mut small, 1), Err(ParseError::TooSmall));
    let mut exact = Buffer::new(54);
    assert_eq!(msg.build(&mut exact, 1), Ok(()));
}

#[test]
fn test_parse_len_beyond_buffer_is_too_small() {
    let mut msg = Message::new();
    let buf = Buffer::new(60);
    assert_eq!(msg.parse(&buf, 61), Err(ParseError::TooSmall));
}
