// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request/reply exchanges against a mock ptp4l.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{Behavior, MockDaemon};
use ptp_client::error::{MismatchError, MngError};
use ptp_client::DispatchOutcome;
use ptp_proto::ids::ManagementErrorId;
use ptp_proto::tlv::Priority1;
use ptp_proto::{Action, MngId, MngTlv};

const TIMEOUT_MS: u64 = 1000;

#[test]
fn test_set_then_get_priority1() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    for value in [147u8, 153] {
        let reply = session
            .set(MngTlv::Priority1(Priority1 { priority1: value }), TIMEOUT_MS)
            .unwrap();
        assert_eq!(reply, Some(&MngTlv::Priority1(Priority1 { priority1: value })));
        // The payload is dropped once sent.
        assert_eq!(session.message().action(), Action::Get);
        assert!(session.message().send_data().is_none());

        match session.get(MngId::Priority1, TIMEOUT_MS).unwrap() {
            Some(MngTlv::Priority1(p)) => assert_eq!(p.priority1, value),
            other => panic!("unexpected reply {other:?}"),
        }
    }
    assert_eq!(session.sequence(), 4);
    assert_eq!(daemon.requests(), 4);
    assert_eq!(session.message().peer().to_string(), "c47d46.fffe.20acae-1");
}

#[test]
fn test_get_user_description() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    match session.get(MngId::UserDescription, TIMEOUT_MS).unwrap() {
        Some(MngTlv::UserDescription(d)) => assert_eq!(d.user_description.as_str(), "mock;lab"),
        other => panic!("unexpected reply {other:?}"),
    }
}

#[test]
fn test_command_acknowledged_without_data() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    let reply = session.command(MngId::EnablePort, None, TIMEOUT_MS).unwrap();
    assert!(reply.is_none());
    assert_eq!(session.message().reply_action(), Action::Acknowledge);
}

#[test]
fn test_error_status_reply() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::ErrorStatus);
    let mut session = common::session_for(dir.path(), &daemon);

    let err = session.get(MngId::Priority1, TIMEOUT_MS).unwrap_err();
    match err {
        MngError::ErrorStatus { id, error, display } => {
            assert_eq!(id, MngId::Priority1);
            assert_eq!(error, ManagementErrorId::WrongValue);
            assert_eq!(display, "bad value");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_not_setable_reply() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    let err = session
        .set(
            MngTlv::Priority2(ptp_proto::tlv::Priority2 { priority2: 1 }),
            TIMEOUT_MS,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        MngError::ErrorStatus {
            error: ManagementErrorId::NotSetable,
            ..
        }
    ));
}

#[test]
fn test_sequence_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::WrongSequence);
    let mut session = common::session_for(dir.path(), &daemon);

    let err = session.get(MngId::Priority1, TIMEOUT_MS).unwrap_err();
    assert!(matches!(
        err,
        MngError::Mismatch(MismatchError::Sequence {
            expected: 1,
            received: 2
        })
    ));
}

#[test]
fn test_tlv_id_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::WrongId);
    let mut session = common::session_for(dir.path(), &daemon);

    let err = session.get(MngId::Priority1, TIMEOUT_MS).unwrap_err();
    assert!(matches!(
        err,
        MngError::Mismatch(MismatchError::TlvId {
            expected: MngId::Priority1,
            received: MngId::Priority2
        })
    ));
}

#[test]
fn test_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Silent);
    let mut session = common::session_for(dir.path(), &daemon);

    let err = session.get(MngId::Priority1, 50).unwrap_err();
    assert!(matches!(err, MngError::Timeout));
    let io_err: std::io::Error = err.into();
    assert_eq!(io_err.kind(), std::io::ErrorKind::TimedOut);
}

#[test]
fn test_dispatch_after_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    session
        .dispatcher_mut()
        .register(MngId::Priority1, move |_, tlv, id| {
            if let MngTlv::Priority1(p) = tlv {
                s.borrow_mut().push((id, p.priority1));
            }
        });

    session.get(MngId::Priority1, TIMEOUT_MS).unwrap();
    assert_eq!(session.dispatch(), DispatchOutcome::Handled(MngId::Priority1));
    assert_eq!(*seen.borrow(), vec![(MngId::Priority1, 128)]);

    session.command(MngId::EnablePort, None, TIMEOUT_MS).unwrap();
    assert_eq!(session.dispatch(), DispatchOutcome::NoTlv);
}

#[test]
fn test_build_and_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::spawn(dir.path(), Behavior::Normal);
    let mut session = common::session_for(dir.path(), &daemon);

    session
        .builder_mut()
        .register(Action::Set, MngId::Priority1, |_| {
            Some(MngTlv::Priority1(Priority1 { priority1: 99 }))
        });
    let reply = session
        .build_and_exchange(Action::Set, MngId::Priority1, TIMEOUT_MS)
        .unwrap();
    assert_eq!(reply, Some(&MngTlv::Priority1(Priority1 { priority1: 99 })));

    let err = session
        .build_and_exchange(Action::Set, MngId::Priority2, TIMEOUT_MS)
        .unwrap_err();
    assert!(matches!(err, MngError::Request { .. }));
    assert_eq!(daemon.requests(), 1);
}
