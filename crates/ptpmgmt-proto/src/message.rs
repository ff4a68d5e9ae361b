// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The management message: request building and reply parsing.
//!
//! A [`Message`] holds the parameters of one management conversation. The
//! caller picks an action and ID with [`Message::set_action`], serializes into
//! a [`Buffer`] with [`Message::build`], and feeds received datagrams to
//! [`Message::parse`]. The sequence number is always supplied by the caller.
//!
//! Wire layout of a management message:
//!
//! ```text
//!  0                   1                   2                   3
//! +---------------+---------------+-------------------------------+
//! | tsp | msgType |  ver (min|maj)|         messageLength         |
//! +---------------+---------------+-------------------------------+
//! | domainNumber  |  minorSdoId   |           flagField           |
//! +---------------+---------------+-------------------------------+
//! |                  correctionField (8 octets)                   |
//! +---------------------------------------------------------------+
//! |                  messageTypeSpecific (4 octets)               |
//! +---------------------------------------------------------------+
//! |                sourcePortIdentity (10 octets)                 |
//! +-------------------------------+---------------+---------------+
//! |          sequenceId           | controlField  | logMsgInterval|
//! +-------------------------------+---------------+---------------+
//! |                targetPortIdentity (10 octets)                 |
//! +---------------+---------------+---------------+---------------+
//! | startBHops    | boundaryHops  | actionField   |   reserved    |
//! +---------------+---------------+---------------+---------------+
//! |            tlvType            |          lengthField          |
//! +-------------------------------+-------------------------------+
//! |         managementId          |   dataField (even length) ... |
//! +-------------------------------+-------------------------------+
//! ```

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::{self, Cursor, Write};

use crate::error::ParseError;
use crate::ids::{Action, DataSize, ImplementSpecific, ManagementErrorId, MngId};
use crate::protocol::{
    PortIdentity, PtpText, ReadBytes, WriteBytes, PTP_MAJOR_VERSION, PTP_MINOR_VERSION,
};
use crate::tlv::MngTlv;

/// Size of the common PTP header.
pub const HEADER_SIZE: usize = 34;

/// Size of a management message up to and including the TLV header.
pub const MNG_MSG_BASE_SIZE: usize = 54;

/// Size of a signaling message header, the smallest datagram worth parsing.
const SIG_BASE_SIZE: usize = 44;

/// Size of the management message fields before the TLV.
const MNG_HEADER_SIZE: usize = 48;

/// Bytes the lengthField counts beyond the dataField (the managementId).
const LENGTH_FIELD_MNG_BASE: usize = 2;

/// Size of the error status TLV body without the display text.
const ERROR_TLV_BASE: usize = 8;

const MSG_TYPE_SIGNALING: u8 = 0xc;
const MSG_TYPE_MANAGEMENT: u8 = 0xd;
const CONTROL_FIELD_MANAGEMENT: u8 = 0x04;
const LOG_MESSAGE_INTERVAL: u8 = 0x7f;
const FLAG_UNICAST: u8 = 0x04;

/// TLV type of a management TLV.
pub const TLV_MANAGEMENT: u16 = 0x0001;

/// TLV type of a management error status TLV.
pub const TLV_MANAGEMENT_ERROR_STATUS: u16 = 0x0002;

/// A byte buffer with a fixed capacity, allocated once.
///
/// Build and parse work inside the buffer and never grow it.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Allocates a zeroed buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Buffer {
            data: vec![0; capacity],
        }
    }

    /// True when the buffer has a non-zero capacity.
    pub fn is_alloc(&self) -> bool {
        !self.data.is_empty()
    }

    /// Capacity in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the capacity is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The whole buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Parameters shared by every message built from one [`Message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgParams {
    /// transportSpecific, sent in the high nibble of the first octet.
    pub transport_specific: u8,
    /// PTP domain number.
    pub domain_number: u8,
    /// startingBoundaryHops and boundaryHops.
    pub boundary_hops: u8,
    /// Minor PTP version sent.
    pub minor_version: u8,
    /// minorSdoId sent.
    pub minor_sdo_id: u8,
    /// Set the unicast flag.
    pub is_unicast: bool,
    /// Vendor extensions to accept.
    pub implement_specific: ImplementSpecific,
    /// Port the request is addressed to.
    pub target: PortIdentity,
    /// Our own port identity.
    pub self_id: PortIdentity,
    /// Send GET requests without a dataField.
    ///
    /// When false a GET carries a zero-filled dataField of the ID's size.
    pub use_zero_get: bool,
}

impl Default for MsgParams {
    fn default() -> Self {
        MsgParams {
            transport_specific: 0,
            domain_number: 0,
            boundary_hops: 1,
            minor_version: PTP_MINOR_VERSION,
            minor_sdo_id: 0,
            is_unicast: true,
            implement_specific: ImplementSpecific::Linuxptp,
            target: PortIdentity::ALL,
            self_id: PortIdentity::default(),
            use_zero_get: true,
        }
    }
}

/// State of one management conversation: the request to send and the last parsed reply.
#[derive(Clone, Debug)]
pub struct Message {
    params: MsgParams,
    send_action: Action,
    tlv_id: MngId,
    send_data: Option<MngTlv>,
    msg_len: usize,
    reply_action: Action,
    sequence: u16,
    peer: PortIdentity,
    target: PortIdentity,
    domain_number: u8,
    version_ptp: u8,
    minor_version_ptp: u8,
    sdo_id: u16,
    is_unicast: bool,
    reply_data: Option<MngTlv>,
    error_id: Option<ManagementErrorId>,
    error_display: PtpText,
}

impl Default for Message {
    fn default() -> Self {
        Message::with_params(MsgParams::default())
    }
}

impl Message {
    /// Creates a message with default parameters.
    pub fn new() -> Self {
        Message::default()
    }

    /// Creates a message with the given parameters.
    pub fn with_params(params: MsgParams) -> Self {
        Message {
            params,
            send_action: Action::Get,
            tlv_id: MngId::NullPtpManagement,
            send_data: None,
            msg_len: 0,
            reply_action: Action::Response,
            sequence: 0,
            peer: PortIdentity::default(),
            target: PortIdentity::default(),
            domain_number: 0,
            version_ptp: 0,
            minor_version_ptp: 0,
            sdo_id: 0,
            is_unicast: true,
            reply_data: None,
            error_id: None,
            error_display: PtpText::default(),
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &MsgParams {
        &self.params
    }

    /// Replaces the parameters. Rejects a transportSpecific above 15.
    pub fn update_params(&mut self, params: MsgParams) -> bool {
        if params.transport_specific > 0xf || params.minor_version > 0xf {
            return false;
        }
        self.params = params;
        true
    }

    /// True when `id` never carries a dataField.
    pub fn is_empty(id: MngId) -> bool {
        id.is_empty_data()
    }

    fn allowed_action(&self, action: Action, id: MngId) -> bool {
        if !matches!(action, Action::Get | Action::Set | Action::Command) {
            return false;
        }
        if id.is_linuxptp() && self.params.implement_specific != ImplementSpecific::Linuxptp {
            return false;
        }
        id.allows(action)
    }

    fn needs_data(action: Action, id: MngId) -> bool {
        id != MngId::NullPtpManagement && action != Action::Get && !id.is_empty_data()
    }

    /// Selects the action and ID of the next request, without a payload.
    ///
    /// Fails when the action is not allowed for the ID, or when a SET or
    /// COMMAND on this ID requires a payload.
    pub fn set_action(&mut self, action: Action, id: MngId) -> bool {
        if !self.allowed_action(action, id) || Message::needs_data(action, id) {
            return false;
        }
        self.send_action = action;
        self.tlv_id = id;
        self.send_data = None;
        true
    }

    /// Selects the action and ID of the next request, with its payload.
    ///
    /// The payload is dropped for actions that do not carry one. It must
    /// belong to `id`.
    pub fn set_action_with(&mut self, action: Action, id: MngId, data: MngTlv) -> bool {
        if !self.allowed_action(action, id) {
            return false;
        }
        if Message::needs_data(action, id) {
            if data.id() != id {
                return false;
            }
            self.send_data = Some(data);
        } else {
            self.send_data = None;
        }
        self.send_action = action;
        self.tlv_id = id;
        true
    }

    /// Drops the payload of the pending request.
    ///
    /// A SET or COMMAND cannot be sent without its payload, so the action
    /// falls back to GET.
    pub fn clear_data(&mut self) {
        if self.send_data.take().is_some() {
            self.send_action = Action::Get;
        }
    }

    /// Action of the pending request.
    pub fn action(&self) -> Action {
        self.send_action
    }

    /// Payload of the pending request.
    pub fn send_data(&self) -> Option<&MngTlv> {
        self.send_data.as_ref()
    }

    fn data_field(&self) -> Result<Vec<u8>, ParseError> {
        let mut data = match (&self.send_data, self.send_action) {
            (Some(tlv), action) if action != Action::Get => tlv.to_vec()?,
            (_, Action::Get) if !self.params.use_zero_get => match self.tlv_id.data_size() {
                DataSize::Fixed(n) => vec![0; n as usize],
                DataSize::Variable | DataSize::Empty => Vec::new(),
            },
            _ => Vec::new(),
        };
        if data.len() % 2 != 0 {
            data.push(0);
        }
        Ok(data)
    }

    /// Size the next [`build`](Message::build) would produce.
    pub fn planned_len(&self) -> Result<usize, ParseError> {
        Ok(MNG_MSG_BASE_SIZE + self.data_field()?.len())
    }

    /// Size of the last built message.
    pub fn msg_len(&self) -> usize {
        self.msg_len
    }

    /// Serializes the pending request into `buf` with sequence number `sequence`.
    pub fn build(&mut self, buf: &mut Buffer, sequence: u16) -> Result<(), ParseError> {
        self.build_into(buf.as_mut_slice(), sequence)
    }

    /// Serializes the pending request into a raw slice.
    pub fn build_into(&mut self, buf: &mut [u8], sequence: u16) -> Result<(), ParseError> {
        if buf.len() < MNG_MSG_BASE_SIZE {
            return Err(ParseError::TooSmall);
        }
        let data = self.data_field()?;
        let size = MNG_MSG_BASE_SIZE + data.len();
        if size > buf.len() {
            return Err(ParseError::TooSmall);
        }
        if size % 2 != 0 {
            return Err(ParseError::Size);
        }
        // messageLength and lengthField are both 16 bits wide.
        let msg_length = u16::try_from(size).map_err(|_| ParseError::Size)?;
        let tlv_length =
            u16::try_from(LENGTH_FIELD_MNG_BASE + data.len()).map_err(|_| ParseError::Size)?;
        let p = &self.params;
        let mut flags = [0u8; 2];
        if p.is_unicast {
            flags[0] |= FLAG_UNICAST;
        }
        let mut w = Cursor::new(&mut buf[..size]);
        let res: io::Result<()> = (|| {
            w.write_u8((p.transport_specific << 4) | MSG_TYPE_MANAGEMENT)?;
            w.write_u8((p.minor_version << 4) | PTP_MAJOR_VERSION)?;
            w.write_u16::<BE>(msg_length)?;
            w.write_u8(p.domain_number)?;
            w.write_u8(p.minor_sdo_id)?;
            w.write_all(&flags)?;
            w.write_i64::<BE>(0)?; // correctionField
            w.write_u32::<BE>(0)?; // messageTypeSpecific
            w.write_bytes(p.self_id)?;
            w.write_u16::<BE>(sequence)?;
            w.write_u8(CONTROL_FIELD_MANAGEMENT)?;
            w.write_u8(LOG_MESSAGE_INTERVAL)?;
            w.write_bytes(p.target)?;
            w.write_u8(p.boundary_hops)?;
            w.write_u8(p.boundary_hops)?;
            w.write_u8(self.send_action as u8)?;
            w.write_u8(0)?;
            w.write_u16::<BE>(TLV_MANAGEMENT)?;
            w.write_u16::<BE>(tlv_length)?;
            w.write_u16::<BE>(self.tlv_id.value())?;
            w.write_all(&data)?;
            Ok(())
        })();
        res.map_err(|e| ParseError::from_io(&e))?;
        self.msg_len = size;
        Ok(())
    }

    fn check_reply_action(&self, action: Action) -> bool {
        match action {
            Action::Acknowledge => self.tlv_id.allows(Action::Command),
            Action::Response => {
                self.tlv_id.allows(Action::Get) || self.tlv_id.allows(Action::Set)
            }
            _ => false,
        }
    }

    /// Parses the first `len` bytes of `buf` as a reply.
    pub fn parse(&mut self, buf: &Buffer, len: usize) -> Result<(), ParseError> {
        if len > buf.len() {
            return Err(ParseError::TooSmall);
        }
        self.parse_bytes(&buf.as_slice()[..len])
    }

    /// Parses a received datagram.
    ///
    /// On success the reply fields and the optional payload are available
    /// through the getters. A management error status reply returns
    /// [`ParseError::Msg`] with [`error_id`](Message::error_id) and
    /// [`error_display`](Message::error_display) filled in.
    pub fn parse_bytes(&mut self, msg: &[u8]) -> Result<(), ParseError> {
        if msg.len() < SIG_BASE_SIZE {
            return Err(ParseError::TooSmall);
        }
        match msg[0] & 0xf {
            MSG_TYPE_MANAGEMENT => {}
            MSG_TYPE_SIGNALING => return Err(ParseError::Signaling),
            _ => return Err(ParseError::Header),
        }
        if msg.len() < MNG_MSG_BASE_SIZE {
            return Err(ParseError::TooSmall);
        }
        self.reply_data = None;
        self.error_id = None;
        self.error_display = PtpText::default();
        self.parse_management(msg)
            .map_err(|e| e.unwrap_or(ParseError::TooSmall))
    }

    // `Err(None)` marks a read past the end of the datagram.
    fn parse_management(&mut self, msg: &[u8]) -> Result<(), Option<ParseError>> {
        let mut r = Cursor::new(msg);
        let eof = |_: io::Error| -> Option<ParseError> { None };
        let type_sdo = r.read_u8().map_err(eof)?;
        let version = r.read_u8().map_err(eof)?;
        let _message_length = r.read_u16::<BE>().map_err(eof)?;
        let domain_number = r.read_u8().map_err(eof)?;
        let minor_sdo_id = r.read_u8().map_err(eof)?;
        let flag0 = r.read_u8().map_err(eof)?;
        let _flag1 = r.read_u8().map_err(eof)?;
        let _correction = r.read_i64::<BE>().map_err(eof)?;
        let _type_specific = r.read_u32::<BE>().map_err(eof)?;
        let peer: PortIdentity = r.read_bytes().map_err(eof)?;
        let sequence = r.read_u16::<BE>().map_err(eof)?;
        let control = r.read_u8().map_err(eof)?;
        let log_interval = r.read_u8().map_err(eof)?;
        if control != CONTROL_FIELD_MANAGEMENT {
            return Err(Some(ParseError::Header));
        }
        if version & 0xf != PTP_MAJOR_VERSION || log_interval != LOG_MESSAGE_INTERVAL {
            return Err(Some(ParseError::Header));
        }
        self.version_ptp = version & 0xf;
        self.minor_version_ptp = version >> 4;
        self.sdo_id = ((type_sdo as u16 & 0xf0) << 4) | minor_sdo_id as u16;
        self.domain_number = domain_number;
        self.is_unicast = flag0 & FLAG_UNICAST != 0;
        self.sequence = sequence;
        self.peer = peer;
        self.target = r.read_bytes().map_err(eof)?;
        let _starting_hops = r.read_u8().map_err(eof)?;
        let _hops = r.read_u8().map_err(eof)?;
        let action_field = r.read_u8().map_err(eof)? & 0xf;
        let _reserved = r.read_u8().map_err(eof)?;
        let action = match Action::try_from(action_field) {
            Ok(a @ (Action::Response | Action::Acknowledge)) => a,
            _ => return Err(Some(ParseError::Action)),
        };
        self.reply_action = action;
        let tlv_type = r.read_u16::<BE>().map_err(eof)?;
        let length_field = r.read_u16::<BE>().map_err(eof)? as usize;
        // Bytes after the TLV header.
        let size = msg.len() - MNG_HEADER_SIZE - 4;
        let implement = self.params.implement_specific;
        match tlv_type {
            TLV_MANAGEMENT_ERROR_STATUS => {
                if size < ERROR_TLV_BASE {
                    return Err(Some(ParseError::TooSmall));
                }
                let error_id = r.read_u16::<BE>().map_err(eof)?;
                let id_value = r.read_u16::<BE>().map_err(eof)?;
                let _reserved = r.read_u32::<BE>().map_err(eof)?;
                self.tlv_id =
                    MngId::from_value(id_value, implement).ok_or(Some(ParseError::InvalidId))?;
                if !self.check_reply_action(action) {
                    return Err(Some(ParseError::Action));
                }
                self.error_id = Some(ManagementErrorId::from(error_id));
                if length_field < ERROR_TLV_BASE || length_field % 2 != 0 {
                    return Err(Some(ParseError::TooSmall));
                }
                let left = length_field - ERROR_TLV_BASE;
                if size - ERROR_TLV_BASE < left {
                    return Err(Some(ParseError::TooSmall));
                }
                if left > 1 {
                    self.error_display = r.read_bytes().map_err(eof)?;
                }
                Err(Some(ParseError::Msg))
            }
            TLV_MANAGEMENT => {
                let id_value = r.read_u16::<BE>().map_err(eof)?;
                self.tlv_id =
                    MngId::from_value(id_value, implement).ok_or(Some(ParseError::InvalidId))?;
                if !self.check_reply_action(action) {
                    return Err(Some(ParseError::Action));
                }
                if length_field < LENGTH_FIELD_MNG_BASE || length_field % 2 != 0 {
                    return Err(Some(ParseError::TooSmall));
                }
                let left = length_field - LENGTH_FIELD_MNG_BASE;
                if left == 0 {
                    return Ok(());
                }
                if size - LENGTH_FIELD_MNG_BASE < left {
                    return Err(Some(ParseError::TooSmall));
                }
                let start = MNG_MSG_BASE_SIZE;
                let tlv = MngTlv::decode(self.tlv_id, &msg[start..start + left]).map_err(Some)?;
                self.reply_data = Some(tlv);
                Ok(())
            }
            _ => Err(Some(ParseError::InvalidTlv)),
        }
    }

    /// Management ID of the pending request, or of the last parsed reply.
    pub fn tlv_id(&self) -> MngId {
        self.tlv_id
    }

    /// Sequence number of the last parsed reply.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Action of the last parsed reply.
    pub fn reply_action(&self) -> Action {
        self.reply_action
    }

    /// Source port of the last parsed reply.
    pub fn peer(&self) -> PortIdentity {
        self.peer
    }

    /// Target port of the last parsed reply.
    pub fn target(&self) -> PortIdentity {
        self.target
    }

    /// Payload of the last parsed reply, if it had one.
    pub fn data(&self) -> Option<&MngTlv> {
        self.reply_data.as_ref()
    }

    /// Error code of the last error status reply.
    pub fn error_id(&self) -> Option<ManagementErrorId> {
        self.error_id
    }

    /// Display text of the last error status reply.
    pub fn error_display(&self) -> &str {
        self.error_display.as_str()
    }

    /// Unicast flag of the last parsed reply.
    pub fn is_unicast(&self) -> bool {
        self.is_unicast
    }

    /// Domain of the last parsed reply.
    pub fn domain_number(&self) -> u8 {
        self.domain_number
    }

    /// Major PTP version of the last parsed reply.
    pub fn version_ptp(&self) -> u8 {
        self.version_ptp
    }

    /// Minor PTP version of the last parsed reply.
    pub fn minor_version_ptp(&self) -> u8 {
        self.minor_version_ptp
    }

    /// sdoId of the last parsed reply: majorSdoId in bits 8..12, minorSdoId below.
    pub fn sdo_id(&self) -> u16 {
        self.sdo_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ClockIdentity;
    use crate::tlv::{PathTraceList, Priority1, UserDescription};

    // Turns a built request into the reply a daemon would send.
    fn as_response(req: &[u8], action: Action) -> Vec<u8> {
        let mut rsp = req.to_vec();
        rsp[46] = action as u8;
        rsp
    }

    #[test]
    fn test_default_params() {
        let p = MsgParams::default();
        assert_eq!(p.boundary_hops, 1);
        assert!(p.is_unicast);
        assert!(p.use_zero_get);
        assert_eq!(p.target, PortIdentity::ALL);
        assert_eq!(p.implement_specific, ImplementSpecific::Linuxptp);
    }

    #[test]
    fn test_buffer_alloc() {
        assert!(!Buffer::new(0).is_alloc());
        let b = Buffer::new(1000);
        assert!(b.is_alloc());
        assert_eq!(b.len(), 1000);
    }

    #[test]
    fn test_build_get_header() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 7).unwrap();
        assert_eq!(msg.msg_len(), MNG_MSG_BASE_SIZE);
        let b = buf.as_slice();
        assert_eq!(b[0], 0x0d);
        assert_eq!(b[1], 0x02);
        assert_eq!(&b[2..4], &[0, 54]);
        assert_eq!(b[6], FLAG_UNICAST);
        assert_eq!(&b[30..32], &[0, 7]);
        assert_eq!(b[32], CONTROL_FIELD_MANAGEMENT);
        assert_eq!(b[33], LOG_MESSAGE_INTERVAL);
        assert_eq!(&b[34..44], &[0xff; 10]);
        assert_eq!(b[44], 1);
        assert_eq!(b[45], 1);
        assert_eq!(b[46], Action::Get as u8);
        assert_eq!(&b[48..50], &[0, 1]);
        assert_eq!(&b[50..52], &[0, 2]);
        assert_eq!(&b[52..54], &[0x20, 0x05]);
    }

    #[test]
    fn test_build_set_pads_to_even() {
        let mut msg = Message::new();
        let tlv = MngTlv::Priority1(Priority1 { priority1: 147 });
        assert!(msg.set_action_with(Action::Set, MngId::Priority1, tlv));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        assert_eq!(msg.msg_len(), 56);
        let b = buf.as_slice();
        assert_eq!(&b[50..52], &[0, 4]);
        assert_eq!(b[54], 147);
        assert_eq!(b[55], 0);
    }

    #[test]
    fn test_build_zero_get() {
        let params = MsgParams {
            use_zero_get: false,
            ..MsgParams::default()
        };
        let mut msg = Message::with_params(params);
        assert!(msg.set_action(Action::Get, MngId::DefaultDataSet));
        assert_eq!(msg.planned_len().unwrap(), MNG_MSG_BASE_SIZE + 20);
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        assert_eq!(msg.msg_len(), MNG_MSG_BASE_SIZE + 20);
    }

    #[test]
    fn test_build_buffer_too_small() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(20);
        assert_eq!(msg.build(&mut buf, 1), Err(ParseError::TooSmall));
    }

    #[test]
    fn test_build_length_beyond_u16_is_size_error() {
        let mut msg = Message::new();
        // 8200 identities make a 65600 byte dataField.
        let path = PathTraceList {
            path_sequence: vec![ClockIdentity([0x11; 8]); 8200],
        };
        msg.send_data = Some(MngTlv::PathTraceList(path));
        msg.send_action = Action::Set;
        msg.tlv_id = MngId::PathTraceList;
        let mut buf = Buffer::new(70_000);
        assert_eq!(msg.build(&mut buf, 1), Err(ParseError::Size));
        assert_eq!(msg.msg_len(), 0);
        // Nothing was written.
        assert!(buf.as_slice()[..MNG_MSG_BASE_SIZE].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_action_rules() {
        let mut msg = Message::new();
        // SET needs a payload.
        assert!(!msg.set_action(Action::Set, MngId::Priority1));
        // Not settable.
        let tlv = MngTlv::Priority1(Priority1 { priority1: 1 });
        assert!(!msg.set_action_with(Action::Set, MngId::DefaultDataSet, tlv.clone()));
        // Payload of another ID.
        assert!(!msg.set_action_with(Action::Set, MngId::Priority2, tlv));
        // Reply actions are never sent.
        assert!(!msg.set_action(Action::Response, MngId::Priority1));
        // Commands without data.
        assert!(msg.set_action(Action::Command, MngId::EnablePort));
        assert!(!msg.set_action(Action::Get, MngId::EnablePort));
    }

    #[test]
    fn test_linuxptp_id_needs_vendor() {
        let params = MsgParams {
            implement_specific: ImplementSpecific::NoImplementSpecific,
            ..MsgParams::default()
        };
        let mut msg = Message::with_params(params);
        assert!(!msg.set_action(Action::Get, MngId::TimeStatusNp));
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::TimeStatusNp));
    }

    #[test]
    fn test_clear_data_resets_to_get() {
        let mut msg = Message::new();
        let tlv = MngTlv::Priority1(Priority1 { priority1: 153 });
        assert!(msg.set_action_with(Action::Set, MngId::Priority1, tlv));
        msg.clear_data();
        assert_eq!(msg.action(), Action::Get);
        assert!(msg.send_data().is_none());
        // Nothing to clear leaves the action alone.
        assert!(msg.set_action(Action::Command, MngId::EnablePort));
        msg.clear_data();
        assert_eq!(msg.action(), Action::Command);
    }

    #[test]
    fn test_parse_response_with_data() {
        let mut msg = Message::new();
        let tlv = MngTlv::Priority1(Priority1 { priority1: 147 });
        assert!(msg.set_action_with(Action::Set, MngId::Priority1, tlv.clone()));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 42).unwrap();
        let rsp = as_response(&buf.as_slice()[..msg.msg_len()], Action::Response);

        let mut reply = Message::new();
        reply.parse_bytes(&rsp).unwrap();
        assert_eq!(reply.tlv_id(), MngId::Priority1);
        assert_eq!(reply.sequence(), 42);
        assert_eq!(reply.reply_action(), Action::Response);
        assert_eq!(reply.data(), Some(&tlv));
        assert!(reply.is_unicast());
        assert_eq!(reply.version_ptp(), 2);
    }

    #[test]
    fn test_parse_user_description() {
        let mut msg = Message::new();
        let tlv = MngTlv::UserDescription(UserDescription {
            user_description: PtpText::from("clock;lab"),
        });
        assert!(msg.set_action_with(Action::Set, MngId::UserDescription, tlv.clone()));
        let mut buf = Buffer::new(200);
        msg.build(&mut buf, 3).unwrap();
        assert_eq!(msg.msg_len() % 2, 0);
        let rsp = as_response(&buf.as_slice()[..msg.msg_len()], Action::Response);
        let mut reply = Message::new();
        reply.parse(&Buffer::new(0), 0).unwrap_err();
        reply.parse_bytes(&rsp).unwrap();
        assert_eq!(reply.data(), Some(&tlv));
    }

    #[test]
    fn test_parse_rejects_request_action() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        let mut reply = Message::new();
        assert_eq!(
            reply.parse(&buf, msg.msg_len()),
            Err(ParseError::Action)
        );
    }

    #[test]
    fn test_parse_acknowledge_needs_command() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        let ack = as_response(&buf.as_slice()[..msg.msg_len()], Action::Acknowledge);
        let mut reply = Message::new();
        assert_eq!(reply.parse_bytes(&ack), Err(ParseError::Action));
    }

    #[test]
    fn test_parse_header_checks() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        let good = as_response(&buf.as_slice()[..msg.msg_len()], Action::Response);
        let mut reply = Message::new();

        let mut bad = good.clone();
        bad[32] = 0;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::Header));

        let mut bad = good.clone();
        bad[1] = 0x01;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::Header));

        let mut bad = good.clone();
        bad[33] = 0;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::Header));

        let mut bad = good.clone();
        bad[0] = 0x0c;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::Signaling));

        let mut bad = good.clone();
        bad[0] = 0x00;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::Header));

        assert_eq!(reply.parse_bytes(&good[..40]), Err(ParseError::TooSmall));
        assert_eq!(reply.parse_bytes(&good[..50]), Err(ParseError::TooSmall));
    }

    #[test]
    fn test_parse_tlv_checks() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 1).unwrap();
        let good = as_response(&buf.as_slice()[..msg.msg_len()], Action::Response);
        let mut reply = Message::new();
        assert_eq!(reply.parse_bytes(&good), Ok(()));
        assert!(reply.data().is_none());

        let mut bad = good.clone();
        bad[49] = 3;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::InvalidTlv));

        let mut bad = good.clone();
        bad[52] = 0x12;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::InvalidId));

        let mut bad = good.clone();
        bad[51] = 3;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::TooSmall));

        // lengthField claims data the datagram does not have.
        let mut bad = good.clone();
        bad[51] = 4;
        assert_eq!(reply.parse_bytes(&bad), Err(ParseError::TooSmall));
    }

    #[test]
    fn test_parse_error_status() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        let mut buf = Buffer::new(100);
        msg.build(&mut buf, 9).unwrap();
        let mut rsp = as_response(&buf.as_slice()[..MNG_HEADER_SIZE], Action::Response);
        rsp.extend_from_slice(&TLV_MANAGEMENT_ERROR_STATUS.to_be_bytes());
        // errorId, managementId, reserved, "bad" display text, pad.
        let body: Vec<u8> = [
            &0x0005u16.to_be_bytes()[..],
            &0x2005u16.to_be_bytes()[..],
            &[0, 0, 0, 0],
            &[3, b'b', b'a', b'd'],
        ]
        .concat();
        rsp.extend_from_slice(&(body.len() as u16).to_be_bytes());
        rsp.extend_from_slice(&body);

        let mut reply = Message::new();
        assert_eq!(reply.parse_bytes(&rsp), Err(ParseError::Msg));
        assert_eq!(reply.error_id(), Some(ManagementErrorId::NotSetable));
        assert_eq!(reply.error_display(), "bad");
        assert_eq!(reply.tlv_id(), MngId::Priority1);
        assert_eq!(reply.sequence(), 9);
    }
}
