// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request/reply exchange with a local PTP daemon.
//!
//! A [`Session`] bundles everything one management client needs: the Unix
//! socket, the message state, a reusable buffer, the sequence counter, and the
//! dispatch and build tables. Each exchange follows the same path:
//!
//! 1. select the action and ID (and payload) on the message;
//! 2. take the next sequence number and build into the buffer;
//! 3. send, then drop the payload so a later GET does not resend it;
//! 4. poll for the reply with a timeout, receive and parse it;
//! 5. accept the reply only if its TLV ID and sequence match the request.
//!
//! # Example
//!
//! ```no_run
//! use ptp_client::{ConfigFile, Session};
//! use ptp_proto::tlv::Priority1;
//! use ptp_proto::{MngId, MngTlv};
//!
//! let cfg = ConfigFile::read(ptp_client::DEFAULT_CONFIG_FILE)?;
//! let mut session = Session::open(&cfg, None)?;
//! session.set(MngTlv::Priority1(Priority1 { priority1: 147 }), 500)?;
//! if let Some(MngTlv::Priority1(p)) = session.get(MngId::Priority1, 500)? {
//!     println!("priority1 {}", p.priority1);
//! }
//! # Ok::<(), ptp_client::error::MngError>(())
//! ```

use log::debug;
use ptp_proto::ids::ManagementErrorId;
use ptp_proto::{Action, Buffer, Message, MngId, MngTlv, ParseError};

use crate::builder::Builder;
use crate::config::ConfigFile;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::{MismatchError, MngError};
use crate::sequence::SequenceCounter;
use crate::sock::SockUnix;

/// Size of the session's message buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Apply config file values to a message.
pub trait MessageConfigExt {
    /// Copy `transportSpecific` and `domainNumber` from `cfg` into the message
    /// parameters. Returns false if the message rejects them.
    fn use_config(&mut self, cfg: &ConfigFile, section: Option<&str>) -> bool;
}

impl MessageConfigExt for Message {
    fn use_config(&mut self, cfg: &ConfigFile, section: Option<&str>) -> bool {
        let mut params = self.params().clone();
        params.transport_specific = cfg.transport_specific(section);
        params.domain_number = cfg.domain_number(section);
        self.update_params(params)
    }
}

/// Check that a parsed reply answers the request sent as `id` with `sequence`.
pub fn validate_reply(msg: &Message, id: MngId, sequence: u16) -> Result<(), MismatchError> {
    if msg.tlv_id() != id {
        return Err(MismatchError::TlvId {
            expected: id,
            received: msg.tlv_id(),
        });
    }
    if msg.sequence() != sequence {
        return Err(MismatchError::Sequence {
            expected: sequence,
            received: msg.sequence(),
        });
    }
    Ok(())
}

/// A management client session with one daemon.
#[derive(Debug)]
pub struct Session {
    sock: SockUnix,
    msg: Message,
    buf: Buffer,
    seq: SequenceCounter,
    dispatcher: Dispatcher,
    builder: Builder,
}

impl Session {
    /// Open a session to the daemon named by the config file.
    ///
    /// Binds the default self address, sends to `uds_address`, uses the process
    /// ID as our port number, and takes the domain and transportSpecific from
    /// the config. The socket is closed again if any step fails.
    pub fn open(cfg: &ConfigFile, section: Option<&str>) -> Result<Session, MngError> {
        let mut sock = SockUnix::new();
        sock.set_default_self_address()?;
        sock.init()?;
        sock.set_peer_address_from_config(cfg, section)?;

        let mut msg = Message::new();
        let mut params = msg.params().clone();
        params.self_id.port_number = (std::process::id() & 0xffff) as u16;
        if !msg.update_params(params) || !msg.use_config(cfg, section) {
            return Err(MngError::Build(ParseError::Value));
        }
        debug!(
            "management session {} -> {}",
            sock.self_address().display(),
            sock.peer_address().display()
        );
        Ok(Session::with_socket(sock, msg))
    }

    /// Build a session around an initialized socket and a prepared message.
    pub fn with_socket(sock: SockUnix, msg: Message) -> Session {
        Session {
            sock,
            msg,
            buf: Buffer::new(DEFAULT_BUFFER_SIZE),
            seq: SequenceCounter::new(),
            dispatcher: Dispatcher::new(),
            builder: Builder::new(),
        }
    }

    /// Send one request and wait up to `timeout_ms` for its reply.
    ///
    /// `tlv` is the payload for SET and COMMAND on IDs that carry data. On
    /// success the parsed reply payload, if any, is returned.
    pub fn exchange(
        &mut self,
        action: Action,
        id: MngId,
        tlv: Option<MngTlv>,
        timeout_ms: u64,
    ) -> Result<Option<&MngTlv>, MngError> {
        let selected = match tlv {
            Some(tlv) => self.msg.set_action_with(action, id, tlv),
            None => self.msg.set_action(action, id),
        };
        if !selected {
            return Err(MngError::Request { action, id });
        }
        self.send_pending(timeout_ms)
    }

    /// GET the data set of `id`.
    pub fn get(&mut self, id: MngId, timeout_ms: u64) -> Result<Option<&MngTlv>, MngError> {
        self.exchange(Action::Get, id, None, timeout_ms)
    }

    /// SET a value. The ID is taken from the payload.
    pub fn set(&mut self, tlv: MngTlv, timeout_ms: u64) -> Result<Option<&MngTlv>, MngError> {
        let id = tlv.id();
        self.exchange(Action::Set, id, Some(tlv), timeout_ms)
    }

    /// Run a COMMAND, with a payload for IDs that carry one.
    pub fn command(
        &mut self,
        id: MngId,
        tlv: Option<MngTlv>,
        timeout_ms: u64,
    ) -> Result<Option<&MngTlv>, MngError> {
        self.exchange(Action::Command, id, tlv, timeout_ms)
    }

    /// Build the request with the registered [`Builder`] and exchange it.
    pub fn build_and_exchange(
        &mut self,
        action: Action,
        id: MngId,
        timeout_ms: u64,
    ) -> Result<Option<&MngTlv>, MngError> {
        if !self.builder.build_tlv(&mut self.msg, action, id) {
            return Err(MngError::Request { action, id });
        }
        self.send_pending(timeout_ms)
    }

    fn send_pending(&mut self, timeout_ms: u64) -> Result<Option<&MngTlv>, MngError> {
        let id = self.msg.tlv_id();
        let sequence = self.seq.next();
        self.msg
            .build(&mut self.buf, sequence)
            .map_err(MngError::Build)?;
        self.sock.send_buf(&self.buf, self.msg.msg_len())?;
        self.msg.clear_data();
        debug!("{} {} sequence {}", self.msg.action(), id, sequence);

        if !self.sock.poll(timeout_ms)? {
            return Err(MngError::Timeout);
        }
        let len = self.sock.receive(&mut self.buf)?;
        match self.msg.parse(&self.buf, len) {
            Ok(()) => {}
            Err(ParseError::Msg) => {
                return Err(MngError::ErrorStatus {
                    id: self.msg.tlv_id(),
                    error: self
                        .msg
                        .error_id()
                        .unwrap_or(ManagementErrorId::GeneralError),
                    display: self.msg.error_display().to_string(),
                })
            }
            Err(e) => return Err(MngError::Parse(e)),
        }
        validate_reply(&self.msg, id, sequence)?;
        Ok(self.msg.data())
    }

    /// Run the dispatcher on the last parsed reply.
    pub fn dispatch(&mut self) -> DispatchOutcome {
        self.dispatcher.call_handler(&self.msg)
    }

    /// Message state, including the last parsed reply.
    pub fn message(&self) -> &Message {
        &self.msg
    }

    /// Mutable message state, for changing parameters.
    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.msg
    }

    /// The reply dispatch table.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// The request payload table.
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }

    /// Last sequence number sent.
    pub fn sequence(&self) -> u16 {
        self.seq.current()
    }

    /// The transport socket.
    pub fn socket(&self) -> &SockUnix {
        &self.sock
    }

    /// Close the socket. The session cannot exchange afterwards.
    pub fn close(&mut self) {
        self.sock.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reply() {
        let mut msg = Message::new();
        assert!(msg.set_action(Action::Get, MngId::Priority1));
        assert!(validate_reply(&msg, MngId::Priority1, 0).is_ok());
        assert_eq!(
            validate_reply(&msg, MngId::Priority2, 0),
            Err(MismatchError::TlvId {
                expected: MngId::Priority2,
                received: MngId::Priority1
            })
        );
        assert_eq!(
            validate_reply(&msg, MngId::Priority1, 3),
            Err(MismatchError::Sequence {
                expected: 3,
                received: 0
            })
        );
    }

    #[test]
    fn test_use_config() {
        let cfg = ConfigFile::parse_str("transportSpecific 1\ndomainNumber 24\n").unwrap();
        let mut msg = Message::new();
        assert!(msg.use_config(&cfg, None));
        assert_eq!(msg.params().transport_specific, 1);
        assert_eq!(msg.params().domain_number, 24);
    }

    #[test]
    fn test_request_refused_before_send() {
        let mut session = Session::with_socket(SockUnix::new(), Message::new());
        let err = session
            .exchange(Action::Set, MngId::DefaultDataSet, None, 10)
            .unwrap_err();
        assert!(matches!(
            err,
            MngError::Request {
                action: Action::Set,
                id: MngId::DefaultDataSet
            }
        ));
        assert_eq!(session.sequence(), 0);
    }

    #[test]
    fn test_closed_session_cannot_send() {
        let mut session = Session::with_socket(SockUnix::new(), Message::new());
        session.close();
        let err = session.get(MngId::Priority1, 10).unwrap_err();
        assert!(matches!(
            err,
            MngError::Transport(crate::error::TransportError::NotInitialized)
        ));
    }
}
