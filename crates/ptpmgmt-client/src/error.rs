// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the management client.
//!
//! Client operations return `Result<T, MngError>`. An [`MngError`] converts into
//! `io::Error` through `From<MngError> for io::Error`, so callers working in
//! `io::Result` can use `?` directly and recover the typed error later via
//! `io::Error::get_ref()`:
//!
//! ```no_run
//! use ptp_client::error::MngError;
//! use ptp_client::{ConfigFile, Session};
//! use ptp_proto::MngId;
//!
//! fn priority1(session: &mut Session) -> std::io::Result<()> {
//!     session.get(MngId::Priority1, 500)?;
//!     Ok(())
//! }
//!
//! let cfg = ConfigFile::default();
//! let mut session = Session::open(&cfg, None).unwrap();
//! if let Err(e) = priority1(&mut session) {
//!     match e.get_ref().and_then(|inner| inner.downcast_ref::<MngError>()) {
//!         Some(MngError::Timeout) => eprintln!("no reply"),
//!         Some(MngError::ErrorStatus { error, .. }) => eprintln!("daemon refused: {error}"),
//!         _ => eprintln!("{e}"),
//!     }
//! }
//! ```

pub use ptp_proto::error::ParseError;

use std::fmt;
use std::io;

use ptp_proto::ids::{ManagementErrorId, MngId};

/// Errors that can occur during management client operations.
#[derive(Debug)]
pub enum MngError {
    /// The request could not be serialized.
    Build(ParseError),
    /// Socket setup or datagram exchange failed.
    Transport(TransportError),
    /// No reply arrived within the poll timeout.
    Timeout,
    /// The daemon answered with a management error status TLV.
    ErrorStatus {
        /// Management ID the error refers to.
        id: MngId,
        /// Error code sent by the daemon.
        error: ManagementErrorId,
        /// Optional display text sent by the daemon.
        display: String,
    },
    /// The reply could not be parsed.
    Parse(ParseError),
    /// The reply does not belong to the request.
    Mismatch(MismatchError),
    /// Invalid configuration file or value.
    Config(ConfigError),
    /// The request was refused before sending, e.g. an action the ID does not allow.
    Request {
        /// Action that was attempted.
        action: ptp_proto::Action,
        /// Management ID that was attempted.
        id: MngId,
    },
    /// Underlying I/O error (socket bind, send, receive, file read).
    Io(io::Error),
}

/// Transport session errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// The socket is not initialized.
    NotInitialized,
    /// The socket is already initialized.
    AlreadyInitialized,
    /// A socket path is longer than the platform limit.
    AddressTooLong {
        /// Length of the rejected path in bytes.
        len: usize,
    },
    /// A socket path is empty.
    EmptyAddress,
    /// No peer address is set.
    NoPeer,
    /// Fewer bytes were sent than requested.
    ShortSend {
        /// Bytes requested.
        expected: usize,
        /// Bytes sent.
        sent: usize,
    },
    /// An empty datagram was received.
    EmptyMessage,
    /// A datagram arrived from an address other than the peer.
    WrongPeer,
    /// A datagram did not fit the receive buffer and was cut short.
    Truncated {
        /// Full datagram length in bytes.
        len: usize,
        /// Receive buffer size in bytes.
        capacity: usize,
    },
}

/// Reply validation errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MismatchError {
    /// The reply sequence number differs from the request.
    Sequence {
        /// Sequence number of the request.
        expected: u16,
        /// Sequence number of the reply.
        received: u16,
    },
    /// The reply TLV ID differs from the request.
    TlvId {
        /// ID of the request.
        expected: MngId,
        /// ID of the reply.
        received: MngId,
    },
}

/// Configuration errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A line could not be parsed.
    Syntax {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
    /// A value is out of range or malformed.
    Value {
        /// Key of the value.
        key: String,
        /// The rejected value.
        value: String,
    },
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for MngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MngError::Build(e) => write!(f, "build error: {e}"),
            MngError::Transport(e) => write!(f, "transport error: {e}"),
            MngError::Timeout => write!(f, "timed out waiting for a reply"),
            MngError::ErrorStatus { id, error, display } => {
                if display.is_empty() {
                    write!(f, "{id}: management error {error}")
                } else {
                    write!(f, "{id}: management error {error}: {display}")
                }
            }
            MngError::Parse(e) => write!(f, "parse error: {e}"),
            MngError::Mismatch(e) => write!(f, "reply mismatch: {e}"),
            MngError::Config(e) => write!(f, "config error: {e}"),
            MngError::Request { action, id } => {
                write!(f, "{action} is not allowed for {id}")
            }
            MngError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotInitialized => write!(f, "socket is not initialized"),
            TransportError::AlreadyInitialized => write!(f, "socket is already initialized"),
            TransportError::AddressTooLong { len } => {
                write!(f, "socket address too long ({len} bytes)")
            }
            TransportError::EmptyAddress => write!(f, "socket address is empty"),
            TransportError::NoPeer => write!(f, "no peer address"),
            TransportError::ShortSend { expected, sent } => {
                write!(f, "sent {sent} of {expected} bytes")
            }
            TransportError::EmptyMessage => write!(f, "received an empty message"),
            TransportError::WrongPeer => write!(f, "message from unexpected address"),
            TransportError::Truncated { len, capacity } => {
                write!(f, "received {len} byte message into {capacity} byte buffer")
            }
        }
    }
}

impl fmt::Display for MismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchError::Sequence { expected, received } => {
                write!(f, "sequence {received}, expected {expected}")
            }
            MismatchError::TlvId { expected, received } => {
                write!(f, "TLV {received}, expected {expected}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Syntax { line, text } => write!(f, "line {line}: cannot parse '{text}'"),
            ConfigError::Value { key, value } => write!(f, "invalid value '{value}' for {key}"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for MngError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MngError::Io(e) => Some(e),
            MngError::Build(e) | MngError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for TransportError {}
impl std::error::Error for MismatchError {}
impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<MngError> for io::Error {
    fn from(err: MngError) -> io::Error {
        let kind = match &err {
            MngError::Timeout => io::ErrorKind::TimedOut,
            MngError::Config(_) | MngError::Request { .. } => io::ErrorKind::InvalidInput,
            MngError::Transport(TransportError::NotInitialized | TransportError::NoPeer) => {
                io::ErrorKind::NotConnected
            }
            MngError::Transport(
                TransportError::AddressTooLong { .. } | TransportError::EmptyAddress,
            ) => io::ErrorKind::InvalidInput,
            MngError::Transport(TransportError::AlreadyInitialized) => {
                io::ErrorKind::AlreadyExists
            }
            MngError::Io(e) => e.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        // Preserve the original io::Error directly for the Io variant.
        if let MngError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for MngError {
    fn from(err: io::Error) -> MngError {
        MngError::Io(err)
    }
}

impl From<TransportError> for MngError {
    fn from(err: TransportError) -> MngError {
        MngError::Transport(err)
    }
}

impl From<ConfigError> for MngError {
    fn from(err: ConfigError) -> MngError {
        MngError::Config(err)
    }
}

impl From<MismatchError> for MngError {
    fn from(err: MismatchError) -> MngError {
        MngError::Mismatch(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(
            TransportError::AddressTooLong { len: 120 }.to_string(),
            "socket address too long (120 bytes)"
        );
        assert_eq!(
            TransportError::ShortSend {
                expected: 56,
                sent: 10
            }
            .to_string(),
            "sent 10 of 56 bytes"
        );
        assert_eq!(
            TransportError::Truncated {
                len: 200,
                capacity: 100
            }
            .to_string(),
            "received 200 byte message into 100 byte buffer"
        );
    }

    #[test]
    fn test_mismatch_display() {
        let e = MismatchError::Sequence {
            expected: 5,
            received: 4,
        };
        assert_eq!(e.to_string(), "sequence 4, expected 5");
        let e = MismatchError::TlvId {
            expected: MngId::Priority1,
            received: MngId::Priority2,
        };
        assert_eq!(e.to_string(), "TLV PRIORITY2, expected PRIORITY1");
    }

    #[test]
    fn test_error_status_display() {
        let e = MngError::ErrorStatus {
            id: MngId::Priority1,
            error: ManagementErrorId::NotSetable,
            display: String::new(),
        };
        assert_eq!(e.to_string(), "PRIORITY1: management error NOT_SETABLE");
    }

    #[test]
    fn test_io_kinds() {
        let e: io::Error = MngError::Timeout.into();
        assert_eq!(e.kind(), io::ErrorKind::TimedOut);
        let e: io::Error = MngError::Transport(TransportError::NoPeer).into();
        assert_eq!(e.kind(), io::ErrorKind::NotConnected);
        let e: io::Error = MngError::Parse(ParseError::Header).into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
        let e: io::Error = MngError::Config(ConfigError::Value {
            key: "domainNumber".into(),
            value: "300".into(),
        })
        .into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_io_variant_passthrough() {
        let orig = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let e: io::Error = MngError::Io(orig).into();
        assert_eq!(e.kind(), io::ErrorKind::PermissionDenied);
        assert!(e.get_ref().is_some_and(|i| i.downcast_ref::<MngError>().is_none()));
    }
}
