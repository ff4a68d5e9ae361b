// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the clock manager client.
//!
//! [`ClkMgrError`] converts into `io::Error` with a matching
//! `io::ErrorKind`, and can be recovered from it via `io::Error::get_ref()`.

use std::fmt;
use std::io;

/// Errors that can occur while talking to the clock manager proxy.
#[derive(Debug)]
pub enum ClkMgrError {
    /// The client is not connected to the proxy.
    NotConnected,
    /// The proxy did not answer the connect request in time.
    ConnectTimeout,
    /// The proxy did not answer the subscribe request in time.
    SubscribeTimeout,
    /// No time base with this index.
    InvalidTimeBase(usize),
    /// No time base with this name.
    UnknownTimeBase(String),
    /// A wait timeout below -1.
    InvalidTimeout(i32),
    /// Malformed or refused proxy message.
    Protocol(ProxyProtocolError),
    /// Underlying socket error.
    Io(io::Error),
}

/// Proxy wire protocol errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProxyProtocolError {
    /// The datagram ends before the message does.
    Truncated,
    /// Unknown message ID.
    UnknownMessage(u8),
    /// The proxy refused the request with this message ID.
    Nack(u8),
    /// Unknown acknowledge value.
    InvalidAck(i8),
    /// A text field does not fit its fixed-size slot.
    FieldTooLong {
        /// Field length in bytes.
        len: usize,
        /// Slot size in bytes.
        max: usize,
    },
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for ClkMgrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClkMgrError::NotConnected => write!(f, "not connected to the clock manager proxy"),
            ClkMgrError::ConnectTimeout => write!(f, "timed out connecting to the proxy"),
            ClkMgrError::SubscribeTimeout => write!(f, "timed out waiting for subscribe reply"),
            ClkMgrError::InvalidTimeBase(index) => write!(f, "invalid time base index {index}"),
            ClkMgrError::UnknownTimeBase(name) => write!(f, "unknown time base '{name}'"),
            ClkMgrError::InvalidTimeout(t) => write!(f, "invalid timeout {t}"),
            ClkMgrError::Protocol(e) => write!(f, "proxy protocol error: {e}"),
            ClkMgrError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ProxyProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyProtocolError::Truncated => write!(f, "truncated message"),
            ProxyProtocolError::UnknownMessage(id) => write!(f, "unknown message id {id}"),
            ProxyProtocolError::Nack(id) => write!(f, "request {id} refused by proxy"),
            ProxyProtocolError::InvalidAck(v) => write!(f, "invalid ack value {v}"),
            ProxyProtocolError::FieldTooLong { len, max } => {
                write!(f, "field of {len} bytes exceeds {max}")
            }
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for ClkMgrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClkMgrError::Io(e) => Some(e),
            ClkMgrError::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ProxyProtocolError {}

// ── From conversions ────────────────────────────────────────────────

impl From<ClkMgrError> for io::Error {
    fn from(err: ClkMgrError) -> io::Error {
        let kind = match &err {
            ClkMgrError::ConnectTimeout | ClkMgrError::SubscribeTimeout => io::ErrorKind::TimedOut,
            ClkMgrError::NotConnected => io::ErrorKind::NotConnected,
            ClkMgrError::InvalidTimeBase(_)
            | ClkMgrError::UnknownTimeBase(_)
            | ClkMgrError::InvalidTimeout(_) => io::ErrorKind::InvalidInput,
            ClkMgrError::Protocol(_) => io::ErrorKind::InvalidData,
            ClkMgrError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let ClkMgrError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for ClkMgrError {
    fn from(err: io::Error) -> ClkMgrError {
        ClkMgrError::Io(err)
    }
}

impl From<ProxyProtocolError> for ClkMgrError {
    fn from(err: ProxyProtocolError) -> ClkMgrError {
        ClkMgrError::Protocol(err)
    }
}

impl From<ProxyProtocolError> for io::Error {
    fn from(err: ProxyProtocolError) -> io::Error {
        ClkMgrError::Protocol(err).into()
    }
}
