// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error codes for building and parsing PTP management messages.
//!
//! A successful build or parse is `Ok(())`. Every failure carries one
//! [`ParseError`] code. [`ParseError::name`] returns the stable code name
//! (`MNG_PARSE_ERROR_TOO_SMALL` and so on) that log output and tooling match
//! against. [`err_to_str`] covers the whole result, including success.

use core::fmt;
use std::io;

/// Failure codes reported by [`Message::build`](crate::message::Message::build)
/// and [`Message::parse`](crate::message::Message::parse).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParseError {
    /// The peer answered with a management error status TLV.
    ///
    /// The error id and display text are available on the message.
    Msg,
    /// The datagram is a PTP signaling message, which is not handled.
    Signaling,
    /// Unknown management id, or an id the vendor does not implement.
    InvalidId,
    /// The TLV type is neither management nor management error status.
    InvalidTlv,
    /// An embedded record length does not match its content.
    SizeMiss,
    /// The buffer or datagram is too small for the expected data.
    TooSmall,
    /// The built message has an odd size.
    Size,
    /// A field value is out of range.
    Value,
    /// The PTP header has wrong values.
    Header,
    /// The action field is not valid here.
    Action,
    /// No codec for this TLV's data.
    Unsupported,
    /// Memory allocation failed.
    Memory,
}

impl ParseError {
    /// Returns the stable code name of this error.
    pub const fn name(&self) -> &'static str {
        match self {
            ParseError::Msg => "MNG_PARSE_ERROR_MSG",
            ParseError::Signaling => "MNG_PARSE_ERROR_SIG",
            ParseError::InvalidId => "MNG_PARSE_ERROR_INVALID_ID",
            ParseError::InvalidTlv => "MNG_PARSE_ERROR_INVALID_TLV",
            ParseError::SizeMiss => "MNG_PARSE_ERROR_SIZE_MISS",
            ParseError::TooSmall => "MNG_PARSE_ERROR_TOO_SMALL",
            ParseError::Size => "MNG_PARSE_ERROR_SIZE",
            ParseError::Value => "MNG_PARSE_ERROR_VAL",
            ParseError::Header => "MNG_PARSE_ERROR_HEADER",
            ParseError::Action => "MNG_PARSE_ERROR_ACTION",
            ParseError::Unsupported => "MNG_PARSE_ERROR_UNSUPPORT",
            ParseError::Memory => "MNG_PARSE_ERROR_MEM",
        }
    }

    /// Maps an I/O error raised by a byte reader or writer onto a parse code.
    ///
    /// Running out of bytes becomes [`ParseError::TooSmall`]. Rejected input
    /// values become [`ParseError::Value`].
    pub fn from_io(err: &io::Error) -> ParseError {
        match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => ParseError::TooSmall,
            io::ErrorKind::InvalidInput => ParseError::Value,
            io::ErrorKind::OutOfMemory => ParseError::Memory,
            _ => ParseError::TooSmall,
        }
    }
}

/// Returns the code name for a build or parse result, `MNG_PARSE_ERROR_OK` on success.
pub fn err_to_str(result: Result<(), ParseError>) -> &'static str {
    match result {
        Ok(()) => "MNG_PARSE_ERROR_OK",
        Err(e) => e.name(),
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseError::Msg => "peer replied with a management error status",
            ParseError::Signaling => "signaling messages are not supported",
            ParseError::InvalidId => "invalid or unsupported management id",
            ParseError::InvalidTlv => "wrong TLV type",
            ParseError::SizeMiss => "field size does not match its length",
            ParseError::TooSmall => "buffer too small",
            ParseError::Size => "message size is odd",
            ParseError::Value => "field value out of range",
            ParseError::Header => "wrong PTP header value",
            ParseError::Action => "wrong action value",
            ParseError::Unsupported => "TLV data is not supported",
            ParseError::Memory => "memory allocation failure",
        };
        write!(f, "{} ({})", text, self.name())
    }
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> io::Error {
        let kind = match err {
            ParseError::TooSmall => io::ErrorKind::UnexpectedEof,
            ParseError::Msg => io::ErrorKind::Other,
            ParseError::Memory => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_code() {
        assert_eq!(ParseError::TooSmall.name(), "MNG_PARSE_ERROR_TOO_SMALL");
        assert_eq!(ParseError::Value.name(), "MNG_PARSE_ERROR_VAL");
        assert_eq!(ParseError::Unsupported.name(), "MNG_PARSE_ERROR_UNSUPPORT");
        assert_eq!(ParseError::SizeMiss.name(), "MNG_PARSE_ERROR_SIZE_MISS");
    }

    #[test]
    fn test_err_to_str_ok() {
        assert_eq!(err_to_str(Ok(())), "MNG_PARSE_ERROR_OK");
        assert_eq!(err_to_str(Err(ParseError::Msg)), "MNG_PARSE_ERROR_MSG");
    }

    #[test]
    fn test_display_contains_name() {
        let text = ParseError::Header.to_string();
        assert!(text.starts_with("wrong PTP header value"));
        assert!(text.ends_with("(MNG_PARSE_ERROR_HEADER)"));
    }

    #[test]
    fn test_into_io_error() {
        let io_err: io::Error = ParseError::TooSmall.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<ParseError>())
            .copied();
        assert_eq!(inner, Some(ParseError::TooSmall));

        let io_err: io::Error = ParseError::Action.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_from_io_eof() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(ParseError::from_io(&eof), ParseError::TooSmall);
        let bad = io::Error::new(io::ErrorKind::InvalidInput, "too long");
        assert_eq!(ParseError::from_io(&bad), ParseError::Value);
    }
}
