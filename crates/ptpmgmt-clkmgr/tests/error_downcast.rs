// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Tests for error type downcasting through the io::Error boundary.

use std::io;

use clkmgr_client::{ClkMgrError, ProxyProtocolError};

fn inner(err: &io::Error) -> &ClkMgrError {
    err.get_ref()
        .unwrap()
        .downcast_ref::<ClkMgrError>()
        .unwrap()
}

#[test]
fn test_timeout_roundtrip() {
    let io_err: io::Error = ClkMgrError::SubscribeTimeout.into();
    assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
    assert!(matches!(inner(&io_err), ClkMgrError::SubscribeTimeout));
}

#[test]
fn test_protocol_roundtrip() {
    let io_err: io::Error = ClkMgrError::Protocol(ProxyProtocolError::Nack(3)).into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    assert!(matches!(
        inner(&io_err),
        ClkMgrError::Protocol(ProxyProtocolError::Nack(3))
    ));
    let source = std::error::Error::source(inner(&io_err)).unwrap();
    assert_eq!(
        source.downcast_ref::<ProxyProtocolError>(),
        Some(&ProxyProtocolError::Nack(3))
    );
}

#[test]
fn test_unknown_time_base_roundtrip() {
    let io_err: io::Error = ClkMgrError::UnknownTimeBase("high".into()).into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    assert_eq!(io_err.to_string(), "unknown time base 'high'");
}

#[test]
fn test_io_passthrough() {
    let original = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
    let io_err: io::Error = ClkMgrError::Io(original).into();
    assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
    assert!(io_err.get_ref().unwrap().downcast_ref::<ClkMgrError>().is_none());
}
