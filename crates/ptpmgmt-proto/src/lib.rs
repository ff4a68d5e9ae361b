// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! PTP management message types, TLV payloads and the management wire codec.
//!
//! This crate provides the building blocks of a PTP (IEEE 1588) management
//! client: the management ID table, the primitive PTP data types, typed TLV
//! payloads, and the [`Message`](message::Message) object that builds
//! requests and parses replies. It does no I/O.

#![warn(missing_docs)]

/// Build and parse error codes.
pub mod error;

/// Management IDs, actions and their properties.
pub mod ids;

/// Management message building and parsing.
pub mod message;

/// Primitive PTP types and their byte codecs.
pub mod protocol;

/// Typed management TLV payloads.
pub mod tlv;

pub use error::ParseError;
pub use ids::{Action, ImplementSpecific, MngId};
pub use message::{Buffer, Message, MsgParams};
pub use tlv::MngTlv;
