// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Primitive PTP data types and their network byte order codecs.
//!
//! Provides `ReadBytes` and `WriteBytes` implementations which extend the byteorder crate
//! `WriteBytesExt` and `ReadBytesExt` traits with the ability to read and write the IEEE 1588
//! primitive types: identities, clock quality, text, timestamps and intervals.

/// PTP major version carried in every header.
pub const PTP_MAJOR_VERSION: u8 = 2;

/// PTP minor version sent by default.
pub const PTP_MINOR_VERSION: u8 = 0;

mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
