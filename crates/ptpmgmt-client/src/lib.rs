// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
PTP management client for linuxptp's ptp4l over its Unix datagram socket.

# Example
Reads the linuxptp configuration, raises the clock's priority1 and reads it
back.

```rust,no_run
use ptp_client::{ConfigFile, Session, DEFAULT_CONFIG_FILE};
use ptp_proto::tlv::Priority1;
use ptp_proto::{MngId, MngTlv};

fn main() -> Result<(), ptp_client::error::MngError> {
    let cfg = ConfigFile::read(DEFAULT_CONFIG_FILE)?;
    let mut session = Session::open(&cfg, None)?;
    session.set(MngTlv::Priority1(Priority1 { priority1: 147 }), 500)?;
    match session.get(MngId::Priority1, 500)? {
        Some(MngTlv::Priority1(p)) => println!("priority1: {}", p.priority1),
        _ => println!("no data"),
    }
    Ok(())
}
```

Replies can also be routed through a [`Dispatcher`] registered by ID, and
SET/COMMAND payloads can be produced on demand by a [`Builder`].
*/

#![warn(missing_docs)]

// Re-export protocol types from ptp_proto for convenience.
pub use ptp_proto::{ids, message, protocol, tlv};

/// Client error types and their `io::Error` conversions.
pub mod error;

/// linuxptp configuration file reader.
pub mod config;

/// Per-session sequence counter.
pub mod sequence;

/// Reply handlers keyed by management ID.
pub mod dispatch;

/// Request payload callbacks keyed by action and management ID.
pub mod builder;

/// Unix datagram transport to the daemon.
pub mod sock;

// Request/reply exchange and validation.
mod session;

pub use builder::{BuildContext, Builder};
pub use config::{ConfigFile, NetworkTransport, DEFAULT_CONFIG_FILE};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use sequence::SequenceCounter;
pub use session::{validate_reply, MessageConfigExt, Session, DEFAULT_BUFFER_SIZE};
pub use sock::SockUnix;
