// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation for wait loops.
//!
//! The token is checked between [`status_wait`](crate::ClockManager::status_wait)
//! calls, never inside one.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

/// Shared stop flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Request a stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Cancel `token` on SIGINT, SIGTERM or SIGHUP.
pub fn install_signal_handlers(token: &CancellationToken) -> io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::flag;

    for sig in [SIGINT, SIGTERM, SIGHUP] {
        flag::register(sig, Arc::clone(&token.flag))?;
    }
    debug!("signal handlers installed");
    Ok(())
}
