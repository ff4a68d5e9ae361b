// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Clock-sync subscription client for the clock manager proxy.

The proxy watches ptp4l and chrony and forwards clock state to subscribed
clients over a Unix datagram socket. A [`ClockManager`] connects, lists the
time bases, subscribes to the events it cares about and waits for them.

# Example
```rust,no_run
use clkmgr_client::subscription::PtpClockSubscription;
use clkmgr_client::{ClockManager, ClockSyncData, ClockSyncSubscription, EventMask};

fn main() -> Result<(), clkmgr_client::ClkMgrError> {
    let mut mgr = ClockManager::builder().build();
    mgr.connect()?;
    for tb in mgr.time_base_configs() {
        println!("{}: {}", tb.index, tb.name);
    }

    let mut ptp = PtpClockSubscription::default();
    ptp.set_event_mask(EventMask::GM_OFFSET | EventMask::SYNCED_TO_GM);
    ptp.set_clock_offset_threshold(50_000);
    let mut sub = ClockSyncSubscription::new();
    sub.set_ptp_subscription(ptp);

    let mut data = ClockSyncData::new();
    mgr.subscribe(&sub, 1, &mut data)?;
    let result = mgr.status_wait(10, 1, &mut data);
    println!("{result:?}: offset {}", data.ptp().clock_offset());
    Ok(())
}
```
*/

#![warn(missing_docs)]

/// Error types and their `io::Error` conversions.
pub mod error;

/// Subscription model and event masks.
pub mod subscription;

/// Clock event data handed to the caller.
pub mod event;

/// Time base table.
pub mod timebase;

/// Proxy wire messages and transport.
pub mod proxy;

/// Cancellation token and signal setup.
pub mod cancel;

mod manager;
mod state;

pub use cancel::{install_signal_handlers, CancellationToken};
pub use error::{ClkMgrError, ProxyProtocolError};
pub use event::{ClockEventBase, ClockSyncData, PtpClockEvent, SysClockEvent};
pub use manager::{ClockManager, ClockManagerBuilder, StatusWaitResult, DEFAULT_PROXY_ADDRESS};
pub use subscription::{ClockSyncSubscription, EventMask};
pub use timebase::{PtpInstance, TimeBaseConfigurations, TimeBaseRecord};
