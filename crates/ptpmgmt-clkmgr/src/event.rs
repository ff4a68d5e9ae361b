// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Clock event state delivered to the client.
//!
//! Every flag comes with a count of how often it changed since the
//! subscription started. Counts only grow; reading the data does not reset
//! them.

use ptp_proto::protocol::ClockIdentity;

/// Fields shared by the PTP clock and the system clock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClockEventBase {
    pub(crate) clock_offset: i64,
    pub(crate) offset_in_range: bool,
    pub(crate) offset_in_range_count: u32,
    pub(crate) gm_identity: u64,
    pub(crate) gm_changed: bool,
    pub(crate) gm_changed_count: u32,
    pub(crate) sync_interval: i64,
    pub(crate) notification_timestamp: u64,
}

impl ClockEventBase {
    /// Offset from the time source in nanoseconds.
    pub fn clock_offset(&self) -> i64 {
        self.clock_offset
    }

    /// Whether the offset is within the subscription threshold.
    pub fn is_offset_in_range(&self) -> bool {
        self.offset_in_range
    }

    /// Times the in-range flag flipped.
    pub fn offset_in_range_event_count(&self) -> u32 {
        self.offset_in_range_count
    }

    /// Grandmaster identity (PTP) or reference ID (system clock).
    pub fn gm_identity(&self) -> u64 {
        self.gm_identity
    }

    /// Whether the grandmaster changed since the last delivered event.
    pub fn is_gm_changed(&self) -> bool {
        self.gm_changed
    }

    /// Times the grandmaster changed.
    pub fn gm_changed_event_count(&self) -> u32 {
        self.gm_changed_count
    }

    /// Sync interval (PTP) or polling interval (system clock).
    pub fn sync_interval(&self) -> i64 {
        self.sync_interval
    }

    /// Time of the last notification, nanoseconds since the Unix epoch.
    pub fn notification_timestamp(&self) -> u64 {
        self.notification_timestamp
    }
}

/// PTP clock event state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PtpClockEvent {
    pub(crate) base: ClockEventBase,
    pub(crate) synced_with_gm: bool,
    pub(crate) synced_with_gm_count: u32,
    pub(crate) as_capable: bool,
    pub(crate) as_capable_count: u32,
    pub(crate) composite_event: bool,
    pub(crate) composite_event_count: u32,
}

impl std::ops::Deref for PtpClockEvent {
    type Target = ClockEventBase;
    fn deref(&self) -> &ClockEventBase {
        &self.base
    }
}

impl PtpClockEvent {
    /// Whether the clock is synced to the grandmaster.
    pub fn is_synced_with_gm(&self) -> bool {
        self.synced_with_gm
    }

    /// Times the synced flag flipped.
    pub fn synced_with_gm_event_count(&self) -> u32 {
        self.synced_with_gm_count
    }

    /// Whether the port is asCapable.
    pub fn is_as_capable(&self) -> bool {
        self.as_capable
    }

    /// Times asCapable flipped.
    pub fn as_capable_event_count(&self) -> u32 {
        self.as_capable_count
    }

    /// Whether every subscribed composite condition holds.
    pub fn is_composite_event_met(&self) -> bool {
        self.composite_event
    }

    /// Times the composite event flipped.
    pub fn composite_event_count(&self) -> u32 {
        self.composite_event_count
    }

    /// Grandmaster identity as `xxxxxx.xxxx.xxxxxx`.
    pub fn gm_identity_string(&self) -> String {
        ClockIdentity::from(self.base.gm_identity).to_string()
    }
}

/// System clock (chrony) event state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SysClockEvent {
    pub(crate) base: ClockEventBase,
}

impl std::ops::Deref for SysClockEvent {
    type Target = ClockEventBase;
    fn deref(&self) -> &ClockEventBase {
        &self.base
    }
}

impl SysClockEvent {
    /// chrony reference ID rendered as four characters.
    ///
    /// Non-printable bytes become `.`.
    pub fn reference_id_string(&self) -> String {
        (self.base.gm_identity as u32)
            .to_be_bytes()
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

/// Clock state handed to the caller of subscribe and status wait.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClockSyncData {
    pub(crate) ptp: PtpClockEvent,
    pub(crate) sys: SysClockEvent,
    pub(crate) have_ptp: bool,
    pub(crate) have_sys: bool,
}

impl ClockSyncData {
    /// Empty data, before any subscribe.
    pub fn new() -> Self {
        ClockSyncData::default()
    }

    /// PTP clock state.
    pub fn ptp(&self) -> &PtpClockEvent {
        &self.ptp
    }

    /// System clock state.
    pub fn sys_clock(&self) -> &SysClockEvent {
        &self.sys
    }

    /// Whether the PTP clock state is valid.
    pub fn have_ptp(&self) -> bool {
        self.have_ptp
    }

    /// Whether the system clock state is valid.
    pub fn have_sys(&self) -> bool {
        self.have_sys
    }
}
