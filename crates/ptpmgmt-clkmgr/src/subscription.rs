// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! What a client wants to hear about for one time base.
//!
//! A [`ClockSyncSubscription`] combines a PTP clock part (event mask, composite
//! mask, offset threshold) and a system clock part (event mask, offset
//! threshold). Either part can be disabled.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Default offset threshold in nanoseconds.
pub const DEFAULT_THRESHOLD_NS: u32 = 100_000;

/// Set of clock events.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct EventMask(u32);

impl EventMask {
    /// No events.
    pub const NONE: EventMask = EventMask(0);
    /// The clock offset entered or left the threshold range.
    pub const GM_OFFSET: EventMask = EventMask(1 << 0);
    /// The clock became synced to, or lost sync with, the grandmaster.
    pub const SYNCED_TO_GM: EventMask = EventMask(1 << 1);
    /// The port's asCapable state changed.
    pub const AS_CAPABLE: EventMask = EventMask(1 << 2);
    /// The grandmaster identity changed.
    pub const GM_CHANGED: EventMask = EventMask(1 << 3);
    /// Every event.
    pub const ALL: EventMask = EventMask(0x0f);
    /// Events that may take part in the composite event.
    pub const COMPOSITE_ALLOWED: EventMask = EventMask(0x07);

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u32) -> EventMask {
        EventMask(bits & EventMask::ALL.0)
    }

    /// True if every event in `other` is in `self`.
    pub const fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share an event.
    pub const fn intersects(self, other: EventMask) -> bool {
        self.0 & other.0 != 0
    }

    /// True when no event is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;
    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventMask {
    type Output = EventMask;
    fn bitand(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 & rhs.0)
    }
}

impl Not for EventMask {
    type Output = EventMask;
    fn not(self) -> EventMask {
        EventMask(!self.0 & EventMask::ALL.0)
    }
}

impl fmt::Display for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// True iff `|offset| < threshold`.
pub fn in_range(offset: i64, threshold: u32) -> bool {
    offset.unsigned_abs() < u64::from(threshold)
}

/// PTP clock part of a subscription.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PtpClockSubscription {
    event_mask: EventMask,
    composite_event_mask: EventMask,
    clock_offset_threshold: u32,
}

impl Default for PtpClockSubscription {
    fn default() -> Self {
        PtpClockSubscription {
            event_mask: EventMask::NONE,
            composite_event_mask: EventMask::NONE,
            clock_offset_threshold: DEFAULT_THRESHOLD_NS,
        }
    }
}

impl PtpClockSubscription {
    /// Events to report.
    pub fn event_mask(&self) -> EventMask {
        self.event_mask
    }

    /// Set the events to report.
    pub fn set_event_mask(&mut self, mask: EventMask) {
        self.event_mask = mask;
    }

    /// Events combined into the composite event.
    pub fn composite_event_mask(&self) -> EventMask {
        self.composite_event_mask
    }

    /// Set the composite events. GM_CHANGED is dropped, it cannot be combined.
    pub fn set_composite_event_mask(&mut self, mask: EventMask) {
        self.composite_event_mask = mask & EventMask::COMPOSITE_ALLOWED;
    }

    /// Offset threshold in nanoseconds.
    pub fn clock_offset_threshold(&self) -> u32 {
        self.clock_offset_threshold
    }

    /// Set the offset threshold in nanoseconds.
    pub fn set_clock_offset_threshold(&mut self, threshold: u32) {
        self.clock_offset_threshold = threshold;
    }
}

/// System clock part of a subscription.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SysClockSubscription {
    event_mask: EventMask,
    clock_offset_threshold: u32,
}

impl Default for SysClockSubscription {
    fn default() -> Self {
        SysClockSubscription {
            event_mask: EventMask::NONE,
            clock_offset_threshold: DEFAULT_THRESHOLD_NS,
        }
    }
}

impl SysClockSubscription {
    /// Events to report.
    pub fn event_mask(&self) -> EventMask {
        self.event_mask
    }

    /// Set the events to report. Only GM_OFFSET applies to the system clock.
    pub fn set_event_mask(&mut self, mask: EventMask) {
        self.event_mask = mask & EventMask::GM_OFFSET;
    }

    /// Offset threshold in nanoseconds.
    pub fn clock_offset_threshold(&self) -> u32 {
        self.clock_offset_threshold
    }

    /// Set the offset threshold in nanoseconds.
    pub fn set_clock_offset_threshold(&mut self, threshold: u32) {
        self.clock_offset_threshold = threshold;
    }
}

/// Subscription for one time base.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClockSyncSubscription {
    ptp: PtpClockSubscription,
    sys: SysClockSubscription,
    ptp_enabled: bool,
    sys_enabled: bool,
}

impl ClockSyncSubscription {
    /// Both parts disabled, default thresholds.
    pub fn new() -> Self {
        ClockSyncSubscription::default()
    }

    /// Enable the PTP clock part.
    pub fn enable_ptp_subscription(&mut self) {
        self.ptp_enabled = true;
    }

    /// Disable the PTP clock part.
    pub fn disable_ptp_subscription(&mut self) {
        self.ptp_enabled = false;
    }

    /// Whether the PTP clock part is enabled.
    pub fn is_ptp_subscription_enabled(&self) -> bool {
        self.ptp_enabled
    }

    /// Replace and enable the PTP clock part.
    pub fn set_ptp_subscription(&mut self, sub: PtpClockSubscription) {
        self.ptp = sub;
        self.ptp_enabled = true;
    }

    /// The PTP clock part.
    pub fn ptp_subscription(&self) -> &PtpClockSubscription {
        &self.ptp
    }

    /// Enable the system clock part.
    pub fn enable_sys_subscription(&mut self) {
        self.sys_enabled = true;
    }

    /// Disable the system clock part.
    pub fn disable_sys_subscription(&mut self) {
        self.sys_enabled = false;
    }

    /// Whether the system clock part is enabled.
    pub fn is_sys_subscription_enabled(&self) -> bool {
        self.sys_enabled
    }

    /// Replace and enable the system clock part.
    pub fn set_sys_subscription(&mut self, sub: SysClockSubscription) {
        self.sys = sub;
        self.sys_enabled = true;
    }

    /// The system clock part.
    pub fn sys_subscription(&self) -> &SysClockSubscription {
        &self.sys
    }

    /// PTP events in effect: the PTP event mask, or none when disabled.
    pub(crate) fn active_ptp_events(&self) -> EventMask {
        if self.ptp_enabled {
            self.ptp.event_mask
        } else {
            EventMask::NONE
        }
    }

    /// PTP composite events in effect.
    pub(crate) fn active_composite_events(&self) -> EventMask {
        if self.ptp_enabled {
            self.ptp.composite_event_mask
        } else {
            EventMask::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_is_strict() {
        assert!(in_range(0, 1));
        assert!(in_range(99_999, DEFAULT_THRESHOLD_NS));
        assert!(in_range(-99_999, DEFAULT_THRESHOLD_NS));
        assert!(!in_range(100_000, DEFAULT_THRESHOLD_NS));
        assert!(!in_range(-100_000, DEFAULT_THRESHOLD_NS));
        assert!(!in_range(0, 0));
        assert!(!in_range(i64::MIN, u32::MAX));
    }

    #[test]
    fn test_mask_ops() {
        let m = EventMask::GM_OFFSET | EventMask::SYNCED_TO_GM;
        assert_eq!(m.bits(), 0x3);
        assert!(m.contains(EventMask::GM_OFFSET));
        assert!(!m.contains(EventMask::ALL));
        assert!(m.intersects(EventMask::SYNCED_TO_GM | EventMask::GM_CHANGED));
        assert_eq!(EventMask::from_bits_truncate(0xff), EventMask::ALL);
        assert_eq!(!EventMask::GM_CHANGED, EventMask::COMPOSITE_ALLOWED);
        assert_eq!(EventMask::ALL.to_string(), "0xf");
    }

    #[test]
    fn test_composite_mask_filtered() {
        let mut ptp = PtpClockSubscription::default();
        ptp.set_composite_event_mask(EventMask::ALL);
        assert_eq!(ptp.composite_event_mask(), EventMask::COMPOSITE_ALLOWED);
        assert_eq!(ptp.clock_offset_threshold(), DEFAULT_THRESHOLD_NS);
    }

    #[test]
    fn test_sys_mask_filtered() {
        let mut sys = SysClockSubscription::default();
        sys.set_event_mask(EventMask::ALL);
        assert_eq!(sys.event_mask(), EventMask::GM_OFFSET);
    }

    #[test]
    fn test_enable_flags() {
        let mut sub = ClockSyncSubscription::new();
        assert!(!sub.is_ptp_subscription_enabled());
        let mut ptp = PtpClockSubscription::default();
        ptp.set_event_mask(EventMask::ALL);
        sub.set_ptp_subscription(ptp);
        assert!(sub.is_ptp_subscription_enabled());
        assert_eq!(sub.active_ptp_events(), EventMask::ALL);
        sub.disable_ptp_subscription();
        assert_eq!(sub.active_ptp_events(), EventMask::NONE);
        sub.enable_sys_subscription();
        assert!(sub.is_sys_subscription_enabled());
        sub.disable_sys_subscription();
        assert!(!sub.is_sys_subscription_enabled());
    }
}
