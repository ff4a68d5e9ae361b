// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Event state kept per subscribed time base.

use std::time::Instant;

use crate::event::{ClockSyncData, PtpClockEvent, SysClockEvent};
use crate::proxy::ProxyEvent;
use crate::subscription::{in_range, ClockSyncSubscription, EventMask};

#[derive(Debug, Default)]
pub(crate) struct TimeBaseState {
    subscription: ClockSyncSubscription,
    subscribed: bool,
    have_ptp: bool,
    have_sys: bool,
    ptp: PtpClockEvent,
    sys: SysClockEvent,
    event_changed: bool,
    last_notification: Option<Instant>,
}

impl TimeBaseState {
    /// Fresh state for a subscription. `have_ptp`/`have_sys` say which
    /// clocks the time base offers.
    pub(crate) fn new(subscription: ClockSyncSubscription, have_ptp: bool, have_sys: bool) -> Self {
        TimeBaseState {
            have_ptp: have_ptp && subscription.is_ptp_subscription_enabled(),
            have_sys: have_sys && subscription.is_sys_subscription_enabled(),
            subscription,
            ..TimeBaseState::default()
        }
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub(crate) fn set_subscribed(&mut self, subscribed: bool) {
        self.subscribed = subscribed;
    }

    pub(crate) fn is_event_changed(&self) -> bool {
        self.event_changed
    }

    pub(crate) fn last_notification(&self) -> Option<Instant> {
        self.last_notification
    }

    /// Fold a proxy event into the state. `now_ns` is the wall clock time of
    /// arrival in nanoseconds since the Unix epoch.
    pub(crate) fn apply(&mut self, ev: &ProxyEvent, now_ns: u64) {
        self.last_notification = Some(Instant::now());
        if self.subscription.is_ptp_subscription_enabled() {
            self.apply_ptp(ev, now_ns);
        }
        if self.subscription.is_sys_subscription_enabled() {
            self.apply_sys(ev, now_ns);
        }
    }

    fn apply_ptp(&mut self, ev: &ProxyEvent, now_ns: u64) {
        let events = self.subscription.active_ptp_events();
        let threshold = self.subscription.ptp_subscription().clock_offset_threshold();
        let ptp = &mut self.ptp;

        if events.contains(EventMask::GM_OFFSET) && ptp.base.clock_offset != ev.master_offset {
            ptp.base.clock_offset = ev.master_offset;
            let now_in_range = in_range(ev.master_offset, threshold);
            if now_in_range != ptp.base.offset_in_range {
                ptp.base.offset_in_range = now_in_range;
                ptp.base.offset_in_range_count += 1;
                self.event_changed = true;
            }
        }
        if events.contains(EventMask::SYNCED_TO_GM) && ptp.synced_with_gm != ev.synced_to_gm {
            ptp.synced_with_gm = ev.synced_to_gm;
            ptp.synced_with_gm_count += 1;
            self.event_changed = true;
        }
        let gm = ev.gm_identity_u64();
        if events.contains(EventMask::GM_CHANGED) && ptp.base.gm_identity != gm {
            ptp.base.gm_identity = gm;
            ptp.base.gm_changed = true;
            ptp.base.gm_changed_count += 1;
            self.event_changed = true;
        }
        if events.contains(EventMask::AS_CAPABLE) && ptp.as_capable != ev.as_capable {
            ptp.as_capable = ev.as_capable;
            ptp.as_capable_count += 1;
            self.event_changed = true;
        }

        let composite = self.subscription.active_composite_events();
        if !composite.is_empty() {
            let mut met = true;
            if composite.contains(EventMask::GM_OFFSET) {
                met &= in_range(ev.master_offset, threshold);
            }
            if composite.contains(EventMask::SYNCED_TO_GM) {
                met &= ev.synced_to_gm;
            }
            if composite.contains(EventMask::AS_CAPABLE) {
                met &= ev.as_capable;
            }
            if met != ptp.composite_event {
                ptp.composite_event = met;
                ptp.composite_event_count += 1;
                self.event_changed = true;
            }
        }

        ptp.base.notification_timestamp = now_ns;
        ptp.base.sync_interval = ev.ptp_sync_interval;
    }

    fn apply_sys(&mut self, ev: &ProxyEvent, now_ns: u64) {
        let sub = self.subscription.sys_subscription();
        let sys = &mut self.sys.base;

        sys.clock_offset = ev.chrony_offset;
        if sub.event_mask().contains(EventMask::GM_OFFSET) {
            let now_in_range = in_range(ev.chrony_offset, sub.clock_offset_threshold());
            if now_in_range != sys.offset_in_range {
                sys.offset_in_range = now_in_range;
                sys.offset_in_range_count += 1;
                self.event_changed = true;
            }
        }
        sys.gm_identity = u64::from(ev.chrony_reference_id);
        sys.sync_interval = ev.chrony_polling_interval;
        sys.notification_timestamp = now_ns;
    }

    /// Current event data. Clears the changed flag and the one-shot
    /// gm_changed flag; counts are kept.
    pub(crate) fn take_snapshot(&mut self) -> (PtpClockEvent, SysClockEvent, bool) {
        let snapshot = (self.ptp, self.sys, self.event_changed);
        self.event_changed = false;
        self.ptp.base.gm_changed = false;
        snapshot
    }

    /// Snapshot as handed to the caller.
    pub(crate) fn snapshot_data(&mut self) -> ClockSyncData {
        let (ptp, sys, _) = self.take_snapshot();
        ClockSyncData {
            ptp,
            sys,
            have_ptp: self.have_ptp,
            have_sys: self.have_sys,
        }
    }
}
