// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Time bases offered by the proxy.
//!
//! The table is filled once from the connect reply and is read-only
//! afterwards. Indices are assigned by the proxy and start at 1.

/// PTP instance behind a time base.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PtpInstance {
    /// Network interface ptp4l runs on.
    pub interface_name: String,
    /// transportSpecific of the instance.
    pub transport_specific: u8,
    /// PTP domain of the instance.
    pub domain_number: u8,
}

/// One time base.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TimeBaseRecord {
    /// Index used to subscribe.
    pub index: usize,
    /// Human readable name.
    pub name: String,
    /// PTP instance, if the time base has one.
    pub ptp: Option<PtpInstance>,
    /// Whether the system clock is tracked.
    pub have_sys_clock: bool,
}

impl TimeBaseRecord {
    /// Whether a PTP instance is present.
    pub fn have_ptp(&self) -> bool {
        self.ptp.is_some()
    }

    /// The PTP instance, if any.
    pub fn ptp(&self) -> Option<&PtpInstance> {
        self.ptp.as_ref()
    }

    /// Whether the system clock is tracked.
    pub fn have_sys_clock(&self) -> bool {
        self.have_sys_clock
    }
}

/// Ordered table of time bases.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TimeBaseConfigurations {
    records: Vec<TimeBaseRecord>,
}

impl TimeBaseConfigurations {
    pub(crate) fn from_records(records: Vec<TimeBaseRecord>) -> Self {
        TimeBaseConfigurations { records }
    }

    /// Number of time bases.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the proxy offered no time base.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with this index.
    pub fn record(&self, index: usize) -> Option<&TimeBaseRecord> {
        self.records.iter().find(|r| r.index == index)
    }

    /// Records in proxy order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeBaseRecord> {
        self.records.iter()
    }

    /// Whether a time base with this index exists.
    pub fn is_index_present(&self, index: usize) -> bool {
        self.record(index).is_some()
    }

    /// Index of the time base with this name.
    pub fn name_to_index(&self, name: &str) -> Option<usize> {
        self.records.iter().find(|r| r.name == name).map(|r| r.index)
    }
}

impl<'a> IntoIterator for &'a TimeBaseConfigurations {
    type Item = &'a TimeBaseRecord;
    type IntoIter = std::slice::Iter<'a, TimeBaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
