// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use std::net::IpAddr;

/// **clockIdentity** - An 8-octet identity (EUI-64) naming a PTP instance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ClockIdentity(pub [u8; 8]);

impl ClockIdentity {
    /// The all-ones identity, addressing every clock.
    pub const ALL: ClockIdentity = ClockIdentity([0xff; 8]);

    /// Returns the identity as a big-endian 64-bit integer.
    pub fn to_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl From<u64> for ClockIdentity {
    fn from(v: u64) -> Self {
        ClockIdentity(v.to_be_bytes())
    }
}

impl fmt::Display for ClockIdentity {
    /// Formats as `xxxxxx.xxxx.xxxxxx`, the way linuxptp prints identities.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]
        )
    }
}

/// **portIdentity** - A clock identity plus a port number.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct PortIdentity {
    /// Identity of the clock owning the port.
    pub clock_identity: ClockIdentity,
    /// Port number, 1-based. `0xffff` addresses every port.
    pub port_number: u16,
}

impl PortIdentity {
    /// Addresses all ports of all clocks.
    pub const ALL: PortIdentity = PortIdentity {
        clock_identity: ClockIdentity::ALL,
        port_number: 0xffff,
    };
}

impl fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.clock_identity, self.port_number)
    }
}

/// **clockQuality** - Quality attributes a clock announces.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ClockQuality {
    /// Traceability class of the time or frequency.
    pub clock_class: u8,
    /// Accuracy enumeration (IEEE 1588 table 5).
    pub clock_accuracy: u8,
    /// Scaled log variance of the clock's stability.
    pub offset_scaled_log_variance: u16,
}

/// **PTPText** - Length-prefixed text, at most 255 bytes on the wire.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PtpText(pub String);

impl PtpText {
    /// Longest text that fits the one-octet length field.
    pub const MAX_LEN: usize = u8::MAX as usize;

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes used on the wire, including the length octet.
    pub fn wire_len(&self) -> usize {
        1 + self.0.len()
    }
}

impl From<&str> for PtpText {
    fn from(s: &str) -> Self {
        PtpText(s.to_string())
    }
}

impl fmt::Display for PtpText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// **Timestamp** - A 48-bit seconds field and a nanoseconds field.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    /// Seconds, only the low 48 bits travel on the wire.
    pub seconds: u64,
    /// Nanoseconds, below one second.
    pub nanoseconds: u32,
}

impl Timestamp {
    /// Largest value of the 48-bit seconds field.
    pub const MAX_SECONDS: u64 = 0xffff_ffff_ffff;

    /// Returns the timestamp as floating-point seconds.
    pub fn to_f64(&self) -> f64 {
        self.seconds as f64 + self.nanoseconds as f64 / 1e9
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

/// **TimeInterval** - Nanoseconds scaled by 2^16.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimeInterval(pub i64);

impl TimeInterval {
    /// Converts to nanoseconds.
    pub fn as_nanos(&self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Builds an interval from nanoseconds.
    pub fn from_nanos(ns: f64) -> Self {
        TimeInterval((ns * 65536.0) as i64)
    }
}

/// Network protocol numbers used by [`PortAddress`].
#[allow(missing_docs)]
pub mod network_protocol {
    pub const UDP_IPV4: u16 = 1;
    pub const UDP_IPV6: u16 = 2;
    pub const IEEE_802_3: u16 = 3;
    pub const DEVICE_NET: u16 = 4;
    pub const CONTROL_NET: u16 = 5;
    pub const PROFINET: u16 = 6;
}

/// **PortAddress** - A protocol tag and its address bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PortAddress {
    /// Protocol of the address, see [`network_protocol`].
    pub network_protocol: u16,
    /// Raw address bytes.
    pub address: Binary,
}

/// A byte string with the ID and hex helpers used for PTP addresses and identities.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Binary(Vec<u8>);

const ID_SEPARATORS: &[char] = &[':', '.', '-'];

impl Binary {
    /// Creates an empty binary.
    pub fn new() -> Self {
        Binary(Vec::new())
    }

    /// Creates a binary from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Binary(bytes.to_vec())
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the byte at `pos`.
    pub fn get_bin(&self, pos: usize) -> Option<u8> {
        self.0.get(pos).copied()
    }

    /// Sets the byte at `pos`, growing with zeros if `pos` is past the end.
    pub fn set_bin(&mut self, pos: usize, val: u8) {
        if pos >= self.0.len() {
            self.0.resize(pos + 1, 0);
        }
        self.0[pos] = val;
    }

    /// Appends a byte.
    pub fn push(&mut self, val: u8) {
        self.0.push(val);
    }

    /// Clears all bytes.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Renders the bytes as colon separated hex octets, `f1:f2:f3:f4`.
    pub fn to_id(&self) -> String {
        Binary::buf_to_id(&self.0)
    }

    /// Renders any byte slice as colon separated hex octets.
    pub fn buf_to_id(buf: &[u8]) -> String {
        buf.iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Renders the bytes as contiguous hex, `f1f2f3f4`.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parses an ID string such as `f1:f2:3:f4`.
    ///
    /// Octets may be separated by `:`, `.` or `-` and hold one or two hex digits.
    pub fn from_id(text: &str) -> Option<Binary> {
        if text.len() < 2 {
            return None;
        }
        let mut out = Vec::new();
        for part in text.split(ID_SEPARATORS) {
            if part.is_empty() || part.len() > 2 {
                return None;
            }
            out.push(u8::from_str_radix(part, 16).ok()?);
        }
        Some(Binary(out))
    }

    /// Parses contiguous hex, allowing separators between groups.
    pub fn from_hex(text: &str) -> Option<Binary> {
        let digits: Vec<char> = text.chars().filter(|c| !ID_SEPARATORS.contains(c)).collect();
        if digits.is_empty() || digits.len() % 2 != 0 {
            return None;
        }
        let mut out = Vec::with_capacity(digits.len() / 2);
        for pair in digits.chunks(2) {
            let hi = pair[0].to_digit(16)?;
            let lo = pair[1].to_digit(16)?;
            out.push((hi << 4 | lo) as u8);
        }
        Some(Binary(out))
    }

    /// Parses an IPv4 or IPv6 address into its network-order bytes.
    pub fn from_ip(text: &str) -> Option<Binary> {
        match text.parse::<IpAddr>().ok()? {
            IpAddr::V4(a) => Some(Binary(a.octets().to_vec())),
            IpAddr::V6(a) => Some(Binary(a.octets().to_vec())),
        }
    }

    /// Converts a 6-octet MAC address to an 8-octet EUI-64 by inserting `ff:fe`.
    ///
    /// An 8-octet value is left as is. Returns false for any other length.
    pub fn eui48_to_eui64(&mut self) -> bool {
        match self.0.len() {
            8 => true,
            6 => {
                let mut v = Vec::with_capacity(8);
                v.extend_from_slice(&self.0[..3]);
                v.extend_from_slice(&[0xff, 0xfe]);
                v.extend_from_slice(&self.0[3..]);
                self.0 = v;
                true
            }
            _ => false,
        }
    }
}

impl From<Vec<u8>> for Binary {
    fn from(v: Vec<u8>) -> Self {
        Binary(v)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_id())
    }
}
