// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! linuxptp configuration file reader.
//!
//! Reads the subset of `ptp4l.conf` a management client needs: the transport and
//! domain values that go into the message header, and the daemon's Unix socket
//! address. Values are validated while reading; a file with a malformed line or
//! an out-of-range value is rejected as a whole.
//!
//! Lookups take an optional section name (usually a port interface). A key missing
//! from the section falls back to `[global]`, then to the built-in default.
//!
//! ```
//! use ptp_client::ConfigFile;
//!
//! let cfg = ConfigFile::parse_str(
//!     "[global]\ndomainNumber 4\n\n[eth0]\ndomainNumber 7\n",
//! ).unwrap();
//! assert_eq!(cfg.domain_number(None), 4);
//! assert_eq!(cfg.domain_number(Some("eth0")), 7);
//! assert_eq!(cfg.domain_number(Some("eth1")), 4);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use ptp_proto::protocol::Binary;

use crate::error::{ConfigError, MngError};

/// Default linuxptp configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/linuxptp/ptp4l.conf";

/// Default ptp4l Unix socket address.
pub const DEFAULT_UDS_ADDRESS: &str = "/var/run/ptp4l";

const GLOBAL_SECTION: &str = "global";

/// Network transport selected by `network_transport`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NetworkTransport {
    /// UDP over IPv4.
    #[default]
    UdpV4,
    /// UDP over IPv6.
    UdpV6,
    /// Raw Ethernet.
    L2,
}

impl NetworkTransport {
    fn from_config(value: &str) -> Option<NetworkTransport> {
        match value {
            "UDPv4" => Some(NetworkTransport::UdpV4),
            "UDPv6" => Some(NetworkTransport::UdpV6),
            "L2" => Some(NetworkTransport::L2),
            _ => None,
        }
    }
}

impl fmt::Display for NetworkTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkTransport::UdpV4 => "UDPv4",
            NetworkTransport::UdpV6 => "UDPv6",
            NetworkTransport::L2 => "L2",
        })
    }
}

/// Values read from one section. Keys not present stay `None`.
#[derive(Clone, Debug, Default)]
struct Section {
    transport_specific: Option<u8>,
    domain_number: Option<u8>,
    udp6_scope: Option<u8>,
    udp_ttl: Option<u8>,
    socket_priority: Option<u8>,
    network_transport: Option<NetworkTransport>,
    uds_address: Option<String>,
    ptp_dst_mac: Option<Binary>,
    p2p_dst_mac: Option<Binary>,
}

impl Section {
    /// Store one `key value` pair. Unknown keys are ignored.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let bad = || ConfigError::Value {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "transportSpecific" | "transport_specific" => {
                self.transport_specific = Some(parse_ranged(value, 0, 0x0f).ok_or_else(bad)?)
            }
            "domainNumber" => self.domain_number = Some(parse_ranged(value, 0, 255).ok_or_else(bad)?),
            "udp6_scope" => self.udp6_scope = Some(parse_ranged(value, 0, 0x0f).ok_or_else(bad)?),
            "udp_ttl" => self.udp_ttl = Some(parse_ranged(value, 1, 255).ok_or_else(bad)?),
            "socket_priority" => {
                self.socket_priority = Some(parse_ranged(value, 0, 15).ok_or_else(bad)?)
            }
            "network_transport" => {
                self.network_transport =
                    Some(NetworkTransport::from_config(value).ok_or_else(bad)?)
            }
            "uds_address" => self.uds_address = Some(value.to_string()),
            "ptp_dst_mac" => self.ptp_dst_mac = Some(parse_mac(value).ok_or_else(bad)?),
            "p2p_dst_mac" => self.p2p_dst_mac = Some(parse_mac(value).ok_or_else(bad)?),
            _ => {}
        }
        Ok(())
    }
}

/// Parse a decimal or `0x` hexadecimal integer within `[min, max]`.
fn parse_ranged(value: &str, min: u8, max: u8) -> Option<u8> {
    let n = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => value.parse::<i64>().ok()?,
    };
    if n < i64::from(min) || n > i64::from(max) {
        return None;
    }
    u8::try_from(n).ok()
}

fn parse_mac(value: &str) -> Option<Binary> {
    Binary::from_id(value).filter(|b| b.len() == 6)
}

/// Parsed linuxptp configuration file.
#[derive(Clone, Debug, Default)]
pub struct ConfigFile {
    global: Section,
    sections: HashMap<String, Section>,
}

impl ConfigFile {
    /// Read and parse a configuration file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<ConfigFile, MngError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cfg = ConfigFile::parse_str(&text)?;
        debug!(
            "read config {} ({} port sections)",
            path.display(),
            cfg.sections.len()
        );
        Ok(cfg)
    }

    /// Parse configuration text.
    pub fn parse_str(text: &str) -> Result<ConfigFile, ConfigError> {
        let mut cfg = ConfigFile::default();
        let mut current = GLOBAL_SECTION.to_string();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let syntax = || ConfigError::Syntax {
                line: n + 1,
                text: line.to_string(),
            };
            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(syntax)?.trim();
                if name.is_empty() {
                    return Err(syntax());
                }
                current = name.to_string();
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or_default();
            let value = parts.next().map(str::trim).unwrap_or_default();
            if value.is_empty() {
                return Err(syntax());
            }
            cfg.section_mut(&current).set(key, value)?;
        }
        Ok(cfg)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == GLOBAL_SECTION {
            &mut self.global
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }

    /// Look up a value in `section`, then in `[global]`.
    fn lookup<T>(&self, section: Option<&str>, get: impl Fn(&Section) -> Option<T>) -> Option<T> {
        section
            .and_then(|name| self.sections.get(name))
            .and_then(&get)
            .or_else(|| get(&self.global))
    }

    /// `transportSpecific`, default 0.
    pub fn transport_specific(&self, section: Option<&str>) -> u8 {
        self.lookup(section, |s| s.transport_specific).unwrap_or(0)
    }

    /// `domainNumber`, default 0.
    pub fn domain_number(&self, section: Option<&str>) -> u8 {
        self.lookup(section, |s| s.domain_number).unwrap_or(0)
    }

    /// `udp6_scope`, default 0x0e.
    pub fn udp6_scope(&self, section: Option<&str>) -> u8 {
        self.lookup(section, |s| s.udp6_scope).unwrap_or(0x0e)
    }

    /// `udp_ttl`, default 1.
    pub fn udp_ttl(&self, section: Option<&str>) -> u8 {
        self.lookup(section, |s| s.udp_ttl).unwrap_or(1)
    }

    /// `socket_priority`, default 0.
    pub fn socket_priority(&self, section: Option<&str>) -> u8 {
        self.lookup(section, |s| s.socket_priority).unwrap_or(0)
    }

    /// `network_transport`, default UDPv4.
    pub fn network_transport(&self, section: Option<&str>) -> NetworkTransport {
        self.lookup(section, |s| s.network_transport).unwrap_or_default()
    }

    /// `uds_address`, default [`DEFAULT_UDS_ADDRESS`].
    pub fn uds_address(&self, section: Option<&str>) -> String {
        self.lookup(section, |s| s.uds_address.clone())
            .unwrap_or_else(|| DEFAULT_UDS_ADDRESS.to_string())
    }

    /// `ptp_dst_mac`, default 01:1B:19:00:00:00.
    pub fn ptp_dst_mac(&self, section: Option<&str>) -> Binary {
        self.lookup(section, |s| s.ptp_dst_mac.clone())
            .unwrap_or_else(|| Binary::from_bytes(&[0x01, 0x1b, 0x19, 0, 0, 0]))
    }

    /// `p2p_dst_mac`, default 01:80:C2:00:00:0E.
    pub fn p2p_dst_mac(&self, section: Option<&str>) -> Binary {
        self.lookup(section, |s| s.p2p_dst_mac.clone())
            .unwrap_or_else(|| Binary::from_bytes(&[0x01, 0x80, 0xc2, 0, 0, 0x0e]))
    }

    /// Whether a port section with this name was present.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }
}
