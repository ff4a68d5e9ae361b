// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Typed management TLV payloads.
//!
//! Each struct mirrors the dataField of one management ID. [`MngTlv`] wraps
//! them all and is what [`Message`](crate::message::Message) sends and
//! returns. Field order and widths follow IEEE 1588-2019 clause 15.5 and the
//! linuxptp `*_NP` extensions. Single-octet values are followed by a reserved
//! pad octet, which the message builder adds.

use byteorder::{ReadBytesExt, WriteBytesExt, BE, LE};
use std::io::{self, Cursor};

use crate::error::ParseError;
use crate::ids::MngId;
use crate::protocol::{
    Binary, ClockIdentity, ClockQuality, PortAddress, PortIdentity, PtpText, ReadBytes,
    ReadFromBytes, TimeInterval, Timestamp, WriteBytes, WriteToBytes,
};

/// Flag bits of the default data set.
pub mod default_ds_flags {
    /// Two-step clock.
    pub const TWO_STEP: u8 = 1 << 0;
    /// Slave-only clock.
    pub const SLAVE_ONLY: u8 = 1 << 1;
}

/// Flag bits of the time properties data set.
pub mod time_flags {
    /// Leap second at the end of the day: 61 seconds.
    pub const LEAP_61: u8 = 1 << 0;
    /// Leap second at the end of the day: 59 seconds.
    pub const LEAP_59: u8 = 1 << 1;
    /// The current UTC offset is valid.
    pub const UTC_OFF_VALID: u8 = 1 << 2;
    /// The timescale is PTP.
    pub const PTP_TIMESCALE: u8 = 1 << 3;
    /// The time is traceable to a primary reference.
    pub const TIME_TRACEABLE: u8 = 1 << 4;
    /// The frequency is traceable to a primary reference.
    pub const FREQ_TRACEABLE: u8 = 1 << 5;
}

/// Event numbers for [`SubscribeEventsNp`].
pub mod events {
    /// Port state changes.
    pub const NOTIFY_PORT_STATE: u16 = 0;
    /// Time synchronization status.
    pub const NOTIFY_TIME_SYNC: u16 = 1;
    /// Parent data set changes.
    pub const NOTIFY_PARENT_DATA_SET: u16 = 2;
    /// Common mean link delay service.
    pub const NOTIFY_CMLDS: u16 = 3;
}

/// Values with a one-octet wire form.
trait OctetField: Sized + Copy {
    fn read<R: ReadBytesExt>(reader: &mut R) -> io::Result<Self>;
    fn write<W: WriteBytesExt>(self, writer: &mut W) -> io::Result<()>;
}

impl OctetField for u8 {
    fn read<R: ReadBytesExt>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
    fn write<W: WriteBytesExt>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self)
    }
}

impl OctetField for i8 {
    fn read<R: ReadBytesExt>(reader: &mut R) -> io::Result<Self> {
        reader.read_i8()
    }
    fn write<W: WriteBytesExt>(self, writer: &mut W) -> io::Result<()> {
        writer.write_i8(self)
    }
}

// TLVs made of a single octet value.
macro_rules! octet_tlv {
    ($($(#[$meta:meta])* $name:ident { $field:ident: $ty:ty })*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
            pub struct $name {
                #[allow(missing_docs)]
                pub $field: $ty,
            }

            impl WriteToBytes for $name {
                fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
                    self.$field.write(&mut writer)
                }
            }

            impl ReadFromBytes for $name {
                fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
                    Ok($name {
                        $field: <$ty as OctetField>::read(&mut reader)?,
                    })
                }
            }
        )*
    };
}

octet_tlv! {
    /// PRIORITY1 - first priority of the best master clock algorithm.
    Priority1 { priority1: u8 }
    /// PRIORITY2 - second priority of the best master clock algorithm.
    Priority2 { priority2: u8 }
    /// DOMAIN - PTP domain of the clock.
    Domain { domain_number: u8 }
    /// SLAVE_ONLY - bit 0 set makes the clock slave only.
    SlaveOnly { flags: u8 }
    /// LOG_ANNOUNCE_INTERVAL
    LogAnnounceInterval { log_announce_interval: i8 }
    /// ANNOUNCE_RECEIPT_TIMEOUT
    AnnounceReceiptTimeout { announce_receipt_timeout: u8 }
    /// LOG_SYNC_INTERVAL
    LogSyncInterval { log_sync_interval: i8 }
    /// VERSION_NUMBER - PTP version in the low nibble.
    VersionNumber { version_number: u8 }
    /// CLOCK_ACCURACY
    ClockAccuracy { clock_accuracy: u8 }
    /// TRACEABILITY_PROPERTIES - time and frequency traceable flags.
    TraceabilityProperties { flags: u8 }
    /// UNICAST_NEGOTIATION_ENABLE
    UnicastNegotiationEnable { flags: u8 }
    /// PATH_TRACE_ENABLE
    PathTraceEnable { flags: u8 }
    /// ACCEPTABLE_MASTER_TABLE_ENABLED
    AcceptableMasterTableEnabled { flags: u8 }
    /// ALTERNATE_TIME_OFFSET_MAX_KEY
    AlternateTimeOffsetMaxKey { max_key: u8 }
    /// PRIMARY_DOMAIN
    PrimaryDomain { primary_domain: u8 }
    /// DELAY_MECHANISM
    DelayMechanism { delay_mechanism: u8 }
    /// LOG_MIN_PDELAY_REQ_INTERVAL
    LogMinPdelayReqInterval { log_min_pdelay_req_interval: i8 }
    /// EXTERNAL_PORT_CONFIGURATION_ENABLED
    ExternalPortConfigurationEnabled { flags: u8 }
    /// MASTER_ONLY
    MasterOnly { flags: u8 }
    /// HOLDOVER_UPGRADE_ENABLE
    HoldoverUpgradeEnable { flags: u8 }
    /// SYNCHRONIZATION_UNCERTAIN_NP - 0 false, 1 true, 0xff don't care.
    SynchronizationUncertainNp { val: u8 }
}

/// CLOCK_DESCRIPTION - static description of a PTP instance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClockDescription {
    /// Clock type bit field.
    pub clock_type: u16,
    /// Physical layer protocol name.
    pub physical_layer_protocol: PtpText,
    /// Physical address, e.g. a MAC address.
    pub physical_address: Binary,
    /// Protocol address of the port.
    pub protocol_address: PortAddress,
    /// Organizationally unique identifier of the manufacturer.
    pub manufacturer_identity: [u8; 3],
    /// Product description, `manufacturer;model;serial`.
    pub product_description: PtpText,
    /// Revision data, `hardware;firmware;software`.
    pub revision_data: PtpText,
    /// User description.
    pub user_description: PtpText,
    /// Profile identity.
    pub profile_identity: [u8; 6],
}

impl WriteToBytes for ClockDescription {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.clock_type)?;
        writer.write_bytes(&self.physical_layer_protocol)?;
        writer.write_bytes(&self.physical_address)?;
        writer.write_bytes(&self.protocol_address)?;
        writer.write_all(&self.manufacturer_identity)?;
        writer.write_u8(0)?;
        writer.write_bytes(&self.product_description)?;
        writer.write_bytes(&self.revision_data)?;
        writer.write_bytes(&self.user_description)?;
        writer.write_all(&self.profile_identity)?;
        Ok(())
    }
}

impl ReadFromBytes for ClockDescription {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let clock_type = reader.read_u16::<BE>()?;
        let physical_layer_protocol = reader.read_bytes()?;
        let physical_address = reader.read_bytes()?;
        let protocol_address = reader.read_bytes()?;
        let mut manufacturer_identity = [0u8; 3];
        reader.read_exact(&mut manufacturer_identity)?;
        let _reserved = reader.read_u8()?;
        let product_description = reader.read_bytes()?;
        let revision_data = reader.read_bytes()?;
        let user_description = reader.read_bytes()?;
        let mut profile_identity = [0u8; 6];
        reader.read_exact(&mut profile_identity)?;
        Ok(ClockDescription {
            clock_type,
            physical_layer_protocol,
            physical_address,
            protocol_address,
            manufacturer_identity,
            product_description,
            revision_data,
            user_description,
            profile_identity,
        })
    }
}

/// USER_DESCRIPTION
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserDescription {
    /// Free text, usually `name;location`.
    pub user_description: PtpText,
}

impl WriteToBytes for UserDescription {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(&self.user_description)
    }
}

impl ReadFromBytes for UserDescription {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(UserDescription {
            user_description: reader.read_bytes()?,
        })
    }
}

/// INITIALIZE
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Initialize {
    /// 0 resets the clock to its initial state.
    pub initialization_key: u16,
}

impl WriteToBytes for Initialize {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.initialization_key)
    }
}

impl ReadFromBytes for Initialize {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(Initialize {
            initialization_key: reader.read_u16::<BE>()?,
        })
    }
}

/// One entry of the fault log.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FaultRecord {
    /// When the fault happened.
    pub fault_time: Timestamp,
    /// Severity, 0 emergency to 7 debug.
    pub severity_code: u8,
    /// Fault name.
    pub fault_name: PtpText,
    /// Value associated with the fault.
    pub fault_value: PtpText,
    /// Fault description.
    pub fault_description: PtpText,
}

impl FaultRecord {
    /// Size on the wire, including the leading length field.
    pub fn wire_len(&self) -> usize {
        2 + 10
            + 1
            + self.fault_name.wire_len()
            + self.fault_value.wire_len()
            + self.fault_description.wire_len()
    }
}

/// FAULT_LOG
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FaultLog {
    /// Recorded faults.
    pub records: Vec<FaultRecord>,
}

impl FaultLog {
    fn read(reader: &mut Cursor<&[u8]>) -> Result<Self, ParseError> {
        let to_err = |e: io::Error| ParseError::from_io(&e);
        let count = reader.read_u16::<BE>().map_err(to_err)?;
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let declared = reader.read_u16::<BE>().map_err(to_err)? as usize;
            let record = FaultRecord {
                fault_time: reader.read_bytes().map_err(to_err)?,
                severity_code: reader.read_u8().map_err(to_err)?,
                fault_name: reader.read_bytes().map_err(to_err)?,
                fault_value: reader.read_bytes().map_err(to_err)?,
                fault_description: reader.read_bytes().map_err(to_err)?,
            };
            if declared != record.wire_len() {
                return Err(ParseError::SizeMiss);
            }
            records.push(record);
        }
        Ok(FaultLog { records })
    }
}

impl WriteToBytes for FaultLog {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.records.len() as u16)?;
        for r in &self.records {
            writer.write_u16::<BE>(r.wire_len() as u16)?;
            writer.write_bytes(r.fault_time)?;
            writer.write_u8(r.severity_code)?;
            writer.write_bytes(&r.fault_name)?;
            writer.write_bytes(&r.fault_value)?;
            writer.write_bytes(&r.fault_description)?;
        }
        Ok(())
    }
}

/// DEFAULT_DATA_SET
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DefaultDataSet {
    /// See [`default_ds_flags`].
    pub flags: u8,
    /// Number of PTP ports.
    pub number_ports: u16,
    /// Priority 1.
    pub priority1: u8,
    /// Clock quality.
    pub clock_quality: ClockQuality,
    /// Priority 2.
    pub priority2: u8,
    /// Clock identity.
    pub clock_identity: ClockIdentity,
    /// Domain number.
    pub domain_number: u8,
}

impl WriteToBytes for DefaultDataSet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.flags)?;
        writer.write_u8(0)?;
        writer.write_u16::<BE>(self.number_ports)?;
        writer.write_u8(self.priority1)?;
        writer.write_bytes(self.clock_quality)?;
        writer.write_u8(self.priority2)?;
        writer.write_bytes(self.clock_identity)?;
        writer.write_u8(self.domain_number)?;
        Ok(())
    }
}

impl ReadFromBytes for DefaultDataSet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let flags = reader.read_u8()?;
        let _reserved = reader.read_u8()?;
        Ok(DefaultDataSet {
            flags,
            number_ports: reader.read_u16::<BE>()?,
            priority1: reader.read_u8()?,
            clock_quality: reader.read_bytes()?,
            priority2: reader.read_u8()?,
            clock_identity: reader.read_bytes()?,
            domain_number: reader.read_u8()?,
        })
    }
}

/// CURRENT_DATA_SET
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CurrentDataSet {
    /// Hops to the grandmaster.
    pub steps_removed: u16,
    /// Offset from the master.
    pub offset_from_master: TimeInterval,
    /// Mean path delay to the master.
    pub mean_path_delay: TimeInterval,
}

impl WriteToBytes for CurrentDataSet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.steps_removed)?;
        writer.write_bytes(self.offset_from_master)?;
        writer.write_bytes(self.mean_path_delay)?;
        Ok(())
    }
}

impl ReadFromBytes for CurrentDataSet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(CurrentDataSet {
            steps_removed: reader.read_u16::<BE>()?,
            offset_from_master: reader.read_bytes()?,
            mean_path_delay: reader.read_bytes()?,
        })
    }
}

/// PARENT_DATA_SET
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParentDataSet {
    /// Port identity of the parent.
    pub parent_port_identity: PortIdentity,
    /// Bit 0: parent statistics are computed.
    pub flags: u8,
    /// Observed variance of the parent.
    pub observed_parent_offset_scaled_log_variance: u16,
    /// Observed phase change rate of the parent.
    pub observed_parent_clock_phase_change_rate: i32,
    /// Grandmaster priority 1.
    pub grandmaster_priority1: u8,
    /// Grandmaster clock quality.
    pub grandmaster_clock_quality: ClockQuality,
    /// Grandmaster priority 2.
    pub grandmaster_priority2: u8,
    /// Grandmaster identity.
    pub grandmaster_identity: ClockIdentity,
}

impl WriteToBytes for ParentDataSet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.parent_port_identity)?;
        writer.write_u8(self.flags)?;
        writer.write_u8(0)?;
        writer.write_u16::<BE>(self.observed_parent_offset_scaled_log_variance)?;
        writer.write_i32::<BE>(self.observed_parent_clock_phase_change_rate)?;
        writer.write_u8(self.grandmaster_priority1)?;
        writer.write_bytes(self.grandmaster_clock_quality)?;
        writer.write_u8(self.grandmaster_priority2)?;
        writer.write_bytes(self.grandmaster_identity)?;
        Ok(())
    }
}

impl ReadFromBytes for ParentDataSet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let parent_port_identity = reader.read_bytes()?;
        let flags = reader.read_u8()?;
        let _reserved = reader.read_u8()?;
        Ok(ParentDataSet {
            parent_port_identity,
            flags,
            observed_parent_offset_scaled_log_variance: reader.read_u16::<BE>()?,
            observed_parent_clock_phase_change_rate: reader.read_i32::<BE>()?,
            grandmaster_priority1: reader.read_u8()?,
            grandmaster_clock_quality: reader.read_bytes()?,
            grandmaster_priority2: reader.read_u8()?,
            grandmaster_identity: reader.read_bytes()?,
        })
    }
}

/// TIME_PROPERTIES_DATA_SET
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimePropertiesDataSet {
    /// TAI - UTC in seconds.
    pub current_utc_offset: i16,
    /// See [`time_flags`].
    pub flags: u8,
    /// Time source enumeration.
    pub time_source: u8,
}

impl WriteToBytes for TimePropertiesDataSet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i16::<BE>(self.current_utc_offset)?;
        writer.write_u8(self.flags)?;
        writer.write_u8(self.time_source)?;
        Ok(())
    }
}

impl ReadFromBytes for TimePropertiesDataSet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(TimePropertiesDataSet {
            current_utc_offset: reader.read_i16::<BE>()?,
            flags: reader.read_u8()?,
            time_source: reader.read_u8()?,
        })
    }
}

/// PORT_DATA_SET
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortDataSet {
    /// Port identity.
    pub port_identity: PortIdentity,
    /// Port state enumeration.
    pub port_state: u8,
    /// Log2 of the minimum delay request interval.
    pub log_min_delay_req_interval: i8,
    /// Peer mean path delay.
    pub peer_mean_path_delay: TimeInterval,
    /// Log2 of the announce interval.
    pub log_announce_interval: i8,
    /// Announce intervals before timeout.
    pub announce_receipt_timeout: u8,
    /// Log2 of the sync interval.
    pub log_sync_interval: i8,
    /// Delay mechanism enumeration.
    pub delay_mechanism: u8,
    /// Log2 of the minimum peer delay request interval.
    pub log_min_pdelay_req_interval: i8,
    /// PTP version in the low nibble.
    pub version_number: u8,
}

impl WriteToBytes for PortDataSet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.port_identity)?;
        writer.write_u8(self.port_state)?;
        writer.write_i8(self.log_min_delay_req_interval)?;
        writer.write_bytes(self.peer_mean_path_delay)?;
        writer.write_i8(self.log_announce_interval)?;
        writer.write_u8(self.announce_receipt_timeout)?;
        writer.write_i8(self.log_sync_interval)?;
        writer.write_u8(self.delay_mechanism)?;
        writer.write_i8(self.log_min_pdelay_req_interval)?;
        writer.write_u8(self.version_number)?;
        Ok(())
    }
}

impl ReadFromBytes for PortDataSet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(PortDataSet {
            port_identity: reader.read_bytes()?,
            port_state: reader.read_u8()?,
            log_min_delay_req_interval: reader.read_i8()?,
            peer_mean_path_delay: reader.read_bytes()?,
            log_announce_interval: reader.read_i8()?,
            announce_receipt_timeout: reader.read_u8()?,
            log_sync_interval: reader.read_i8()?,
            delay_mechanism: reader.read_u8()?,
            log_min_pdelay_req_interval: reader.read_i8()?,
            version_number: reader.read_u8()?,
        })
    }
}

/// TIME
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Time {
    /// Current PTP time of the clock.
    pub current_time: Timestamp,
}

impl WriteToBytes for Time {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.current_time)
    }
}

impl ReadFromBytes for Time {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(Time {
            current_time: reader.read_bytes()?,
        })
    }
}

/// UTC_PROPERTIES
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UtcProperties {
    /// TAI - UTC in seconds.
    pub current_utc_offset: i16,
    /// Leap and validity flags, see [`time_flags`].
    pub flags: u8,
}

impl WriteToBytes for UtcProperties {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i16::<BE>(self.current_utc_offset)?;
        writer.write_u8(self.flags)?;
        Ok(())
    }
}

impl ReadFromBytes for UtcProperties {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(UtcProperties {
            current_utc_offset: reader.read_i16::<BE>()?,
            flags: reader.read_u8()?,
        })
    }
}

/// TIMESCALE_PROPERTIES
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimescaleProperties {
    /// PTP timescale flag.
    pub flags: u8,
    /// Time source enumeration.
    pub time_source: u8,
}

impl WriteToBytes for TimescaleProperties {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.flags)?;
        writer.write_u8(self.time_source)?;
        Ok(())
    }
}

impl ReadFromBytes for TimescaleProperties {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(TimescaleProperties {
            flags: reader.read_u8()?,
            time_source: reader.read_u8()?,
        })
    }
}

/// PATH_TRACE_LIST
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathTraceList {
    /// Clock identities on the path to the grandmaster.
    pub path_sequence: Vec<ClockIdentity>,
}

impl PathTraceList {
    fn read(reader: &mut Cursor<&[u8]>) -> Result<Self, ParseError> {
        let count = reader.get_ref().len() / 8;
        let mut path_sequence = Vec::with_capacity(count);
        for _ in 0..count {
            path_sequence.push(reader.read_bytes().map_err(|e| ParseError::from_io(&e))?);
        }
        Ok(PathTraceList { path_sequence })
    }
}

impl WriteToBytes for PathTraceList {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        for id in &self.path_sequence {
            writer.write_bytes(id)?;
        }
        Ok(())
    }
}

/// UNICAST_MASTER_MAX_TABLE_SIZE and ACCEPTABLE_MASTER_MAX_TABLE_SIZE
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MaxTableSize {
    /// Maximum number of table entries.
    pub max_table_size: u16,
}

impl WriteToBytes for MaxTableSize {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.max_table_size)
    }
}

impl ReadFromBytes for MaxTableSize {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(MaxTableSize {
            max_table_size: reader.read_u16::<BE>()?,
        })
    }
}

/// ALTERNATE_TIME_OFFSET_ENABLE
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AlternateTimeOffsetEnable {
    /// Alternate timescale key.
    pub key_field: u8,
    /// Bit 0 enables the offset.
    pub flags: u8,
}

impl WriteToBytes for AlternateTimeOffsetEnable {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.key_field)?;
        writer.write_u8(self.flags)?;
        Ok(())
    }
}

impl ReadFromBytes for AlternateTimeOffsetEnable {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(AlternateTimeOffsetEnable {
            key_field: reader.read_u8()?,
            flags: reader.read_u8()?,
        })
    }
}

/// TIME_STATUS_NP - linuxptp synchronization status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeStatusNp {
    /// Offset from master in nanoseconds.
    pub master_offset: i64,
    /// Ingress time of the last sync in nanoseconds.
    pub ingress_time: i64,
    /// Scaled rate offset accumulated along the path.
    pub cumulative_scaled_rate_offset: i32,
    /// Scaled last grandmaster phase change.
    pub scaled_last_gm_phase_change: i32,
    /// Grandmaster time base indicator.
    pub gm_time_base_indicator: u16,
    /// Last grandmaster phase change, high nanoseconds.
    pub nanoseconds_msb: u16,
    /// Last grandmaster phase change, low nanoseconds.
    pub nanoseconds_lsb: u64,
    /// Last grandmaster phase change, fractional nanoseconds.
    pub fractional_nanoseconds: u16,
    /// Non zero when a grandmaster is present.
    pub gm_present: i32,
    /// Grandmaster identity.
    pub gm_identity: ClockIdentity,
}

impl WriteToBytes for TimeStatusNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i64::<BE>(self.master_offset)?;
        writer.write_i64::<BE>(self.ingress_time)?;
        writer.write_i32::<BE>(self.cumulative_scaled_rate_offset)?;
        writer.write_i32::<BE>(self.scaled_last_gm_phase_change)?;
        writer.write_u16::<BE>(self.gm_time_base_indicator)?;
        writer.write_u16::<BE>(self.nanoseconds_msb)?;
        writer.write_u64::<BE>(self.nanoseconds_lsb)?;
        writer.write_u16::<BE>(self.fractional_nanoseconds)?;
        writer.write_i32::<BE>(self.gm_present)?;
        writer.write_bytes(self.gm_identity)?;
        Ok(())
    }
}

impl ReadFromBytes for TimeStatusNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(TimeStatusNp {
            master_offset: reader.read_i64::<BE>()?,
            ingress_time: reader.read_i64::<BE>()?,
            cumulative_scaled_rate_offset: reader.read_i32::<BE>()?,
            scaled_last_gm_phase_change: reader.read_i32::<BE>()?,
            gm_time_base_indicator: reader.read_u16::<BE>()?,
            nanoseconds_msb: reader.read_u16::<BE>()?,
            nanoseconds_lsb: reader.read_u64::<BE>()?,
            fractional_nanoseconds: reader.read_u16::<BE>()?,
            gm_present: reader.read_i32::<BE>()?,
            gm_identity: reader.read_bytes()?,
        })
    }
}

/// GRANDMASTER_SETTINGS_NP
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GrandmasterSettingsNp {
    /// Quality announced as grandmaster.
    pub clock_quality: ClockQuality,
    /// TAI - UTC in seconds.
    pub current_utc_offset: i16,
    /// See [`time_flags`].
    pub flags: u8,
    /// Time source enumeration.
    pub time_source: u8,
}

impl WriteToBytes for GrandmasterSettingsNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.clock_quality)?;
        writer.write_i16::<BE>(self.current_utc_offset)?;
        writer.write_u8(self.flags)?;
        writer.write_u8(self.time_source)?;
        Ok(())
    }
}

impl ReadFromBytes for GrandmasterSettingsNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(GrandmasterSettingsNp {
            clock_quality: reader.read_bytes()?,
            current_utc_offset: reader.read_i16::<BE>()?,
            flags: reader.read_u8()?,
            time_source: reader.read_u8()?,
        })
    }
}

/// PORT_DATA_SET_NP
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortDataSetNp {
    /// Neighbor propagation delay threshold in nanoseconds.
    pub neighbor_prop_delay_thresh: u32,
    /// Non zero when the port is 802.1AS capable.
    pub as_capable: i32,
}

impl WriteToBytes for PortDataSetNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<BE>(self.neighbor_prop_delay_thresh)?;
        writer.write_i32::<BE>(self.as_capable)?;
        Ok(())
    }
}

impl ReadFromBytes for PortDataSetNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(PortDataSetNp {
            neighbor_prop_delay_thresh: reader.read_u32::<BE>()?,
            as_capable: reader.read_i32::<BE>()?,
        })
    }
}

/// Number of octets in the event bitmask.
pub const EVENT_BITMASK_CNT: usize = 64;

/// SUBSCRIBE_EVENTS_NP - subscription to linuxptp push notifications.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubscribeEventsNp {
    /// Subscription lifetime in seconds.
    pub duration: u16,
    /// One bit per event number.
    pub bitmask: [u8; EVENT_BITMASK_CNT],
}

impl Default for SubscribeEventsNp {
    fn default() -> Self {
        SubscribeEventsNp {
            duration: 0,
            bitmask: [0; EVENT_BITMASK_CNT],
        }
    }
}

impl SubscribeEventsNp {
    const MAX_EVENT: u16 = (EVENT_BITMASK_CNT * 8) as u16;

    fn locate(event: u16) -> Option<(usize, u8)> {
        (event < Self::MAX_EVENT).then(|| ((event / 8) as usize, 1u8 << (event % 8)))
    }

    /// Sets an event bit. Events outside the bitmask are ignored.
    pub fn set_event(&mut self, event: u16) {
        if let Some((byte, mask)) = Self::locate(event) {
            self.bitmask[byte] |= mask;
        }
    }

    /// Clears an event bit.
    pub fn clear_event(&mut self, event: u16) {
        if let Some((byte, mask)) = Self::locate(event) {
            self.bitmask[byte] &= !mask;
        }
    }

    /// Tests an event bit.
    pub fn get_event(&self, event: u16) -> bool {
        Self::locate(event).is_some_and(|(byte, mask)| self.bitmask[byte] & mask != 0)
    }

    /// Clears every event bit.
    pub fn clear_all(&mut self) {
        self.bitmask = [0; EVENT_BITMASK_CNT];
    }
}

impl WriteToBytes for SubscribeEventsNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.duration)?;
        writer.write_all(&self.bitmask)?;
        Ok(())
    }
}

impl ReadFromBytes for SubscribeEventsNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let duration = reader.read_u16::<BE>()?;
        let mut bitmask = [0u8; EVENT_BITMASK_CNT];
        reader.read_exact(&mut bitmask)?;
        Ok(SubscribeEventsNp { duration, bitmask })
    }
}

/// PORT_PROPERTIES_NP
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PortPropertiesNp {
    /// Port identity.
    pub port_identity: PortIdentity,
    /// Port state enumeration.
    pub port_state: u8,
    /// Timestamping mode enumeration.
    pub timestamping: u8,
    /// Network interface name.
    pub interface: PtpText,
}

impl WriteToBytes for PortPropertiesNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.port_identity)?;
        writer.write_u8(self.port_state)?;
        writer.write_u8(self.timestamping)?;
        writer.write_bytes(&self.interface)?;
        Ok(())
    }
}

impl ReadFromBytes for PortPropertiesNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(PortPropertiesNp {
            port_identity: reader.read_bytes()?,
            port_state: reader.read_u8()?,
            timestamping: reader.read_u8()?,
            interface: reader.read_bytes()?,
        })
    }
}

/// Number of PTP message types counted in [`PortStatsNp`].
pub const MAX_MESSAGE_TYPES: usize = 16;

/// PORT_STATS_NP - per-port message counters.
///
/// linuxptp sends the counters in host (little endian) order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PortStatsNp {
    /// Port identity.
    pub port_identity: PortIdentity,
    /// Received message count per message type.
    pub rx_msg_type: [u64; MAX_MESSAGE_TYPES],
    /// Sent message count per message type.
    pub tx_msg_type: [u64; MAX_MESSAGE_TYPES],
}

impl WriteToBytes for PortStatsNp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.port_identity)?;
        for v in self.rx_msg_type.iter().chain(self.tx_msg_type.iter()) {
            writer.write_u64::<LE>(*v)?;
        }
        Ok(())
    }
}

impl ReadFromBytes for PortStatsNp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let mut stats = PortStatsNp {
            port_identity: reader.read_bytes()?,
            ..PortStatsNp::default()
        };
        for v in stats.rx_msg_type.iter_mut() {
            *v = reader.read_u64::<LE>()?;
        }
        for v in stats.tx_msg_type.iter_mut() {
            *v = reader.read_u64::<LE>()?;
        }
        Ok(stats)
    }
}

/// The dataField of a management TLV, typed by its ID.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MngTlv {
    ClockDescription(ClockDescription),
    UserDescription(UserDescription),
    Initialize(Initialize),
    FaultLog(FaultLog),
    DefaultDataSet(DefaultDataSet),
    CurrentDataSet(CurrentDataSet),
    ParentDataSet(ParentDataSet),
    TimePropertiesDataSet(TimePropertiesDataSet),
    PortDataSet(PortDataSet),
    Priority1(Priority1),
    Priority2(Priority2),
    Domain(Domain),
    SlaveOnly(SlaveOnly),
    LogAnnounceInterval(LogAnnounceInterval),
    AnnounceReceiptTimeout(AnnounceReceiptTimeout),
    LogSyncInterval(LogSyncInterval),
    VersionNumber(VersionNumber),
    Time(Time),
    ClockAccuracy(ClockAccuracy),
    UtcProperties(UtcProperties),
    TraceabilityProperties(TraceabilityProperties),
    TimescaleProperties(TimescaleProperties),
    UnicastNegotiationEnable(UnicastNegotiationEnable),
    PathTraceList(PathTraceList),
    PathTraceEnable(PathTraceEnable),
    UnicastMasterMaxTableSize(MaxTableSize),
    AcceptableMasterTableEnabled(AcceptableMasterTableEnabled),
    AcceptableMasterMaxTableSize(MaxTableSize),
    AlternateTimeOffsetEnable(AlternateTimeOffsetEnable),
    AlternateTimeOffsetMaxKey(AlternateTimeOffsetMaxKey),
    LogMinPdelayReqInterval(LogMinPdelayReqInterval),
    PrimaryDomain(PrimaryDomain),
    DelayMechanism(DelayMechanism),
    ExternalPortConfigurationEnabled(ExternalPortConfigurationEnabled),
    MasterOnly(MasterOnly),
    HoldoverUpgradeEnable(HoldoverUpgradeEnable),
    TimeStatusNp(TimeStatusNp),
    GrandmasterSettingsNp(GrandmasterSettingsNp),
    PortDataSetNp(PortDataSetNp),
    SubscribeEventsNp(SubscribeEventsNp),
    PortPropertiesNp(PortPropertiesNp),
    PortStatsNp(PortStatsNp),
    SynchronizationUncertainNp(SynchronizationUncertainNp),
}

// Expands `$m!` once with every (variant, payload type) pair that shares its
// name with the management ID.
macro_rules! same_name_tlvs {
    ($m:ident, $($args:tt)*) => {
        $m!($($args)*;
            ClockDescription, UserDescription, Initialize, FaultLog, DefaultDataSet,
            CurrentDataSet, ParentDataSet, TimePropertiesDataSet, PortDataSet, Priority1,
            Priority2, Domain, SlaveOnly, LogAnnounceInterval, AnnounceReceiptTimeout,
            LogSyncInterval, VersionNumber, Time, ClockAccuracy, UtcProperties,
            TraceabilityProperties, TimescaleProperties, UnicastNegotiationEnable,
            PathTraceList, PathTraceEnable, UnicastMasterMaxTableSize,
            AcceptableMasterTableEnabled, AcceptableMasterMaxTableSize,
            AlternateTimeOffsetEnable, AlternateTimeOffsetMaxKey, LogMinPdelayReqInterval,
            PrimaryDomain, DelayMechanism, ExternalPortConfigurationEnabled, MasterOnly,
            HoldoverUpgradeEnable, TimeStatusNp, GrandmasterSettingsNp, PortDataSetNp,
            SubscribeEventsNp, PortPropertiesNp, PortStatsNp, SynchronizationUncertainNp
        )
    };
}

macro_rules! tlv_id_match {
    ($self:ident; $($v:ident),*) => {
        match $self {
            $(MngTlv::$v(_) => MngId::$v,)*
        }
    };
}

macro_rules! tlv_write_match {
    ($self:ident, $w:ident; $($v:ident),*) => {
        match $self {
            $(MngTlv::$v(d) => $w.write_bytes(d),)*
        }
    };
}

impl MngTlv {
    /// The management ID this payload belongs to.
    pub fn id(&self) -> MngId {
        same_name_tlvs!(tlv_id_match, self)
    }

    /// Writes the dataField, without the trailing pad octet.
    pub fn encode<W: WriteBytesExt>(&self, mut writer: W) -> Result<(), ParseError> {
        let res: io::Result<()> = same_name_tlvs!(tlv_write_match, self, writer);
        res.map_err(|e| ParseError::from_io(&e))
    }

    /// Encodes the dataField into a new vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, ParseError> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Decodes the dataField of `id`.
    ///
    /// Trailing bytes, such as the pad octet, are ignored.
    pub fn decode(id: MngId, data: &[u8]) -> Result<MngTlv, ParseError> {
        let mut cur = Cursor::new(data);
        let to_err = |e: io::Error| ParseError::from_io(&e);
        let tlv = match id {
            MngId::ClockDescription => MngTlv::ClockDescription(cur.read_bytes().map_err(to_err)?),
            MngId::UserDescription => MngTlv::UserDescription(cur.read_bytes().map_err(to_err)?),
            MngId::Initialize => MngTlv::Initialize(cur.read_bytes().map_err(to_err)?),
            MngId::FaultLog => MngTlv::FaultLog(FaultLog::read(&mut cur)?),
            MngId::DefaultDataSet => MngTlv::DefaultDataSet(cur.read_bytes().map_err(to_err)?),
            MngId::CurrentDataSet => MngTlv::CurrentDataSet(cur.read_bytes().map_err(to_err)?),
            MngId::ParentDataSet => MngTlv::ParentDataSet(cur.read_bytes().map_err(to_err)?),
            MngId::TimePropertiesDataSet => {
                MngTlv::TimePropertiesDataSet(cur.read_bytes().map_err(to_err)?)
            }
            MngId::PortDataSet => MngTlv::PortDataSet(cur.read_bytes().map_err(to_err)?),
            MngId::Priority1 => MngTlv::Priority1(cur.read_bytes().map_err(to_err)?),
            MngId::Priority2 => MngTlv::Priority2(cur.read_bytes().map_err(to_err)?),
            MngId::Domain => MngTlv::Domain(cur.read_bytes().map_err(to_err)?),
            MngId::SlaveOnly => MngTlv::SlaveOnly(cur.read_bytes().map_err(to_err)?),
            MngId::LogAnnounceInterval => {
                MngTlv::LogAnnounceInterval(cur.read_bytes().map_err(to_err)?)
            }
            MngId::AnnounceReceiptTimeout => {
                MngTlv::AnnounceReceiptTimeout(cur.read_bytes().map_err(to_err)?)
            }
            MngId::LogSyncInterval => MngTlv::LogSyncInterval(cur.read_bytes().map_err(to_err)?),
            MngId::VersionNumber => MngTlv::VersionNumber(cur.read_bytes().map_err(to_err)?),
            MngId::Time => MngTlv::Time(cur.read_bytes().map_err(to_err)?),
            MngId::ClockAccuracy => MngTlv::ClockAccuracy(cur.read_bytes().map_err(to_err)?),
            MngId::UtcProperties => MngTlv::UtcProperties(cur.read_bytes().map_err(to_err)?),
            MngId::TraceabilityProperties => {
                MngTlv::TraceabilityProperties(cur.read_bytes().map_err(to_err)?)
            }
            MngId::TimescaleProperties => {
                MngTlv::TimescaleProperties(cur.read_bytes().map_err(to_err)?)
            }
            MngId::UnicastNegotiationEnable => {
                MngTlv::UnicastNegotiationEnable(cur.read_bytes().map_err(to_err)?)
            }
            MngId::PathTraceList => MngTlv::PathTraceList(PathTraceList::read(&mut cur)?),
            MngId::PathTraceEnable => MngTlv::PathTraceEnable(cur.read_bytes().map_err(to_err)?),
            MngId::UnicastMasterMaxTableSize => {
                MngTlv::UnicastMasterMaxTableSize(cur.read_bytes().map_err(to_err)?)
            }
            MngId::AcceptableMasterTableEnabled => {
                MngTlv::AcceptableMasterTableEnabled(cur.read_bytes().map_err(to_err)?)
            }
            MngId::AcceptableMasterMaxTableSize => {
                MngTlv::AcceptableMasterMaxTableSize(cur.read_bytes().map_err(to_err)?)
            }
            MngId::AlternateTimeOffsetEnable => {
                MngTlv::AlternateTimeOffsetEnable(cur.read_bytes().map_err(to_err)?)
            }
            MngId::AlternateTimeOffsetMaxKey => {
                MngTlv::AlternateTimeOffsetMaxKey(cur.read_bytes().map_err(to_err)?)
            }
            MngId::LogMinPdelayReqInterval => {
                MngTlv::LogMinPdelayReqInterval(cur.read_bytes().map_err(to_err)?)
            }
            MngId::PrimaryDomain => MngTlv::PrimaryDomain(cur.read_bytes().map_err(to_err)?),
            MngId::DelayMechanism => MngTlv::DelayMechanism(cur.read_bytes().map_err(to_err)?),
            MngId::ExternalPortConfigurationEnabled => {
                MngTlv::ExternalPortConfigurationEnabled(cur.read_bytes().map_err(to_err)?)
            }
            MngId::MasterOnly => MngTlv::MasterOnly(cur.read_bytes().map_err(to_err)?),
            MngId::HoldoverUpgradeEnable => {
                MngTlv::HoldoverUpgradeEnable(cur.read_bytes().map_err(to_err)?)
            }
            MngId::TimeStatusNp => MngTlv::TimeStatusNp(cur.read_bytes().map_err(to_err)?),
            MngId::GrandmasterSettingsNp => {
                MngTlv::GrandmasterSettingsNp(cur.read_bytes().map_err(to_err)?)
            }
            MngId::PortDataSetNp => MngTlv::PortDataSetNp(cur.read_bytes().map_err(to_err)?),
            MngId::SubscribeEventsNp => {
                MngTlv::SubscribeEventsNp(cur.read_bytes().map_err(to_err)?)
            }
            MngId::PortPropertiesNp => MngTlv::PortPropertiesNp(cur.read_bytes().map_err(to_err)?),
            MngId::PortStatsNp => MngTlv::PortStatsNp(cur.read_bytes().map_err(to_err)?),
            MngId::SynchronizationUncertainNp => {
                MngTlv::SynchronizationUncertainNp(cur.read_bytes().map_err(to_err)?)
            }
            _ => return Err(ParseError::Unsupported),
        };
        Ok(tlv)
    }
}
