// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Management IDs, actions and the per-ID property table.
//!
//! Each [`MngId`] carries its wire value, its scope (port or clock), the
//! actions it accepts, its dataField size, and whether it only exists on
//! linuxptp. The table covers IEEE 1588-2019 and the linuxptp vendor range
//! starting at `0xc000`.

use core::fmt;

/// **actionField** - What a management message asks for or reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Action {
    /// Read a value.
    Get = 0,
    /// Write a value.
    Set = 1,
    /// Answer to a GET or SET.
    Response = 2,
    /// Run a command.
    Command = 3,
    /// Answer to a COMMAND.
    Acknowledge = 4,
}

impl Action {
    /// Upper-case action name as used by pmc.
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Get => "GET",
            Action::Set => "SET",
            Action::Response => "RESPONSE",
            Action::Command => "COMMAND",
            Action::Acknowledge => "ACKNOWLEDGE",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Get),
            1 => Ok(Action::Set),
            2 => Ok(Action::Response),
            3 => Ok(Action::Command),
            4 => Ok(Action::Acknowledge),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vendor extensions a peer is assumed to implement.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ImplementSpecific {
    /// Plain IEEE 1588, no vendor IDs.
    NoImplementSpecific,
    /// linuxptp, enables the `*_NP` IDs.
    #[default]
    Linuxptp,
}

/// Whether a management ID applies to a whole clock or to a single port.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Addresses a port.
    Port,
    /// Addresses the clock.
    Clock,
}

/// Size of an ID's dataField.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataSize {
    /// The ID never carries data.
    Empty,
    /// The dataField has a fixed size in bytes.
    Fixed(u16),
    /// The dataField size depends on the content.
    Variable,
}

const G: u8 = Action::Get.bit();
const GS: u8 = Action::Get.bit() | Action::Set.bit();
const C: u8 = Action::Command.bit();
const GSC: u8 = GS | C;

const fn size(n: i32) -> DataSize {
    match n {
        0 => DataSize::Empty,
        n if n < 0 => DataSize::Variable,
        n => DataSize::Fixed(n as u16),
    }
}

struct IdInfo {
    name: &'static str,
    scope: Scope,
    allowed: u8,
    size: DataSize,
    linuxptp: bool,
}

macro_rules! mng_ids {
    ($($variant:ident = $value:literal, $name:literal, $scope:ident, $allowed:ident, $size:expr, $linuxptp:literal;)*) => {
        /// **managementId** - Identifies the data set or command a management TLV carries.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum MngId {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant = $value,
            )*
        }

        impl MngId {
            /// Every known ID, in table order.
            pub const ALL: &'static [MngId] = &[$(MngId::$variant,)*];

            const fn info(&self) -> IdInfo {
                match self {
                    $(
                        MngId::$variant => IdInfo {
                            name: $name,
                            scope: Scope::$scope,
                            allowed: $allowed,
                            size: size($size),
                            linuxptp: $linuxptp,
                        },
                    )*
                }
            }
        }
    };
}

mng_ids! {
    NullPtpManagement = 0x0000, "NULL_PTP_MANAGEMENT", Port, GSC, 0, false;
    ClockDescription = 0x0001, "CLOCK_DESCRIPTION", Port, G, -2, false;
    UserDescription = 0x0002, "USER_DESCRIPTION", Clock, GS, -2, false;
    SaveInNonVolatileStorage = 0x0003, "SAVE_IN_NON_VOLATILE_STORAGE", Clock, C, 0, false;
    ResetNonVolatileStorage = 0x0004, "RESET_NON_VOLATILE_STORAGE", Clock, C, 0, false;
    Initialize = 0x0005, "INITIALIZE", Clock, C, 2, false;
    FaultLog = 0x0006, "FAULT_LOG", Clock, G, -2, false;
    FaultLogReset = 0x0007, "FAULT_LOG_RESET", Clock, C, 0, false;
    DefaultDataSet = 0x2000, "DEFAULT_DATA_SET", Clock, G, 20, false;
    CurrentDataSet = 0x2001, "CURRENT_DATA_SET", Clock, G, 18, false;
    ParentDataSet = 0x2002, "PARENT_DATA_SET", Clock, G, 32, false;
    TimePropertiesDataSet = 0x2003, "TIME_PROPERTIES_DATA_SET", Clock, G, 4, false;
    PortDataSet = 0x2004, "PORT_DATA_SET", Port, G, 26, false;
    Priority1 = 0x2005, "PRIORITY1", Clock, GS, 2, false;
    Priority2 = 0x2006, "PRIORITY2", Clock, GS, 2, false;
    Domain = 0x2007, "DOMAIN", Clock, GS, 2, false;
    SlaveOnly = 0x2008, "SLAVE_ONLY", Clock, GS, 2, false;
    LogAnnounceInterval = 0x2009, "LOG_ANNOUNCE_INTERVAL", Port, GS, 2, false;
    AnnounceReceiptTimeout = 0x200a, "ANNOUNCE_RECEIPT_TIMEOUT", Port, GS, 2, false;
    LogSyncInterval = 0x200b, "LOG_SYNC_INTERVAL", Port, GS, 2, false;
    VersionNumber = 0x200c, "VERSION_NUMBER", Port, GS, 2, false;
    EnablePort = 0x200d, "ENABLE_PORT", Port, C, 0, false;
    DisablePort = 0x200e, "DISABLE_PORT", Port, C, 0, false;
    Time = 0x200f, "TIME", Clock, GS, 10, false;
    ClockAccuracy = 0x2010, "CLOCK_ACCURACY", Clock, GS, 2, false;
    UtcProperties = 0x2011, "UTC_PROPERTIES", Clock, GS, 4, false;
    TraceabilityProperties = 0x2012, "TRACEABILITY_PROPERTIES", Clock, GS, 2, false;
    TimescaleProperties = 0x2013, "TIMESCALE_PROPERTIES", Clock, GS, 2, false;
    UnicastNegotiationEnable = 0x2014, "UNICAST_NEGOTIATION_ENABLE", Port, GS, 2, false;
    PathTraceList = 0x2015, "PATH_TRACE_LIST", Clock, G, -2, false;
    PathTraceEnable = 0x2016, "PATH_TRACE_ENABLE", Clock, GS, 2, false;
    GrandmasterClusterTable = 0x2017, "GRANDMASTER_CLUSTER_TABLE", Clock, GS, -2, false;
    UnicastMasterTable = 0x2018, "UNICAST_MASTER_TABLE", Port, GS, -2, false;
    UnicastMasterMaxTableSize = 0x2019, "UNICAST_MASTER_MAX_TABLE_SIZE", Port, G, 2, false;
    AcceptableMasterTable = 0x201a, "ACCEPTABLE_MASTER_TABLE", Clock, GS, -2, false;
    AcceptableMasterTableEnabled = 0x201b, "ACCEPTABLE_MASTER_TABLE_ENABLED", Port, GS, 2, false;
    AcceptableMasterMaxTableSize = 0x201c, "ACCEPTABLE_MASTER_MAX_TABLE_SIZE", Clock, G, 2, false;
    AlternateMaster = 0x201d, "ALTERNATE_MASTER", Port, GS, 4, false;
    AlternateTimeOffsetEnable = 0x201e, "ALTERNATE_TIME_OFFSET_ENABLE", Clock, GS, 2, false;
    AlternateTimeOffsetName = 0x201f, "ALTERNATE_TIME_OFFSET_NAME", Clock, GS, -2, false;
    AlternateTimeOffsetMaxKey = 0x2020, "ALTERNATE_TIME_OFFSET_MAX_KEY", Clock, G, 2, false;
    AlternateTimeOffsetProperties = 0x2021, "ALTERNATE_TIME_OFFSET_PROPERTIES", Clock, GS, 16, false;
    TransparentClockPortDataSet = 0x4001, "TRANSPARENT_CLOCK_PORT_DATA_SET", Port, G, 20, false;
    LogMinPdelayReqInterval = 0x6001, "LOG_MIN_PDELAY_REQ_INTERVAL", Port, GS, 2, false;
    TransparentClockDefaultDataSet = 0x4000, "TRANSPARENT_CLOCK_DEFAULT_DATA_SET", Clock, G, 12, false;
    PrimaryDomain = 0x4002, "PRIMARY_DOMAIN", Clock, GS, 2, false;
    DelayMechanism = 0x6000, "DELAY_MECHANISM", Port, GS, 2, false;
    ExternalPortConfigurationEnabled = 0x3000, "EXTERNAL_PORT_CONFIGURATION_ENABLED", Clock, GS, 2, false;
    MasterOnly = 0x3001, "MASTER_ONLY", Port, GS, 2, false;
    HoldoverUpgradeEnable = 0x3002, "HOLDOVER_UPGRADE_ENABLE", Clock, GS, 2, false;
    ExtPortConfigPortDataSet = 0x3003, "EXT_PORT_CONFIG_PORT_DATA_SET", Port, GS, 2, false;
    TimeStatusNp = 0xc000, "TIME_STATUS_NP", Clock, G, 50, true;
    GrandmasterSettingsNp = 0xc001, "GRANDMASTER_SETTINGS_NP", Clock, GS, 8, true;
    PortDataSetNp = 0xc002, "PORT_DATA_SET_NP", Port, GS, 8, true;
    SubscribeEventsNp = 0xc003, "SUBSCRIBE_EVENTS_NP", Clock, GS, 66, true;
    PortPropertiesNp = 0xc004, "PORT_PROPERTIES_NP", Port, G, -2, true;
    PortStatsNp = 0xc005, "PORT_STATS_NP", Port, G, 266, true;
    SynchronizationUncertainNp = 0xc006, "SYNCHRONIZATION_UNCERTAIN_NP", Clock, GS, 2, true;
}

impl MngId {
    /// Wire value of the ID.
    pub const fn value(&self) -> u16 {
        *self as u16
    }

    /// Looks up an ID by wire value.
    ///
    /// linuxptp IDs are only found when `implement` is [`ImplementSpecific::Linuxptp`].
    pub fn from_value(value: u16, implement: ImplementSpecific) -> Option<MngId> {
        MngId::ALL
            .iter()
            .copied()
            .find(|id| id.value() == value)
            .filter(|id| !id.is_linuxptp() || implement == ImplementSpecific::Linuxptp)
    }

    /// Looks up an ID by its canonical name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<MngId> {
        MngId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Canonical upper-case name, e.g. `PRIORITY1`.
    pub const fn name(&self) -> &'static str {
        self.info().name
    }

    /// Port or clock scope.
    pub const fn scope(&self) -> Scope {
        self.info().scope
    }

    /// Whether a request with `action` may carry this ID.
    pub const fn allows(&self, action: Action) -> bool {
        self.info().allowed & action.bit() != 0
    }

    /// Size of the dataField.
    pub const fn data_size(&self) -> DataSize {
        self.info().size
    }

    /// True when the ID never carries a dataField.
    pub const fn is_empty_data(&self) -> bool {
        matches!(self.info().size, DataSize::Empty)
    }

    /// True for linuxptp vendor IDs.
    pub const fn is_linuxptp(&self) -> bool {
        self.info().linuxptp
    }
}

impl fmt::Display for MngId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// **managementErrorId** - Reason carried by a management error status TLV.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ManagementErrorId {
    /// The response would not fit a single message.
    ResponseTooBig,
    /// The management ID is not recognized.
    NoSuchId,
    /// The dataField has the wrong length.
    WrongLength,
    /// A value in the dataField is wrong.
    WrongValue,
    /// The value cannot be set.
    NotSetable,
    /// The request is not supported.
    NotSupported,
    /// The addressed entity has no such data.
    Unpopulated,
    /// Any other failure.
    GeneralError,
    /// An error code outside the known set.
    Other(u16),
}

impl ManagementErrorId {
    /// Wire value of the error code.
    pub fn value(&self) -> u16 {
        match self {
            ManagementErrorId::ResponseTooBig => 0x0001,
            ManagementErrorId::NoSuchId => 0x0002,
            ManagementErrorId::WrongLength => 0x0003,
            ManagementErrorId::WrongValue => 0x0004,
            ManagementErrorId::NotSetable => 0x0005,
            ManagementErrorId::NotSupported => 0x0006,
            ManagementErrorId::Unpopulated => 0x0007,
            ManagementErrorId::GeneralError => 0xfffe,
            ManagementErrorId::Other(v) => *v,
        }
    }

    /// Upper-case error name.
    pub fn name(&self) -> &'static str {
        match self {
            ManagementErrorId::ResponseTooBig => "RESPONSE_TOO_BIG",
            ManagementErrorId::NoSuchId => "NO_SUCH_ID",
            ManagementErrorId::WrongLength => "WRONG_LENGTH",
            ManagementErrorId::WrongValue => "WRONG_VALUE",
            ManagementErrorId::NotSetable => "NOT_SETABLE",
            ManagementErrorId::NotSupported => "NOT_SUPPORTED",
            ManagementErrorId::Unpopulated => "UNPOPULATED",
            ManagementErrorId::GeneralError => "GENERAL_ERROR",
            ManagementErrorId::Other(_) => "UNKNOWN",
        }
    }
}

impl From<u16> for ManagementErrorId {
    fn from(value: u16) -> Self {
        match value {
            0x0001 => ManagementErrorId::ResponseTooBig,
            0x0002 => ManagementErrorId::NoSuchId,
            0x0003 => ManagementErrorId::WrongLength,
            0x0004 => ManagementErrorId::WrongValue,
            0x0005 => ManagementErrorId::NotSetable,
            0x0006 => ManagementErrorId::NotSupported,
            0x0007 => ManagementErrorId::Unpopulated,
            0xfffe => ManagementErrorId::GeneralError,
            v => ManagementErrorId::Other(v),
        }
    }
}

impl fmt::Display for ManagementErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagementErrorId::Other(v) => write!(f, "UNKNOWN({:#06x})", v),
            _ => f.write_str(self.name()),
        }
    }
}
