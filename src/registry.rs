//! Maps a request SID to its dispatch classification.
//!
//! Grounded on the teacher's `UdsServiceType` (`src/service.rs`): a thin `u8` newtype with a
//! `Display` impl for log lines. The actual SID → handler jump is a compile-time `match` in
//! [`crate::dispatcher`]; this module only answers "is this SID registered" and "is it
//! sub-functioned", per ISO 14229 §7.5.5.

use std::fmt;

/// One byte identifying the requested service, the first byte of every UDS message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ServiceId(pub u8);

impl ServiceId {
    pub const DIAGNOSTIC_SESSION_CONTROL: ServiceId = ServiceId(0x10);
    pub const ECU_RESET: ServiceId = ServiceId(0x11);
    pub const READ_DATA_BY_IDENTIFIER: ServiceId = ServiceId(0x22);
    pub const SECURITY_ACCESS: ServiceId = ServiceId(0x27);
    pub const COMMUNICATION_CONTROL: ServiceId = ServiceId(0x28);
    pub const WRITE_DATA_BY_IDENTIFIER: ServiceId = ServiceId(0x2E);
    pub const ROUTINE_CONTROL: ServiceId = ServiceId(0x31);
    pub const REQUEST_DOWNLOAD: ServiceId = ServiceId(0x34);
    pub const TRANSFER_DATA: ServiceId = ServiceId(0x36);
    pub const REQUEST_TRANSFER_EXIT: ServiceId = ServiceId(0x37);
    pub const TESTER_PRESENT: ServiceId = ServiceId(0x3E);
    pub const CONTROL_DTC_SETTING: ServiceId = ServiceId(0x85);

    /// Every SID this server has a registered handler for. SIDs ISO 14229 defines but this
    /// server does not implement (0x19 ReadDTCInformation, 0x23 ReadMemoryByAddress, 0x2F
    /// InputOutputControlByIdentifier, ...) are not registered and fall through to
    /// `ServiceNotSupported` at the dispatcher.
    #[must_use]
    pub const fn is_registered(self) -> bool {
        matches!(
            self.0,
            0x10 | 0x11 | 0x22 | 0x27 | 0x28 | 0x2E | 0x31 | 0x34 | 0x36 | 0x37 | 0x3E | 0x85
        )
    }

    /// Sub-functioned SIDs carry a one-byte sub-function after the SID whose high bit is the
    /// suppress-positive-response flag (ISO 14229 §7.5.5). Includes SIDs this server does not
    /// register a handler for, since the classification is a property of the standard, not of
    /// this server's coverage.
    #[must_use]
    pub const fn is_sub_functioned(self) -> bool {
        matches!(
            self.0,
            0x10 | 0x11 | 0x19 | 0x27 | 0x28 | 0x31 | 0x3E | 0x83 | 0x84 | 0x85 | 0x86
        )
    }
}

impl From<u8> for ServiceId {
    fn from(value: u8) -> Self {
        ServiceId(value)
    }
}

impl From<ServiceId> for u8 {
    fn from(value: ServiceId) -> Self {
        value.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}
