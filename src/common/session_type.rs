use crate::Error;

/// `SessionType` is used to specify or describe the diagnostic session type of the server.
///
/// *Note*:
///
/// Conversions from `u8` to `SessionType` are fallible and will return an [`Error`] if the
/// Suppress Positive Response bit is set (callers should mask that bit off first).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionType {
    /// This value is reserved by the ISO 14229-1 Specification
    ISOSAEReserved(u8),
    /// The `Default` session (0x01) enables the standard diagnostic functionality.
    /// - No `TesterPresent` messages are required to remain in this session
    /// - Any other diagnostic sessions are stopped upon successful entry into this session
    /// - Any security authorization is revoked
    /// - This session is active on startup
    Default,
    /// The `Programming` session (0x02) enables services required to support writing server
    /// memory. Upon S3 timeout the server shall return to `Default`.
    Programming,
    /// The `Extended` session (0x03) enables additional diagnostics functionality which can
    /// modify server behavior.
    Extended,
    /// The `Safety` session (0x04) enables diagnostics functionality for safety systems.
    Safety,
    /// Value reserved for use by vehicle manufacturers
    VehicleManufacturerSpecific(u8),
    /// Value reserved for use by system suppliers
    SystemSupplierSpecific(u8),
}

impl SessionType {
    /// The server starts in the default session on every power-up.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, SessionType::Default)
    }
}

impl From<SessionType> for u8 {
    #[allow(clippy::match_same_arms)]
    fn from(value: SessionType) -> Self {
        match value {
            SessionType::ISOSAEReserved(value) => value,
            SessionType::Default => 0x01,
            SessionType::Programming => 0x02,
            SessionType::Extended => 0x03,
            SessionType::Safety => 0x04,
            SessionType::VehicleManufacturerSpecific(value) => value,
            SessionType::SystemSupplierSpecific(value) => value,
        }
    }
}

impl TryFrom<u8> for SessionType {
    type Error = Error;
    #[allow(clippy::match_same_arms)]
    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0x00 => Ok(SessionType::ISOSAEReserved(value)),
            0x01 => Ok(SessionType::Default),
            0x02 => Ok(SessionType::Programming),
            0x03 => Ok(SessionType::Extended),
            0x04 => Ok(SessionType::Safety),
            0x05..=0x3F => Ok(SessionType::ISOSAEReserved(value)),
            0x40..=0x5F => Ok(SessionType::VehicleManufacturerSpecific(value)),
            0x60..=0x7E => Ok(SessionType::SystemSupplierSpecific(value)),
            0x7F => Ok(SessionType::ISOSAEReserved(value)),
            _ => Err(Error::InvalidSessionType(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_named_values() {
        assert_eq!(SessionType::try_from(0x01).unwrap(), SessionType::Default);
        assert_eq!(
            SessionType::try_from(0x02).unwrap(),
            SessionType::Programming
        );
        assert_eq!(SessionType::try_from(0x03).unwrap(), SessionType::Extended);
        assert_eq!(SessionType::try_from(0x04).unwrap(), SessionType::Safety);
    }

    #[test]
    fn round_trips_all_values() {
        for i in 0..=u8::MAX {
            match SessionType::try_from(i) {
                Ok(value) => assert_eq!(u8::from(value), i),
                Err(Error::InvalidSessionType(value)) => assert_eq!(value, i),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn manufacturer_and_supplier_ranges() {
        assert!(matches!(
            SessionType::try_from(0x40).unwrap(),
            SessionType::VehicleManufacturerSpecific(0x40)
        ));
        assert!(matches!(
            SessionType::try_from(0x60).unwrap(),
            SessionType::SystemSupplierSpecific(0x60)
        ));
    }
}
