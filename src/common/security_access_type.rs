use crate::Error;

/// Security Access Type allows for multiple different security challenges within an ECU.
///
/// The Security Access Type is used to determine both the sub function,
/// as well as ECU specific access type being requested
///
/// *Note*:
///
/// Conversions from `u8` to `SecurityAccessType` are fallible and will return an [`Error`] if the
/// Suppress Positive Response bit is set.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecurityAccessType {
    /// This value is reserved for future definition
    ISOSAEReserved(u8),
    /// `RequestSeed` with the level of security defined by the vehicle manufacturer
    RequestSeed(u8),
    /// `SendKey` with the level of security defined by the vehicle manufacturer
    SendKey(u8),
    /// `RequestSeed` with different levels of security defined for end of life
    /// activation of on-board pyrotechnic devices
    ISO26021_2Values,
    /// `SendKey` with different levels of security defined for end of life activation
    ISO26021_2SendKeyValues,
    /// This range of values is reserved for system supplier specific use
    SystemSupplierSpecific(u8),
}

impl From<SecurityAccessType> for u8 {
    #[allow(clippy::match_same_arms)]
    fn from(value: SecurityAccessType) -> Self {
        match value {
            SecurityAccessType::ISOSAEReserved(val) => val,
            SecurityAccessType::RequestSeed(val) => val,
            SecurityAccessType::SendKey(val) => val,
            SecurityAccessType::ISO26021_2Values => 0x5F,
            SecurityAccessType::ISO26021_2SendKeyValues => 0x60,
            SecurityAccessType::SystemSupplierSpecific(val) => val,
        }
    }
}

impl TryFrom<u8> for SecurityAccessType {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0x00 | 0x43..=0x5E | 0x7F => Ok(Self::ISOSAEReserved(value)),
            // Security requests alternate, with odd numbers being seed requests,
            // and even numbers being send key requests
            0x01..=0x42 => {
                if value % 2 == 1 {
                    Ok(Self::RequestSeed(value))
                } else {
                    Ok(Self::SendKey(value))
                }
            }
            0x5F => Ok(Self::ISO26021_2Values),
            0x60 => Ok(Self::ISO26021_2SendKeyValues),
            0x61..=0x7E => Ok(Self::SystemSupplierSpecific(value)),
            _ => Err(Error::InvalidSecurityAccessType(value)),
        }
    }
}
