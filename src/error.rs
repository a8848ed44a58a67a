use thiserror::Error;

/// Errors raised while decoding a field out of a wire buffer.
///
/// This is distinct from [`NegativeResponseCode`](crate::NegativeResponseCode): `Error` is a Rust
/// error used by `TryFrom`/parsing code, while `NegativeResponseCode` is wire data a handler
/// returns deliberately. Callers map most `Error` variants onto
/// `NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat` or
/// `NegativeResponseCode::RequestOutOfRange`; see `services::*`.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Invalid session type: {0}")]
    InvalidSessionType(u8),
    #[error("Invalid ECU reset type: {0}")]
    InvalidEcuResetType(u8),
    #[error("Invalid Security Access Type: {0}")]
    InvalidSecurityAccessType(u8),
    #[error("Incorrect Message Length Or Invalid Format")]
    IncorrectMessageLengthOrInvalidFormat,
    #[error("Invalid Encryption/Compression Method: {0}")]
    InvalidEncryptionCompressionMethod(u8),
}

/// Errors raised constructing a [`Config`](crate::Config) or [`UdsServer`](crate::UdsServer).
///
/// These never reach the wire — they indicate the host application wired the server up
/// incorrectly (spec.md §6.6: "All pointer arguments except user service callbacks are
/// mandatory").
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ConfigError {
    #[error("{name} buffer capacity must be greater than 2 bytes, got {capacity}")]
    BufferTooSmall { name: &'static str, capacity: usize },
    #[error("p2_ms must be nonzero")]
    ZeroP2,
    #[error("s3_ms must be nonzero")]
    ZeroS3,
    #[error("physical and functional receive arbitration IDs must differ (both were {0:#x})")]
    DuplicateRecvId(u32),
}
