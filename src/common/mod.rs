mod negative_response_code;
pub use negative_response_code::NegativeResponseCode;

mod reset_type;
pub use reset_type::ResetType;

mod security_access_type;
pub use security_access_type::SecurityAccessType;

mod session_type;
pub use session_type::SessionType;

mod format_identifiers;
pub use format_identifiers::{DataFormatIdentifier, LengthFormatIdentifier, MemoryFormatIdentifier};
