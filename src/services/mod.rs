//! One module per dispatchable service. Each exposes a single `handle` function with the exact
//! arguments [`crate::dispatcher::dispatch`] needs for that service — no more, no less — rather
//! than a uniform signature every handler ignores half of.

pub mod communication_control;
pub mod control_dtc_setting;
pub mod diagnostic_session_control;
pub mod ecu_reset;
pub mod read_data_by_identifier;
pub mod request_download;
pub mod request_transfer_exit;
pub mod routine_control;
pub mod security_access;
pub mod tester_present;
pub mod transfer_data;
pub mod write_data_by_identifier;
