//! User-supplied service behavior.
//!
//! Per the redesign guidance this crate follows, every optional C-style function-pointer
//! callback becomes a trait method with a default implementation that rejects the request.
//! "Absence of a callback" is simply "the implementor did not override this method" — the
//! dispatcher never has to check a null pointer. Implementors override only the services their
//! ECU actually supports.
//!
//! All `out_ptr`/`out_len` C idioms become `&mut [u8]` plus `Result<usize, NegativeResponseCode>`
//! (`Ok(n)` = wrote `n` bytes), preserving the no-allocation contract without pointer/length
//! pairs.

use crate::{DataFormatIdentifier, NegativeResponseCode, ProtocolStatus, ResetType, SessionType};

/// Sub-functions accepted by `RoutineControl` (0x31).
///
/// Grounded on the teacher's `RoutineControlSubFunction`, but fallible rather than panicking: an
/// unrecognized byte is the caller's concern, not this type's.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoutineControlSubFunction {
    StartRoutine,
    StopRoutine,
    RequestRoutineResults,
}

impl TryFrom<u8> for RoutineControlSubFunction {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x01 => Ok(Self::StartRoutine),
            0x02 => Ok(Self::StopRoutine),
            0x03 => Ok(Self::RequestRoutineResults),
            other => Err(other),
        }
    }
}

impl From<RoutineControlSubFunction> for u8 {
    fn from(value: RoutineControlSubFunction) -> Self {
        match value {
            RoutineControlSubFunction::StartRoutine => 0x01,
            RoutineControlSubFunction::StopRoutine => 0x02,
            RoutineControlSubFunction::RequestRoutineResults => 0x03,
        }
    }
}

/// Application behavior for the services this server dispatches.
///
/// Every method defaults to rejecting the request with
/// `NegativeResponseCode::ServiceNotSupported`; override only what the ECU implements.
#[allow(unused_variables)]
pub trait ServiceCallbacks {
    /// `0x10 DiagnosticSessionControl`. Return `Ok(())` to accept the session change.
    fn diagnostic_session_control(
        &mut self,
        status: &ProtocolStatus,
        session_type: SessionType,
    ) -> Result<(), NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x11 ECUReset`. On `EnableRapidPowerShutDown`, return `Ok(Some(power_down_time))`;
    /// otherwise `Ok(None)`.
    fn ecu_reset(
        &mut self,
        status: &ProtocolStatus,
        reset_type: ResetType,
    ) -> Result<Option<u8>, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x22 ReadDataByIdentifier`, called once per requested DID. Return the number of bytes
    /// written into `out`.
    fn read_data_by_identifier(
        &mut self,
        status: &ProtocolStatus,
        data_identifier: u16,
        out: &mut [u8],
    ) -> Result<usize, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x27 SecurityAccess`, odd sub-function (request seed). Return the seed length written
    /// into `out`; an all-zero seed of nonzero length signals "already unlocked at this level".
    fn generate_seed(
        &mut self,
        status: &ProtocolStatus,
        level: u8,
        request_data: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x27 SecurityAccess`, even sub-function (send key).
    fn validate_key(
        &mut self,
        status: &ProtocolStatus,
        level: u8,
        key: &[u8],
    ) -> Result<(), NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x28 CommunicationControl`.
    fn communication_control(
        &mut self,
        status: &ProtocolStatus,
        control_type: u8,
        communication_type: u8,
    ) -> Result<(), NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x2E WriteDataByIdentifier`.
    fn write_data_by_identifier(
        &mut self,
        status: &ProtocolStatus,
        data_identifier: u16,
        data: &[u8],
    ) -> Result<(), NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x31 RoutineControl`. Return the status-record length written into `out`.
    fn routine_control(
        &mut self,
        status: &ProtocolStatus,
        routine_control_type: RoutineControlSubFunction,
        routine_identifier: u16,
        option_record: &[u8],
        out: &mut [u8],
    ) -> Result<usize, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x34 RequestDownload`. Return the proposed `maxNumberOfBlockLength` (the server clamps
    /// it to the transport MTU and enforces the `>= 3` minimum).
    fn request_download(
        &mut self,
        status: &ProtocolStatus,
        memory_address: u64,
        memory_size: u64,
        data_format_identifier: DataFormatIdentifier,
    ) -> Result<u16, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x36 TransferData`. This callback *is* the transfer session's `onTransfer`: there is no
    /// separate registration step.
    fn transfer_data(
        &mut self,
        status: &ProtocolStatus,
        block_sequence_counter: u8,
        data: &[u8],
    ) -> Result<(), NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// `0x37 RequestTransferExit`. This callback *is* the transfer session's `onExit`. Return the
    /// number of trailer bytes written into `out` (commonly zero).
    fn request_transfer_exit(
        &mut self,
        status: &ProtocolStatus,
        out: &mut [u8],
    ) -> Result<usize, NegativeResponseCode> {
        Err(NegativeResponseCode::ServiceNotSupported)
    }

    /// Invoked on S3 timeout. Side-effect only; the server reverts to the default session
    /// regardless of what this does.
    fn session_timeout(&mut self) {}
}
