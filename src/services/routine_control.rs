//! `0x31 RoutineControl`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::{NegativeResponseCode, RoutineControlSubFunction, ServiceCallbacks};

/// Largest status-record payload this server copies out of a `routine_control` callback.
const MAX_STATUS_RECORD_LEN: usize = 255;

const SUB_FUNCTION_MASK: u8 = 0x7F;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?
        & SUB_FUNCTION_MASK;
    // Reference behavior (spec.md §9 open question): an unrecognized routineControlType is
    // reported as a length/format error rather than SubFunctionNotSupported. Kept as-is pending
    // clarification.
    let routine_control_type = RoutineControlSubFunction::try_from(raw)
        .map_err(|_| NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;

    let routine_identifier = ctx
        .read_u16_be()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let option_record = ctx.read_rest();

    let mut status_record = [0u8; MAX_STATUS_RECORD_LEN];
    let len = callbacks.routine_control(
        status,
        routine_control_type,
        routine_identifier,
        option_record,
        &mut status_record,
    )?;
    if len > status_record.len() {
        return Err(NegativeResponseCode::GeneralProgrammingFailure);
    }

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(u8::from(routine_control_type))?;
    resp.push_u16_be(routine_identifier)?;
    resp.push_bytes(&status_record[..len])
        .map_err(|_| NegativeResponseCode::GeneralProgrammingFailure)?;
    Ok(())
}
