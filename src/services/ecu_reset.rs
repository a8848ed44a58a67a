//! `0x11 ECUReset`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::{ProtocolStatus, TimingState};
use crate::{NegativeResponseCode, ResetType, ServiceCallbacks};

const RESET_TYPE_MASK: u8 = 0x3F;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &ProtocolStatus,
    timing: &mut TimingState,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let reset_type = ResetType::try_from(raw & RESET_TYPE_MASK)
        .map_err(|_| NegativeResponseCode::RequestOutOfRange)?;

    let power_down_time = callbacks.ecu_reset(status, reset_type)?;

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(u8::from(reset_type))?;
    if reset_type == ResetType::EnableRapidPowerShutDown {
        if let Some(power_down_time) = power_down_time {
            resp.push_u8(power_down_time)?;
        }
    }

    timing.not_ready_to_receive = true;
    timing.ecu_reset_scheduled = true;
    Ok(())
}
