//! `0x85 ControlDTCSetting`.
//!
//! No user callback: DTC persistent storage is out of scope (spec.md §1 Non-goals), so this
//! handler only validates and echoes the setting type.

use crate::context::{RequestContext, ResponseContext};
use crate::NegativeResponseCode;

const DTC_SETTING_TYPE_MASK: u8 = 0x3F;

pub(crate) fn handle(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
) -> Result<(), NegativeResponseCode> {
    let raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let dtc_setting_type = raw & DTC_SETTING_TYPE_MASK;

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(dtc_setting_type)?;
    Ok(())
}
