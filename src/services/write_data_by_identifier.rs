//! `0x2E WriteDataByIdentifier`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::{NegativeResponseCode, ServiceCallbacks};

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let did = ctx
        .read_u16_be()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let data = ctx.read_rest();

    callbacks.write_data_by_identifier(status, did, data)?;

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u16_be(did)?;
    Ok(())
}
