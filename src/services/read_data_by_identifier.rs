//! `0x22 ReadDataByIdentifier`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::{NegativeResponseCode, ServiceCallbacks};

/// Largest per-DID payload this server accepts from a single callback invocation.
const MAX_DID_VALUE_LEN: usize = 255;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let body = ctx.remaining();
    if body.is_empty() || body.len() % 2 != 0 {
        return Err(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat);
    }

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;

    let mut value = [0u8; MAX_DID_VALUE_LEN];
    while let Some(did) = ctx.read_u16_be() {
        let n = callbacks.read_data_by_identifier(status, did, &mut value)?;
        resp.push_u16_be(did)
            .map_err(|_| NegativeResponseCode::ResponseTooLong)?;
        resp.push_bytes(&value[..n])
            .map_err(|_| NegativeResponseCode::ResponseTooLong)?;
    }
    Ok(())
}
