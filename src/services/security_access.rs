//! `0x27 SecurityAccess`.
//!
//! Odd sub-functions request a seed; even sub-functions send a key back. The split is a
//! parity check on the masked sub-function byte, not a separate wire field.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::{NegativeResponseCode, SecurityAccessType, ServiceCallbacks};

/// Largest seed this server will copy out of a `generate_seed` callback.
const MAX_SEED_LEN: usize = 64;

const SUB_FUNCTION_MASK: u8 = 0x7F;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &mut ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let sub_fn = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?
        & SUB_FUNCTION_MASK;

    // SecurityAccessType's reserved ranges (0x00, 0x43..=0x5E, 0x7F) double as this service's
    // "reserved sub-function" table.
    if matches!(
        SecurityAccessType::try_from(sub_fn),
        Ok(SecurityAccessType::ISOSAEReserved(_))
    ) {
        return Err(NegativeResponseCode::SubFunctionNotSupported);
    }

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");

    if sub_fn % 2 == 1 {
        let level = sub_fn;
        let request_data = ctx.read_rest();
        let mut seed = [0u8; MAX_SEED_LEN];
        let seed_len = callbacks.generate_seed(status, level, request_data, &mut seed)?;
        if seed_len == 0 || seed_len > seed.len() {
            return Err(NegativeResponseCode::GeneralProgrammingFailure);
        }
        resp.start_positive(request_sid)?;
        resp.push_u8(sub_fn)?;
        resp.push_bytes(&seed[..seed_len])
            .map_err(|_| NegativeResponseCode::GeneralProgrammingFailure)?;
    } else {
        let level = sub_fn - 1;
        let key = ctx.read_rest();
        callbacks.validate_key(status, level, key)?;
        status.security_level = level;
        resp.start_positive(request_sid)?;
        resp.push_u8(sub_fn)?;
    }
    Ok(())
}
