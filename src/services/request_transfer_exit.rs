//! `0x37 RequestTransferExit`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::transfer::TransferSession;
use crate::{NegativeResponseCode, ServiceCallbacks};

/// Largest trailer payload this server copies out of a `request_transfer_exit` callback.
const MAX_TRAILER_LEN: usize = 64;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    transfer: &mut Option<TransferSession>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    if transfer.is_none() {
        return Err(NegativeResponseCode::UploadDownloadNotAccepted);
    }

    let mut trailer = [0u8; MAX_TRAILER_LEN];
    let result = callbacks.request_transfer_exit(status, &mut trailer);

    // Unconditional: a fatal callback error still ends the transfer session (spec.md §4.3).
    *transfer = None;

    let written = result?;
    if written > trailer.len() {
        return Err(NegativeResponseCode::GeneralProgrammingFailure);
    }

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_bytes(&trailer[..written])
        .map_err(|_| NegativeResponseCode::GeneralProgrammingFailure)?;
    Ok(())
}
