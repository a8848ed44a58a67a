//! Applies ISO 14229 §7.5.5's minimum-length, suppress-positive-response, and
//! functional-addressing suppression rules around a per-service handler.

use crate::context::{RequestContext, ResponseContext};
use crate::registry::ServiceId;
use crate::server::{Config, ProtocolStatus, TimingState};
use crate::transfer::TransferSession;
use crate::transport::AddressingScheme;
use crate::{Millis, NegativeResponseCode, ServiceCallbacks, services};

/// Response codes that cause a functionally-addressed request to be answered with silence
/// (ISO 14229 §7.5.5; broadcast requests a given ECU cannot honor get no reply at all).
const FUNCTIONAL_SUPPRESSION_SET: [NegativeResponseCode; 5] = [
    NegativeResponseCode::ServiceNotSupported,
    NegativeResponseCode::SubFunctionNotSupported,
    NegativeResponseCode::ServiceNotSupportedInActiveSession,
    NegativeResponseCode::SubFunctionNotSupportedInActiveSession,
    NegativeResponseCode::RequestOutOfRange,
];

/// Dispatches one request to its handler and writes the (possibly empty) response into
/// `response`. Returns the number of bytes written.
#[allow(clippy::too_many_arguments)]
pub(crate) fn dispatch<C: ServiceCallbacks>(
    request: &[u8],
    addressing: AddressingScheme,
    response: &mut [u8],
    status: &mut ProtocolStatus,
    timing: &mut TimingState,
    transfer: &mut Option<TransferSession>,
    config: &Config,
    now_ms: Millis,
    callbacks: &mut C,
) -> usize {
    let mut resp = ResponseContext::new(response);

    let Some(&sid_byte) = request.first() else {
        return 0;
    };
    let service_id = ServiceId::from(sid_byte);

    if !service_id.is_registered() {
        tracing::debug!(sid = %service_id, "service not supported");
        resp.write_negative(sid_byte, NegativeResponseCode::ServiceNotSupported);
        return finish(
            &mut resp,
            addressing,
            status,
            Err(NegativeResponseCode::ServiceNotSupported),
            false,
        );
    }

    let suppress_positive = if service_id.is_sub_functioned() {
        if request.len() < 2 {
            tracing::debug!(sid = %service_id, "request shorter than the minimum 2 bytes");
            resp.write_negative(
                sid_byte,
                NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat,
            );
            return finish(
                &mut resp,
                addressing,
                status,
                Err(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat),
                false,
            );
        }
        request[1] & crate::SUPPRESS_POSITIVE_RESPONSE_BIT != 0
    } else {
        false
    };

    let mut ctx = RequestContext::new(request, addressing);
    ctx.read_u8();

    let result = match service_id {
        ServiceId::DIAGNOSTIC_SESSION_CONTROL => services::diagnostic_session_control::handle(
            &mut ctx, &mut resp, status, timing, config, now_ms, callbacks,
        ),
        ServiceId::ECU_RESET => {
            services::ecu_reset::handle(&mut ctx, &mut resp, status, timing, callbacks)
        }
        ServiceId::READ_DATA_BY_IDENTIFIER => {
            services::read_data_by_identifier::handle(&mut ctx, &mut resp, status, callbacks)
        }
        ServiceId::SECURITY_ACCESS => {
            services::security_access::handle(&mut ctx, &mut resp, status, callbacks)
        }
        ServiceId::COMMUNICATION_CONTROL => {
            services::communication_control::handle(&mut ctx, &mut resp, status, callbacks)
        }
        ServiceId::WRITE_DATA_BY_IDENTIFIER => {
            services::write_data_by_identifier::handle(&mut ctx, &mut resp, status, callbacks)
        }
        ServiceId::ROUTINE_CONTROL => {
            services::routine_control::handle(&mut ctx, &mut resp, status, callbacks)
        }
        ServiceId::REQUEST_DOWNLOAD => {
            services::request_download::handle(&mut ctx, &mut resp, transfer, status, callbacks)
        }
        ServiceId::TRANSFER_DATA => {
            services::transfer_data::handle(&mut ctx, &mut resp, transfer, status, callbacks)
        }
        ServiceId::REQUEST_TRANSFER_EXIT => {
            services::request_transfer_exit::handle(&mut ctx, &mut resp, transfer, status, callbacks)
        }
        ServiceId::TESTER_PRESENT => {
            services::tester_present::handle(&mut ctx, &mut resp, timing, config, now_ms)
        }
        ServiceId::CONTROL_DTC_SETTING => services::control_dtc_setting::handle(&mut ctx, &mut resp),
        _ => unreachable!("is_registered() filters SIDs to the arms above"),
    };

    if let Err(code) = result {
        tracing::warn!(sid = %service_id, ?code, "negative response");
        resp.write_negative(sid_byte, code);
    }

    finish(&mut resp, addressing, status, result, suppress_positive)
}

fn finish(
    resp: &mut ResponseContext<'_>,
    addressing: AddressingScheme,
    status: &mut ProtocolStatus,
    result: Result<(), NegativeResponseCode>,
    suppress_positive: bool,
) -> usize {
    if result == Err(NegativeResponseCode::RequestCorrectlyReceivedResponsePending) {
        status.rcrrp = true;
        return resp.len();
    }

    // This dispatch produced a final answer; any previously-latched deferral is resolved.
    let was_rcrrp_pending = status.rcrrp;
    status.rcrrp = false;

    let functionally_suppressed = addressing == AddressingScheme::Functional
        && !was_rcrrp_pending
        && matches!(result, Err(code) if FUNCTIONAL_SUPPRESSION_SET.contains(&code));

    if functionally_suppressed || (suppress_positive && result.is_ok()) {
        resp.clear();
    }

    resp.len()
}
