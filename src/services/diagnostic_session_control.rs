//! `0x10 DiagnosticSessionControl`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::{Config, ProtocolStatus, TimingState};
use crate::time::Millis;
use crate::{NegativeResponseCode, ServiceCallbacks, SessionType};

/// Keeps bit 6 alongside the sub-function bits; see the open question in the design notes about
/// why this mask differs from every other sub-functioned service's `0x3F`.
const SESSION_TYPE_MASK: u8 = 0x4F;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &mut ProtocolStatus,
    timing: &mut TimingState,
    config: &Config,
    now_ms: Millis,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let session_type = SessionType::try_from(raw & SESSION_TYPE_MASK)
        .map_err(|_| NegativeResponseCode::RequestOutOfRange)?;

    callbacks.diagnostic_session_control(status, session_type)?;

    if !session_type.is_default() {
        timing.s3_timeout = now_ms.wrapping_add(config.s3_ms);
    }
    status.session_type = session_type;

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(u8::from(session_type))?;
    resp.push_u16_be(config.p2_ms as u16)?;
    resp.push_u16_be((config.p2_star_ms / 10) as u16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressingScheme;

    struct AcceptAll;
    impl ServiceCallbacks for AcceptAll {
        fn diagnostic_session_control(
            &mut self,
            _status: &ProtocolStatus,
            _session_type: SessionType,
        ) -> Result<(), NegativeResponseCode> {
            Ok(())
        }
    }

    #[test]
    fn extended_session_echoes_p2_and_p2_star() {
        let request = [0x10, 0x03];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut timing = TimingState::new(0, 50);
        let config = Config::new(0x7E0, 0x7DF, 0x7E8, 50, 5000, 5000).unwrap();

        handle(
            &mut ctx,
            &mut resp,
            &mut status,
            &mut timing,
            &config,
            0,
            &mut AcceptAll,
        )
        .unwrap();

        assert_eq!(resp.as_slice(), [0x50, 0x03, 0x00, 0x32, 0x01, 0xF4]);
        assert_eq!(status.session_type, SessionType::Extended);
        assert_eq!(timing.s3_timeout, 5000);
    }

    #[test]
    fn default_session_does_not_arm_s3() {
        let request = [0x10, 0x01];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut timing = TimingState::new(0, 50);
        let config = Config::new(0x7E0, 0x7DF, 0x7E8, 50, 5000, 5000).unwrap();

        handle(
            &mut ctx,
            &mut resp,
            &mut status,
            &mut timing,
            &config,
            1_000,
            &mut AcceptAll,
        )
        .unwrap();

        assert_eq!(timing.s3_timeout, 0);
    }

    #[test]
    fn rejecting_callback_yields_negative_code() {
        struct RejectAll;
        impl ServiceCallbacks for RejectAll {}

        let request = [0x10, 0x03];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut timing = TimingState::new(0, 50);
        let config = Config::new(0x7E0, 0x7DF, 0x7E8, 50, 5000, 5000).unwrap();

        let result = handle(
            &mut ctx,
            &mut resp,
            &mut status,
            &mut timing,
            &config,
            0,
            &mut RejectAll,
        );
        assert_eq!(result, Err(NegativeResponseCode::ServiceNotSupported));
    }
}
