//! `0x28 CommunicationControl`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::{NegativeResponseCode, ServiceCallbacks};

const SUB_FUNCTION_MASK: u8 = 0x7F;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let control_type = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?
        & SUB_FUNCTION_MASK;
    let communication_type = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;

    callbacks.communication_control(status, control_type, communication_type)?;

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(control_type)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressingScheme;

    struct AcceptAll;
    impl ServiceCallbacks for AcceptAll {
        fn communication_control(
            &mut self,
            _status: &ProtocolStatus,
            _control_type: u8,
            _communication_type: u8,
        ) -> Result<(), NegativeResponseCode> {
            Ok(())
        }
    }

    #[test]
    fn echoes_control_type() {
        let request = [0x28, 0x03, 0x01];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let status = ProtocolStatus::default();

        handle(&mut ctx, &mut resp, &status, &mut AcceptAll).unwrap();

        assert_eq!(resp.as_slice(), [0x68, 0x03]);
    }
}
