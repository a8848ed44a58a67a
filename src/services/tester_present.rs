//! `0x3E TesterPresent`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::{Config, TimingState};
use crate::time::Millis;
use crate::NegativeResponseCode;

const SUB_FUNCTION_MASK: u8 = 0x3F;

pub(crate) fn handle(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    timing: &mut TimingState,
    config: &Config,
    now_ms: Millis,
) -> Result<(), NegativeResponseCode> {
    let sub_fn = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;

    timing.s3_timeout = now_ms.wrapping_add(config.s3_ms);

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(sub_fn & SUB_FUNCTION_MASK)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressingScheme;

    fn config() -> Config {
        Config::new(0x7E0, 0x7DF, 0x7E8, 50, 5000, 5000).unwrap()
    }

    #[test]
    fn refreshes_s3_and_echoes_masked_sub_function() {
        let request = [0x3E, 0x00];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut timing = TimingState::new(0, 50);

        handle(&mut ctx, &mut resp, &mut timing, &config(), 1_000).unwrap();

        assert_eq!(resp.as_slice(), [0x7E, 0x00]);
        assert_eq!(timing.s3_timeout, 6_000);
    }

    #[test]
    fn suppress_bit_is_masked_off_the_echoed_sub_function() {
        let request = [0x3E, 0x80];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut timing = TimingState::new(0, 50);

        handle(&mut ctx, &mut resp, &mut timing, &config(), 0).unwrap();

        assert_eq!(resp.as_slice(), [0x7E, 0x00]);
    }

    #[test]
    fn missing_sub_function_is_length_error() {
        let request = [0x3E];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut timing = TimingState::new(0, 50);

        let result = handle(&mut ctx, &mut resp, &mut timing, &config(), 0);
        assert_eq!(
            result,
            Err(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)
        );
    }
}
