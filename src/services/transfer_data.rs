//! `0x36 TransferData`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::transfer::TransferSession;
use crate::{NegativeResponseCode, ServiceCallbacks};

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    transfer: &mut Option<TransferSession>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    let session = transfer
        .as_ref()
        .ok_or(NegativeResponseCode::UploadDownloadNotAccepted)?;

    let block_sequence_counter = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;

    // Retransmission of the same block while RCRRP is outstanding is detected only through the
    // RCRRP flag, not by comparing against the previous counter (spec.md §4.4).
    if !status.rcrrp && block_sequence_counter != session.expected_block_sequence_counter() {
        *transfer = None;
        return Err(NegativeResponseCode::RequestSequenceError);
    }

    let payload = ctx.read_rest();
    let session = transfer.as_ref().expect("checked Some above");
    if session.would_overflow(payload.len() as u64) {
        *transfer = None;
        return Err(NegativeResponseCode::TransferDataSuspended);
    }

    match callbacks.transfer_data(status, block_sequence_counter, payload) {
        Ok(()) => {
            let session = transfer.as_mut().expect("checked Some above");
            session.advance(payload.len() as u64);

            let request_sid =
                ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
            resp.start_positive(request_sid)?;
            resp.push_u8(block_sequence_counter)?;
            Ok(())
        }
        Err(NegativeResponseCode::RequestCorrectlyReceivedResponsePending) => {
            Err(NegativeResponseCode::RequestCorrectlyReceivedResponsePending)
        }
        Err(other) => {
            *transfer = None;
            Err(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressingScheme;

    struct AcceptAll;
    impl ServiceCallbacks for AcceptAll {
        fn transfer_data(
            &mut self,
            _status: &ProtocolStatus,
            _block_sequence_counter: u8,
            _data: &[u8],
        ) -> Result<(), NegativeResponseCode> {
            Ok(())
        }
    }

    #[test]
    fn happy_path_advances_session_and_echoes_counter() {
        let request = [0x36, 0x01, 0xAA, 0xBB];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut transfer = Some(TransferSession::new(0x10));

        handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut AcceptAll).unwrap();

        assert_eq!(resp.as_slice(), [0x76, 0x01]);
        let session = transfer.unwrap();
        assert_eq!(session.num_bytes_transferred(), 2);
        assert_eq!(session.expected_block_sequence_counter(), 2);
    }

    #[test]
    fn no_active_session_is_rejected() {
        let request = [0x36, 0x01];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut transfer = None;

        let result = handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut AcceptAll);
        assert_eq!(result, Err(NegativeResponseCode::UploadDownloadNotAccepted));
    }

    #[test]
    fn sequence_mismatch_tears_down_session() {
        let request = [0x36, 0x03, 0xAA];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut transfer = Some(TransferSession::new(0x10));

        let result = handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut AcceptAll);

        assert_eq!(result, Err(NegativeResponseCode::RequestSequenceError));
        assert!(transfer.is_none());
    }

    #[test]
    fn rcrrp_outstanding_allows_retransmission_without_advancing() {
        let request = [0x36, 0x01, 0xAA];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus {
            rcrrp: true,
            ..ProtocolStatus::default()
        };
        // Counter already advanced past 1 by an earlier successful block; retransmission of
        // block 1 must still be accepted while RCRRP is outstanding.
        let mut transfer = Some(TransferSession::new(0x10));
        transfer.as_mut().unwrap().advance(1);

        handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut AcceptAll).unwrap();

        assert_eq!(resp.as_slice(), [0x76, 0x01]);
    }

    #[test]
    fn overflow_tears_down_session() {
        let request = [0x36, 0x01, 0xAA, 0xBB, 0xCC];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut transfer = Some(TransferSession::new(2));

        let result = handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut AcceptAll);

        assert_eq!(result, Err(NegativeResponseCode::TransferDataSuspended));
        assert!(transfer.is_none());
    }

    #[test]
    fn response_pending_latches_without_tearing_down_session() {
        struct Pending;
        impl ServiceCallbacks for Pending {
            fn transfer_data(
                &mut self,
                _status: &ProtocolStatus,
                _block_sequence_counter: u8,
                _data: &[u8],
            ) -> Result<(), NegativeResponseCode> {
                Err(NegativeResponseCode::RequestCorrectlyReceivedResponsePending)
            }
        }

        let request = [0x36, 0x01, 0xAA];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 8];
        let mut resp = ResponseContext::new(&mut buf);
        let mut status = ProtocolStatus::default();
        let mut transfer = Some(TransferSession::new(0x10));

        let result = handle(&mut ctx, &mut resp, &mut transfer, &mut status, &mut Pending);

        assert_eq!(
            result,
            Err(NegativeResponseCode::RequestCorrectlyReceivedResponsePending)
        );
        assert!(transfer.is_some());
    }
}
