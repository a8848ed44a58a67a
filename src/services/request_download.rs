//! `0x34 RequestDownload`.

use crate::context::{RequestContext, ResponseContext};
use crate::server::ProtocolStatus;
use crate::transfer::TransferSession;
use crate::{DataFormatIdentifier, LengthFormatIdentifier, MemoryFormatIdentifier};
use crate::{NegativeResponseCode, ServiceCallbacks};

/// Transport MTU `maxNumberOfBlockLength` is clamped to by default (spec.md §4.3).
const DEFAULT_MTU: u16 = 4095;
const MIN_MAX_BLOCK_LENGTH: u16 = 3;

pub(crate) fn handle<C: ServiceCallbacks>(
    ctx: &mut RequestContext<'_>,
    resp: &mut ResponseContext<'_>,
    transfer: &mut Option<TransferSession>,
    status: &ProtocolStatus,
    callbacks: &mut C,
) -> Result<(), NegativeResponseCode> {
    if transfer.is_some() {
        return Err(NegativeResponseCode::ConditionsNotCorrect);
    }

    let dfi_raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let data_format_identifier = DataFormatIdentifier::from(dfi_raw);

    let alfi_raw = ctx
        .read_u8()
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    // The reference behavior for a malformed address/length format nibble pair is
    // RequestOutOfRange (see common::format_identifiers), not IncorrectMessageLengthOrInvalidFormat.
    let memory_format = MemoryFormatIdentifier::try_from(alfi_raw)
        .map_err(|_| NegativeResponseCode::RequestOutOfRange)?;

    let memory_address = ctx
        .read_uint_be(memory_format.memory_address_length as usize)
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;
    let memory_size = ctx
        .read_uint_be(memory_format.memory_size_length as usize)
        .ok_or(NegativeResponseCode::IncorrectMessageLengthOrInvalidFormat)?;

    let proposed_max_block =
        callbacks.request_download(status, memory_address, memory_size, data_format_identifier)?;
    if proposed_max_block < MIN_MAX_BLOCK_LENGTH {
        return Err(NegativeResponseCode::GeneralProgrammingFailure);
    }
    let max_block = proposed_max_block.min(DEFAULT_MTU);

    *transfer = Some(TransferSession::new(memory_size));

    let request_sid = ctx.sid().expect("dispatcher only calls handlers with a SID byte present");
    resp.start_positive(request_sid)?;
    resp.push_u8(u8::from(LengthFormatIdentifier {
        max_number_of_block_length: 2,
    }))?;
    resp.push_u16_be(max_block)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressingScheme;

    struct Downloader;
    impl ServiceCallbacks for Downloader {
        fn request_download(
            &mut self,
            _status: &ProtocolStatus,
            memory_address: u64,
            memory_size: u64,
            _data_format_identifier: DataFormatIdentifier,
        ) -> Result<u16, NegativeResponseCode> {
            assert_eq!(memory_address, 0x0010_0000);
            assert_eq!(memory_size, 0x10);
            Ok(128)
        }
    }

    #[test]
    fn happy_path_installs_session_and_echoes_clamped_block_length() {
        // addressAndLengthFormatIdentifier 0x24: memorySizeLength=2, memoryAddressLength=4.
        let request = [0x34, 0x00, 0x24, 0x00, 0x10, 0x00, 0x00, 0x00, 0x10];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 16];
        let mut resp = ResponseContext::new(&mut buf);
        let status = ProtocolStatus::default();
        let mut transfer = None;

        handle(&mut ctx, &mut resp, &mut transfer, &status, &mut Downloader).unwrap();

        assert_eq!(resp.as_slice(), [0x74, 0x20, 0x00, 0x80]);
        let session = transfer.expect("session installed");
        assert_eq!(session.requested_transfer_size(), 0x10);
        assert_eq!(session.num_bytes_transferred(), 0);
    }

    #[test]
    fn block_length_is_clamped_to_mtu() {
        struct GreedyDownloader;
        impl ServiceCallbacks for GreedyDownloader {
            fn request_download(
                &mut self,
                _status: &ProtocolStatus,
                _memory_address: u64,
                _memory_size: u64,
                _data_format_identifier: DataFormatIdentifier,
            ) -> Result<u16, NegativeResponseCode> {
                Ok(u16::MAX)
            }
        }

        let request = [0x34, 0x00, 0x24, 0x00, 0x10, 0x00, 0x00, 0x00, 0x10];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 16];
        let mut resp = ResponseContext::new(&mut buf);
        let status = ProtocolStatus::default();
        let mut transfer = None;

        handle(&mut ctx, &mut resp, &mut transfer, &status, &mut GreedyDownloader).unwrap();

        assert_eq!(&resp.as_slice()[2..], &DEFAULT_MTU.to_be_bytes()[..]);
    }

    #[test]
    fn second_request_while_session_active_is_rejected() {
        let request = [0x34, 0x00, 0x24, 0x00, 0x10, 0x00, 0x00, 0x00, 0x10];
        let mut ctx = RequestContext::new(&request, AddressingScheme::Physical);
        ctx.read_u8();
        let mut buf = [0u8; 16];
        let mut resp = ResponseContext::new(&mut buf);
        let status = ProtocolStatus::default();
        let mut transfer = Some(TransferSession::new(0x10));

        let result = handle(&mut ctx, &mut resp, &mut transfer, &status, &mut Downloader);

        assert_eq!(result, Err(NegativeResponseCode::ConditionsNotCorrect));
        assert_eq!(transfer.unwrap().requested_transfer_size(), 0x10);
    }
}
