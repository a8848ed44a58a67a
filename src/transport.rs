//! Transport, bus, and clock interfaces consumed by [`crate::UdsServer`].
//!
//! These are narrow traits the host application implements; this crate ships no transport,
//! bus driver, or clock of its own. Grounded on the teacher's separation of wire codec from
//! I/O (the teacher never owns a socket either) and on the fixed-size frame structs used
//! throughout the embedded-bus examples in the retrieval pack — `CanFrame` is a plain `Copy`
//! value, never heap-allocated.

use thiserror::Error;

/// Which channel a request arrived on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressingScheme {
    /// Targeted to this ECU specifically; a response is expected.
    Physical,
    /// Broadcast to many ECUs; silence is the correct reply to "not applicable" outcomes.
    Functional,
}

/// Whether a link's send buffer still holds an outstanding transmission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SendStatus {
    Idle,
    InProgress,
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("link send buffer is full")]
    SendBufferFull,
    #[error("link receive buffer overflowed")]
    ReceiveOverflow,
}

#[derive(Error, Debug)]
pub enum BusError {
    #[error("bus transmit failed")]
    TransmitFailed,
}

/// One channel (physical or functional) of the segmentation transport beneath UDS.
///
/// The segmentation layer itself — reassembling multi-frame messages — is out of scope; a
/// `Link` implementation owns that bookkeeping and exposes only whole messages.
pub trait Link {
    /// Queues a whole message for transmission.
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Drains one whole message if available. Returns the number of bytes written into `out`.
    fn receive(&mut self, out: &mut [u8]) -> Result<Option<usize>, LinkError>;

    /// Periodic bookkeeping (segmentation timers, flow control).
    fn poll(&mut self, now_ms: u32);

    /// Whether this link's send buffer still holds an outstanding transmission.
    fn send_status(&self) -> SendStatus;

    /// Hands a received bus frame to this link for reassembly bookkeeping.
    fn on_frame(&mut self, arbitration_id: u32, data: &[u8]);
}

/// A single CAN frame, fixed-size and `Copy` so bus polling never allocates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CanFrame {
    pub arbitration_id: u32,
    pub data: [u8; 8],
    pub len: u8,
}

impl CanFrame {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

/// The underlying CAN (or similar) bus driver.
pub trait Bus {
    /// Transmits one bus frame.
    fn can_tx(&mut self, arbitration_id: u32, data: &[u8]) -> Result<(), BusError>;

    /// Non-blocking receive of one frame.
    fn can_rx_poll(&mut self) -> Option<CanFrame>;
}

/// A monotonic millisecond clock source, which may wrap.
pub trait Clock {
    fn now_ms(&self) -> crate::Millis;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_frame_as_slice_respects_len() {
        let frame = CanFrame {
            arbitration_id: 0x7E0,
            data: [0x02, 0x10, 0x03, 0, 0, 0, 0, 0],
            len: 3,
        };
        assert_eq!(frame.as_slice(), [0x02, 0x10, 0x03]);
    }
}
