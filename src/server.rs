//! Configuration, protocol status, and the server poll loop.

use crate::dispatcher::dispatch;
use crate::time::{Millis, time_after};
use crate::transfer::TransferSession;
use crate::transport::{AddressingScheme, Bus, Clock, Link, SendStatus};
use crate::{ConfigError, SessionType, ServiceCallbacks};

/// Construction-time parameters for a [`UdsServer`].
///
/// All fields are mandatory (spec: "All pointer arguments except user service callbacks are
/// mandatory"); the two transport links, the bus, the clock, and the callback implementor are
/// supplied separately to [`UdsServer::new`] since they are not `Copy`/`Default`-able data.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub phys_recv_id: u32,
    pub func_recv_id: u32,
    pub send_id: u32,
    pub p2_ms: Millis,
    pub p2_star_ms: Millis,
    pub s3_ms: Millis,
    /// Capacity of each link's request scratch buffer, allocated once at construction.
    pub req_buf_capacity: usize,
    /// Capacity of the shared response scratch buffer, allocated once at construction.
    pub resp_buf_capacity: usize,
}

impl Config {
    /// Convenience constructor using the default 64-byte request/response scratch capacity.
    pub fn new(
        phys_recv_id: u32,
        func_recv_id: u32,
        send_id: u32,
        p2_ms: Millis,
        p2_star_ms: Millis,
        s3_ms: Millis,
    ) -> Result<Self, ConfigError> {
        Self::with_buffers(
            phys_recv_id,
            func_recv_id,
            send_id,
            p2_ms,
            p2_star_ms,
            s3_ms,
            64,
            64,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_buffers(
        phys_recv_id: u32,
        func_recv_id: u32,
        send_id: u32,
        p2_ms: Millis,
        p2_star_ms: Millis,
        s3_ms: Millis,
        req_buf_capacity: usize,
        resp_buf_capacity: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            phys_recv_id,
            func_recv_id,
            send_id,
            p2_ms,
            p2_star_ms,
            s3_ms,
            req_buf_capacity,
            resp_buf_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.p2_ms == 0 {
            return Err(ConfigError::ZeroP2);
        }
        if self.s3_ms == 0 {
            return Err(ConfigError::ZeroS3);
        }
        if self.phys_recv_id == self.func_recv_id {
            return Err(ConfigError::DuplicateRecvId(self.phys_recv_id));
        }
        if self.req_buf_capacity <= 2 {
            return Err(ConfigError::BufferTooSmall {
                name: "request",
                capacity: self.req_buf_capacity,
            });
        }
        if self.resp_buf_capacity <= 2 {
            return Err(ConfigError::BufferTooSmall {
                name: "response",
                capacity: self.resp_buf_capacity,
            });
        }
        Ok(())
    }
}

/// Protocol status: readable (and, for security level, writable through callbacks'
/// side-effects) by user [`ServiceCallbacks`] implementations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtocolStatus {
    pub session_type: SessionType,
    pub security_level: u8,
    /// Request Correctly Received – Response Pending outstanding.
    pub rcrrp: bool,
}

impl Default for ProtocolStatus {
    fn default() -> Self {
        Self {
            session_type: SessionType::Default,
            security_level: 0,
            rcrrp: false,
        }
    }
}

/// Internal timing/readiness state, not exposed to callbacks.
pub(crate) struct TimingState {
    pub p2_timer: Millis,
    pub s3_timeout: Millis,
    pub not_ready_to_receive: bool,
    pub ecu_reset_scheduled: bool,
}

impl TimingState {
    pub(crate) fn new(now_ms: Millis, p2_ms: Millis) -> Self {
        Self {
            p2_timer: now_ms.wrapping_sub(p2_ms),
            s3_timeout: 0,
            not_ready_to_receive: false,
            ecu_reset_scheduled: false,
        }
    }
}

/// A UDS server instance: owns both transport links, the bus, the clock, protocol state, and
/// the application's [`ServiceCallbacks`] implementation.
pub struct UdsServer<L1, L2, B, Clk, C> {
    config: Config,
    phys_link: L1,
    func_link: L2,
    bus: B,
    clock: Clk,
    callbacks: C,
    status: ProtocolStatus,
    timing: TimingState,
    transfer: Option<TransferSession>,
    response_buf: Box<[u8]>,
    phys_request_buf: Box<[u8]>,
    phys_request_len: usize,
    func_request_buf: Box<[u8]>,
    func_request_len: usize,
    /// Which link's buffered request the outstanding RCRRP deferral belongs to. `Some` iff
    /// `status.rcrrp` is true; tracked separately from `status.rcrrp` itself so the deferred
    /// pass (step 3) knows which link to poll for idleness and which buffer to re-dispatch.
    pending_addressing: Option<AddressingScheme>,
}

impl<L1, L2, B, Clk, C> UdsServer<L1, L2, B, Clk, C>
where
    L1: Link,
    L2: Link,
    B: Bus,
    Clk: Clock,
    C: ServiceCallbacks,
{
    pub fn new(
        config: Config,
        phys_link: L1,
        func_link: L2,
        bus: B,
        clock: Clk,
        callbacks: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = clock.now_ms();
        Ok(Self {
            timing: TimingState::new(now, config.p2_ms),
            response_buf: vec![0u8; config.resp_buf_capacity].into_boxed_slice(),
            phys_request_buf: vec![0u8; config.req_buf_capacity].into_boxed_slice(),
            phys_request_len: 0,
            func_request_buf: vec![0u8; config.req_buf_capacity].into_boxed_slice(),
            func_request_len: 0,
            pending_addressing: None,
            config,
            phys_link,
            func_link,
            bus,
            clock,
            callbacks,
            status: ProtocolStatus::default(),
            transfer: None,
        })
    }

    #[must_use]
    pub fn status(&self) -> ProtocolStatus {
        self.status
    }

    #[must_use]
    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    /// Drives one iteration of the server's cooperative poll loop (spec §4.6). Dispatches at
    /// most one request and produces at most one response.
    pub fn poll(&mut self) {
        let now_ms = self.clock.now_ms();

        // Step 1: bus pump.
        if let Some(frame) = self.bus.can_rx_poll() {
            if frame.arbitration_id == self.config.phys_recv_id {
                self.phys_link.on_frame(frame.arbitration_id, frame.as_slice());
            } else if frame.arbitration_id == self.config.func_recv_id {
                self.func_link.on_frame(frame.arbitration_id, frame.as_slice());
            }
        }
        self.phys_link.poll(now_ms);
        self.func_link.poll(now_ms);

        // Step 2: session timeout.
        if self.status.session_type != SessionType::Default
            && time_after(now_ms, self.timing.s3_timeout)
        {
            self.callbacks.session_timeout();
            self.status.session_type = SessionType::Default;
        }

        // Step 3: deferred RCRRP handling. `pending_addressing` records which link's buffered
        // request the outstanding deferral belongs to; only that link's idleness is checked and
        // only that link's buffer is re-dispatched. At most one request is dispatched per poll,
        // so this returns immediately once it produces a final answer (spec §4.6, §5) rather
        // than falling through to step 6 and picking up a second request in the same poll.
        match self.pending_addressing {
            Some(AddressingScheme::Physical) if self.phys_link.send_status() == SendStatus::Idle => {
                let request_len = self.phys_request_len;
                let response_len = dispatch(
                    &self.phys_request_buf[..request_len],
                    AddressingScheme::Physical,
                    &mut self.response_buf,
                    &mut self.status,
                    &mut self.timing,
                    &mut self.transfer,
                    &self.config,
                    now_ms,
                    &mut self.callbacks,
                );
                self.timing.not_ready_to_receive =
                    self.status.rcrrp || self.timing.ecu_reset_scheduled;
                if !self.status.rcrrp {
                    self.pending_addressing = None;
                }
                if response_len > 0 {
                    let _ = self.phys_link.send(&self.response_buf[..response_len]);
                }
                return;
            }
            Some(AddressingScheme::Functional) if self.func_link.send_status() == SendStatus::Idle => {
                let request_len = self.func_request_len;
                let response_len = dispatch(
                    &self.func_request_buf[..request_len],
                    AddressingScheme::Functional,
                    &mut self.response_buf,
                    &mut self.status,
                    &mut self.timing,
                    &mut self.transfer,
                    &self.config,
                    now_ms,
                    &mut self.callbacks,
                );
                self.timing.not_ready_to_receive =
                    self.status.rcrrp || self.timing.ecu_reset_scheduled;
                if !self.status.rcrrp {
                    self.pending_addressing = None;
                }
                if response_len > 0 {
                    let _ = self.func_link.send(&self.response_buf[..response_len]);
                }
                return;
            }
            _ => {}
        }

        // Step 4: gate on notReadyToReceive.
        if self.timing.not_ready_to_receive {
            return;
        }

        // Step 5: gate on p2.
        if !time_after(now_ms, self.timing.p2_timer) {
            return;
        }

        // Step 6: receive, physical first.
        if let Ok(Some(len)) = self.phys_link.receive(&mut self.phys_request_buf) {
            self.phys_request_len = len;
            let response_len = dispatch(
                &self.phys_request_buf[..len],
                AddressingScheme::Physical,
                &mut self.response_buf,
                &mut self.status,
                &mut self.timing,
                &mut self.transfer,
                &self.config,
                now_ms,
                &mut self.callbacks,
            );
            self.timing.not_ready_to_receive =
                self.status.rcrrp || self.timing.ecu_reset_scheduled;
            self.pending_addressing = self.status.rcrrp.then_some(AddressingScheme::Physical);
            if response_len > 0 {
                let _ = self.phys_link.send(&self.response_buf[..response_len]);
            }
            self.timing.p2_timer = now_ms.wrapping_add(self.config.p2_ms);
            return;
        }

        if let Ok(Some(len)) = self.func_link.receive(&mut self.func_request_buf) {
            self.func_request_len = len;
            let response_len = dispatch(
                &self.func_request_buf[..len],
                AddressingScheme::Functional,
                &mut self.response_buf,
                &mut self.status,
                &mut self.timing,
                &mut self.transfer,
                &self.config,
                now_ms,
                &mut self.callbacks,
            );
            self.timing.not_ready_to_receive =
                self.status.rcrrp || self.timing.ecu_reset_scheduled;
            self.pending_addressing = self.status.rcrrp.then_some(AddressingScheme::Functional);
            if response_len > 0 {
                let _ = self.func_link.send(&self.response_buf[..response_len]);
            }
            self.timing.p2_timer = now_ms.wrapping_add(self.config.p2_ms);
        }
    }
}
