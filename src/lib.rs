//! A UDS (ISO 14229-1) diagnostic server engine.
//!
//! This crate implements the server side of the Unified Diagnostic Services protocol: request
//! dispatch, the diagnostic session and timing (P2/P2*/S3) state machine, and firmware transfer
//! sessions (`RequestDownload`/`TransferData`/`RequestTransferExit`). It does not implement a
//! transport layer itself; callers provide a [`Link`] and a [`Bus`] and drive [`UdsServer::poll`]
//! from their own event loop.
//!
//! The dispatch core never allocates: request and response payloads are borrowed slices, and
//! application behavior is wired in through the [`ServiceCallbacks`] trait rather than boxed
//! closures.

mod common;
pub use common::{
    DataFormatIdentifier, LengthFormatIdentifier, MemoryFormatIdentifier, NegativeResponseCode,
    ResetType, SecurityAccessType, SessionType,
};

mod error;
pub use error::{ConfigError, Error};

mod time;
pub use time::{Millis, time_after};

mod context;
pub use context::{RequestContext, ResponseContext};

mod registry;
pub use registry::ServiceId;

mod callbacks;
pub use callbacks::{RoutineControlSubFunction, ServiceCallbacks};

mod transfer;
pub use transfer::TransferSession;

mod dispatcher;
pub(crate) use dispatcher::dispatch;

pub mod services;

mod transport;
pub use transport::{AddressingScheme, Bus, BusError, CanFrame, Clock, Link, LinkError, SendStatus};

mod server;
pub use server::{Config, UdsServer};

/// Suppress Positive Response Message Indication Bit (ISO 14229-1 §B.1).
pub const SUPPRESS_POSITIVE_RESPONSE_BIT: u8 = 0x80;

/// Negative response service identifier (0x7F), prefixed to every negative response.
pub const NEGATIVE_RESPONSE_SID: u8 = 0x7F;
