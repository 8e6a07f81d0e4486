//! Infrastructure adapters: durable storage and telemetry bootstrap.

pub mod error;
pub(crate) mod lock;
pub mod storage;
pub mod telemetry;
