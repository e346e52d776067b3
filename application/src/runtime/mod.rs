//! Cooperative concurrency helpers for toys that run workers

pub mod stop_signal;
pub mod worker_pool;

pub use stop_signal::{StopReason, StopSignal};
pub use worker_pool::{PoolReport, WorkerPool};
