//! Burn relay: signs and submits `emitBurn` contract calls on behalf of
//! HTTP callers.

pub mod chain;
pub mod config;
pub mod http;
pub mod metrics;
