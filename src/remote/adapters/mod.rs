//! Adapter implementations of the remote collection port.

pub mod http;
pub mod memory;
