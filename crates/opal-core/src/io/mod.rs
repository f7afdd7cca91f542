//! Network and filesystem I/O for the install engine.

pub mod sink;
pub mod transport;
