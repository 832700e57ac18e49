// Capture domain — frame sources, the capture loop, and session stats.

pub mod collector;
pub mod error;
pub mod frame;
pub mod http;
pub mod source;
pub mod stats;
