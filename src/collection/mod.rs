// Collection domain — session layout, indexed image storage, trimming.

pub mod error;
pub mod session;
pub mod store;
pub mod trim;
