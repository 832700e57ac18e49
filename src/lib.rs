//! orbitscan — capture a bounded, evenly-spread image set from a live camera
//! feed and drive the COLMAP toolchain to a fused 3-D point cloud.

pub mod capture;
pub mod collection;
pub mod config;
pub mod preprocess;
pub mod reconstruct;
pub mod viewer;
