//! The raycast engine itself.
//!
//! Re-exports:
//! - `ray`: collision, ray and pass value types
//! - `engine`: map/registry owner and the DDA + projection pass

pub mod ray;
pub mod engine;
