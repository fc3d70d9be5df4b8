//! Rendering: CPU framebuffer, texture registry and the two compositors.
//!
//! Re-exports:
//! - `framebuffer`: CPU framebuffer and drawing primitives
//! - `textures`: name-keyed texture/pixmap registry with fallbacks
//! - `topdown`: top-down 2D debug view
//! - `render3d`: column renderer (walls, roofs, sprites)

pub mod framebuffer;
pub mod textures;
pub mod topdown;
pub mod render3d;
