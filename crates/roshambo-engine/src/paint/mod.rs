//! Paint model shared between the overlay canvas and renderers.
//!
//! Colours are straight-alpha sRGB bytes, the layout the overlay canvas stores
//! and uploads. Conversion to linear float happens only at the GPU boundary.

pub mod color;

pub use color::Color;
