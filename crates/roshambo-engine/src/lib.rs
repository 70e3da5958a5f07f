//! Roshambo engine crate.
//!
//! Platform and GPU runtime pieces used by the game layer: the window loop,
//! the GPU device, keyboard input, frame timing, logging, the shader-driven
//! background renderer and the 2D overlay path.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod canvas;
pub mod text;
