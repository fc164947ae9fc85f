//! Progressive Mandelbrot renderer.
//!
//! A render cycle paints the Mandelbrot set over four passes of shrinking
//! blocks, one block per tick, so a host can keep its display loop responsive
//! while the image sharpens from an 8×8 preview to full resolution.
//!
//! The engine ([`scheduler::RenderState`]) knows nothing about windows or
//! GPUs: it paints through the [`surface::Surface`] trait and is driven by
//! whatever calls [`scheduler::RenderState::tick`]. The windowed viewer in
//! `main.rs` drives it from a `winit` event loop and presents a
//! [`surface::Framebuffer`] with `wgpu`.

pub mod colour;
pub mod complex;
pub mod config;
pub mod controls;
pub mod display;
pub mod error;
pub mod escape;
pub mod pass;
pub mod scheduler;
pub mod screen;
pub mod surface;
pub mod ticker;
pub mod view;

pub use complex::Complex;
pub use error::{Error, Result};
pub use scheduler::{RenderState, Tick, TickHandle};
pub use view::ViewParameters;
