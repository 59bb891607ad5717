//! Panel rendering for Diptych
//!
//! This crate provides:
//! - `GraphicsSurface`: the core `Surface` contract over any monochrome
//!   `embedded-graphics` draw target
//! - `GraphicsScreen`: the core `Screen` contract over a buffered target
//!   that can flush to hardware
//! - the SSD1306 flush binding used by the firmware
//! - the font theme mapping the core's font slots to real fonts
//!
//! Windows never see hardware types: they draw through the `Surface` seam,
//! and the firmware only decides which concrete target backs it.

#![no_std]
#![deny(unsafe_code)]

pub mod screen;
pub mod surface;
pub mod theme;

pub use screen::{FlushTarget, GraphicsScreen};
pub use surface::GraphicsSurface;
