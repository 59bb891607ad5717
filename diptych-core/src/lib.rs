//! Board-agnostic core logic for the Diptych front panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Button events and the keypad registry (`input`)
//! - The controller capability, leaf handlers, and the broadcast chain
//!   (`controller`)
//! - Focus coordination across the two panels (`focus`)
//! - The window contract and the concrete menu window (`ui`)
//! - Configuration type definitions and the keypad TOML parser (`config`)
//!
//! Everything here runs on the host as well as on target; the firmware crate
//! supplies GPIO delivery and real panels.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod focus;
pub mod input;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
