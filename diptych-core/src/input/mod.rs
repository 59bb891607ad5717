//! Button input events
//!
//! The keypad delivers raw pin transitions; the [`InputHub`](hub::InputHub)
//! turns them into [`ButtonEvent`] values and hands them to the dispatch
//! chain.

pub mod hub;

pub use hub::{BindingError, ButtonBinding, InputHub, MAX_BINDINGS};

use embassy_time::Instant;

/// Physical GPIO pin number of a keypad button.
pub type PinId = u8;

/// Highest GPIO number a keypad button may use (RP2040 user bank).
pub const PIN_MAX: PinId = 29;

/// Logical keypad buttons (fixed vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonName {
    Up,
    Down,
    Left,
    Right,
    Ok,
    Cancel,
}

impl ButtonName {
    /// All buttons in keypad order
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Ok,
        Self::Cancel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Ok => "ok",
            Self::Cancel => "cancel",
        }
    }

    /// Returns true for the four direction-pad buttons
    pub fn is_dpad(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Returns the vertical direction as a signed step (-1 for up, +1 for
    /// down, 0 otherwise)
    pub fn vertical_delta(self) -> i8 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
            _ => 0,
        }
    }
}

/// What a bound button did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    Pressed,
    Released,
    Held,
}

/// One observed transition on a bound key
///
/// Built by the hub on every hardware callback and consumed synchronously by
/// the dispatch chain; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub pin: PinId,
    pub name: ButtonName,
    pub action: ButtonAction,
    pub timestamp: Instant,
}
