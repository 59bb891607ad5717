//! Configuration type definitions
//!
//! The front panel wiring (keypad pins, debounce/hold parameters, panel
//! addresses, indicator LEDs) is data, not code: the firmware embeds a
//! `keypad.toml` and parses it with the minimal parser in [`toml`].

pub mod toml;

pub use toml::{parse_config, ParseError};

use crate::input::{ButtonBinding, ButtonName, PinId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Debounce window applied when a button does not override it
pub const DEFAULT_BOUNCE_MS: u16 = 200;

/// Hold threshold for repeat-scrolling on the vertical pad
pub const DEFAULT_REPEAT_HOLD_MS: u16 = 600;

/// Hold threshold for the long-cancel shutdown request
pub const DEFAULT_SHUTDOWN_HOLD_MS: u16 = 1500;

/// Wiring and timing for one keypad button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonPinConfig {
    pub pin: PinId,
    pub pull_up: bool,
    pub bounce_ms: u16,
    pub hold_ms: Option<u16>,
    pub hold_repeat: bool,
}

impl ButtonPinConfig {
    pub const fn new(pin: PinId) -> Self {
        Self {
            pin,
            pull_up: true,
            bounce_ms: DEFAULT_BOUNCE_MS,
            hold_ms: None,
            hold_repeat: false,
        }
    }

    pub const fn with_hold(pin: PinId, hold_ms: u16, hold_repeat: bool) -> Self {
        Self {
            pin,
            pull_up: true,
            bounce_ms: DEFAULT_BOUNCE_MS,
            hold_ms: Some(hold_ms),
            hold_repeat,
        }
    }
}

/// The six-button keypad layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeypadConfig {
    pub up: ButtonPinConfig,
    pub down: ButtonPinConfig,
    pub left: ButtonPinConfig,
    pub right: ButtonPinConfig,
    pub ok: ButtonPinConfig,
    pub cancel: ButtonPinConfig,
}

impl Default for KeypadConfig {
    /// The stock front panel wiring
    fn default() -> Self {
        Self {
            up: ButtonPinConfig::with_hold(27, DEFAULT_REPEAT_HOLD_MS, true),
            down: ButtonPinConfig::with_hold(5, DEFAULT_REPEAT_HOLD_MS, true),
            left: ButtonPinConfig::new(17),
            right: ButtonPinConfig::new(22),
            ok: ButtonPinConfig::new(12),
            cancel: ButtonPinConfig::with_hold(6, DEFAULT_SHUTDOWN_HOLD_MS, false),
        }
    }
}

impl KeypadConfig {
    pub fn button(&self, name: ButtonName) -> &ButtonPinConfig {
        match name {
            ButtonName::Up => &self.up,
            ButtonName::Down => &self.down,
            ButtonName::Left => &self.left,
            ButtonName::Right => &self.right,
            ButtonName::Ok => &self.ok,
            ButtonName::Cancel => &self.cancel,
        }
    }

    pub fn button_mut(&mut self, name: ButtonName) -> &mut ButtonPinConfig {
        match name {
            ButtonName::Up => &mut self.up,
            ButtonName::Down => &mut self.down,
            ButtonName::Left => &mut self.left,
            ButtonName::Right => &mut self.right,
            ButtonName::Ok => &mut self.ok,
            ButtonName::Cancel => &mut self.cancel,
        }
    }

    /// The hub registrations this layout describes
    pub fn bindings(&self) -> [ButtonBinding; 6] {
        ButtonName::ALL.map(|name| {
            let button = self.button(name);
            ButtonBinding {
                pin: button.pin,
                name,
                pull_up: button.pull_up,
                bounce_ms: button.bounce_ms,
                hold_ms: button.hold_ms,
                hold_repeat: button.hold_repeat,
            }
        })
    }
}

/// One panel's bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub i2c_addr: u8,
}

/// Both panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayPairConfig {
    pub left: DisplayConfig,
    pub right: DisplayConfig,
}

impl Default for DisplayPairConfig {
    fn default() -> Self {
        Self {
            left: DisplayConfig { i2c_addr: 0x3d },
            right: DisplayConfig { i2c_addr: 0x3c },
        }
    }
}

/// Indicator LED wiring; unset LEDs are simply not driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedConfig {
    pub activity: Option<PinId>,
    pub heartbeat: Option<PinId>,
}

/// Complete front panel description, as parsed from `keypad.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrontPanelConfig {
    pub keypad: KeypadConfig,
    pub displays: DisplayPairConfig,
    pub leds: LedConfig,
}
