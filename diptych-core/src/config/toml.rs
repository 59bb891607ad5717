//! Simple TOML parser for the front panel configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `keypad.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (integer, boolean)
//! - Hex integers (0x3c)
//! - [section] and [section.subsection] headers
//! - Comments (# ...)
//!
//! Unknown keys are ignored so older firmware keeps booting on newer
//! config files; unknown sections are rejected.

use crate::input::ButtonName;

use super::FrontPanelConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value for a known key
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Keypad,
    KeypadButton(ButtonName),
    DisplayLeft,
    DisplayRight,
    Leds,
}

/// Parse TOML configuration into a [`FrontPanelConfig`]
///
/// Starts from the stock defaults; the file overrides what it names.
pub fn parse_config(input: &str) -> Result<FrontPanelConfig, ParseError> {
    let mut config = FrontPanelConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Key = value
        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse section header like "keypad", "keypad.up" or "display.left"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some(rest) = header.strip_prefix("keypad.") {
        let button = ButtonName::ALL
            .into_iter()
            .find(|name| name.as_str() == rest)
            .ok_or(ParseError::InvalidSection)?;
        return Ok(Section::KeypadButton(button));
    }

    match header {
        "keypad" => Ok(Section::Keypad),
        "display.left" => Ok(Section::DisplayLeft),
        "display.right" => Ok(Section::DisplayRight),
        "leds" => Ok(Section::Leds),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split a "key = value" line, stripping a trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let value = match value.split_once('#') {
        Some((value, _comment)) => value,
        None => value,
    };
    Some((key.trim(), value.trim()))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FrontPanelConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => Ok(()),
        Section::Keypad => {
            if key == "bounce_ms" {
                let bounce = parse_u16(value)?;
                for name in ButtonName::ALL {
                    config.keypad.button_mut(name).bounce_ms = bounce;
                }
            }
            Ok(())
        }
        Section::KeypadButton(name) => {
            let button = config.keypad.button_mut(name);
            match key {
                "pin" => button.pin = parse_u8(value)?,
                "pull_up" => button.pull_up = parse_bool(value)?,
                "bounce_ms" => button.bounce_ms = parse_u16(value)?,
                "hold_ms" => button.hold_ms = Some(parse_u16(value)?),
                "hold_repeat" => button.hold_repeat = parse_bool(value)?,
                _ => {}
            }
            Ok(())
        }
        Section::DisplayLeft => {
            if key == "i2c_addr" {
                config.displays.left.i2c_addr = parse_u8(value)?;
            }
            Ok(())
        }
        Section::DisplayRight => {
            if key == "i2c_addr" {
                config.displays.right.i2c_addr = parse_u8(value)?;
            }
            Ok(())
        }
        Section::Leds => {
            match key {
                "activity" => config.leds.activity = Some(parse_u8(value)?),
                "heartbeat" => config.leds.heartbeat = Some(parse_u8(value)?),
                _ => {}
            }
            Ok(())
        }
    }
}

fn parse_u32(value: &str) -> Result<u32, ParseError> {
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_u16(value: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_u32(value)?).map_err(|_| ParseError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ParseError> {
    u8::try_from(parse_u32(value)?).map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
