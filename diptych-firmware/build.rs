//! Build script for diptych-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates keypad.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate keypad.toml at compile time
///
/// The firmware falls back to stock wiring if the embedded file fails to
/// parse at run time, but a broken file should never get that far.
fn validate_config() {
    println!("cargo:rerun-if-changed=keypad.toml");

    let config_path = Path::new("keypad.toml");
    if !config_path.exists() {
        panic!("keypad.toml not found; the firmware embeds it at compile time");
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("failed to read keypad.toml: {e}"));

    let config: toml::Value = toml::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid TOML syntax in keypad.toml:\n{e}"));

    validate_keypad(&config);
    validate_displays(&config);
}

const BUTTONS: [&str; 6] = ["up", "down", "left", "right", "ok", "cancel"];

fn validate_keypad(config: &toml::Value) {
    let Some(keypad) = config.get("keypad") else {
        return;
    };

    let mut pins: Vec<(String, i64)> = Vec::new();
    for button in BUTTONS {
        let Some(pin) = keypad.get(button).and_then(|b| b.get("pin")) else {
            continue;
        };
        let pin = pin
            .as_integer()
            .unwrap_or_else(|| panic!("keypad.{button}.pin must be an integer"));
        if !(0..=29).contains(&pin) {
            panic!("keypad.{button}.pin = {pin} is outside the RP2040 GPIO range 0..=29");
        }
        if let Some((other, _)) = pins.iter().find(|(_, p)| *p == pin) {
            panic!("keypad.{button} and keypad.{other} both claim GPIO {pin}");
        }
        pins.push((button.to_string(), pin));
    }
}

fn validate_displays(config: &toml::Value) {
    let Some(displays) = config.get("display") else {
        return;
    };
    for side in ["left", "right"] {
        let Some(addr) = displays.get(side).and_then(|d| d.get("i2c_addr")) else {
            continue;
        };
        let addr = addr
            .as_integer()
            .unwrap_or_else(|| panic!("display.{side}.i2c_addr must be an integer"));
        if !(0x08..=0x77).contains(&addr) {
            panic!("display.{side}.i2c_addr = {addr:#x} is not a valid 7-bit I2C address");
        }
    }
}
