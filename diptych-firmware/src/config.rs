//! Embedded configuration
//!
//! Loads the front panel wiring embedded at compile time. The file is
//! syntax-checked by build.rs, so a parse failure here means the stock
//! defaults are close enough to keep the panel usable for debugging.

use defmt::*;

use diptych_core::config::{parse_config, FrontPanelConfig};

/// Embedded front panel wiring (compiled into the firmware)
/// Edit keypad.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../keypad.toml");

/// Parse the embedded wiring, falling back to the stock layout
pub fn load() -> FrontPanelConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            log_summary(&config);
            config
        }
        Err(e) => {
            error!("failed to parse embedded keypad.toml: {:?}", e);
            warn!("using stock front panel wiring");
            FrontPanelConfig::default()
        }
    }
}

fn log_summary(config: &FrontPanelConfig) {
    info!("front panel configuration loaded");
    debug!(
        "  keypad: up={} down={} left={} right={} ok={} cancel={}",
        config.keypad.up.pin,
        config.keypad.down.pin,
        config.keypad.left.pin,
        config.keypad.right.pin,
        config.keypad.ok.pin,
        config.keypad.cancel.pin,
    );
    debug!(
        "  panels: left=0x{:x} right=0x{:x}",
        config.displays.left.i2c_addr, config.displays.right.i2c_addr,
    );
}
