//! Diptych - dual-panel menu front end
//!
//! Main firmware binary for RP2040 boards: two SSD1306 OLED panels, one
//! six-button keypad, indicator LEDs. All dispatch and focus logic lives in
//! diptych-core; this binary wires GPIO edges and I2C panels to it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::AnyPin;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_time::Timer;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use diptych_core::controller::{ButtonHooks, ControllerChain, Leaf, Priority};
use diptych_core::focus::{FocusCoordinator, RefreshQueue, ScreenId};
use diptych_core::input::InputHub;
use diptych_core::ui::MenuWindow;
use diptych_display::GraphicsScreen;

use crate::channels::LED_ACTIVITY;

mod channels;
mod config;
mod tasks;

/// Buffered SSD1306 over one of the I2C buses
type Oled<BUS> =
    Ssd1306<I2CInterface<BUS>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;
type LeftOled = Oled<I2c<'static, I2C0, i2c::Blocking>>;
type RightOled = Oled<I2c<'static, I2C1, i2c::Blocking>>;

// Core registries; everything reachable from the interrupt path lives in
// statics, handed out as non-owning references
static HUB: InputHub = InputHub::new();
static ROOT_CHAIN: ControllerChain = ControllerChain::new();
static REFRESH: RefreshQueue = RefreshQueue::new();

static LEFT_MENU: MenuWindow = MenuWindow::new("Main Menu");
static RIGHT_MENU: MenuWindow = MenuWindow::new("Status");

static LEFT_PANEL: StaticCell<GraphicsScreen<LeftOled>> = StaticCell::new();
static RIGHT_PANEL: StaticCell<GraphicsScreen<RightOled>> = StaticCell::new();
static COORDINATOR: StaticCell<FocusCoordinator> = StaticCell::new();
static ACTIVITY_PAD: StaticCell<Leaf<(), 4>> = StaticCell::new();
static PANEL_KEYS: StaticCell<Leaf<&'static FocusCoordinator, 2>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Diptych firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Panels: left on I2C0 (SDA=GPIO8, SCL=GPIO9), right on I2C1
    // (SDA=GPIO10, SCL=GPIO11). Addresses come from keypad.toml.
    let left_i2c = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c::Config::default());
    let right_i2c = I2c::new_blocking(p.I2C1, p.PIN_11, p.PIN_10, i2c::Config::default());
    let left_panel = LEFT_PANEL.init(GraphicsScreen::new(init_oled(
        left_i2c,
        config.displays.left.i2c_addr,
    )));
    let right_panel = RIGHT_PANEL.init(GraphicsScreen::new(init_oled(
        right_i2c,
        config.displays.right.i2c_addr,
    )));
    info!("OLED panels initialized");

    // Keypad and indicator GPIOs this board exposes. keypad.toml may only
    // name pins from this set.
    let mut panel_pins: [(u8, Option<AnyPin>); 8] = [
        (27, Some(AnyPin::from(p.PIN_27))),
        (5, Some(AnyPin::from(p.PIN_5))),
        (17, Some(AnyPin::from(p.PIN_17))),
        (22, Some(AnyPin::from(p.PIN_22))),
        (12, Some(AnyPin::from(p.PIN_12))),
        (6, Some(AnyPin::from(p.PIN_6))),
        (13, Some(AnyPin::from(p.PIN_13))),
        (19, Some(AnyPin::from(p.PIN_19))),
    ];

    let coordinator: &'static FocusCoordinator = COORDINATOR.init(FocusCoordinator::new(
        &HUB,
        &ROOT_CHAIN,
        &REFRESH,
        config.keypad,
        left_panel,
        right_panel,
    ));

    // Registers the keypad with the hub and the coordinator at the front of
    // the chain; any failure here is a wiring mistake
    coordinator.install().unwrap();

    // Windows
    LEFT_MENU.add_item("System Info", None).unwrap();
    LEFT_MENU.add_item("Options", None).unwrap();
    LEFT_MENU
        .add_item("Reboot", Some(|| cortex_m::peripheral::SCB::sys_reset()))
        .unwrap();
    RIGHT_MENU
        .add_item("Sensors", Some(|| info!("sensors: not fitted")))
        .unwrap();
    RIGHT_MENU
        .add_item("Uptime", Some(|| info!("uptime: see RTT timestamps")))
        .unwrap();
    RIGHT_MENU.add_item("About", None).unwrap();

    coordinator.assign_window(ScreenId::Left, &LEFT_MENU).unwrap();
    coordinator
        .assign_window(ScreenId::Right, &RIGHT_MENU)
        .unwrap();

    // Always-on leaves: every key press flashes the activity LED, and a
    // long-held cancel winds the whole panel down
    let activity_pad = ACTIVITY_PAD.init(Leaf::dpad((), flash(), flash(), flash(), flash()));
    ROOT_CHAIN.register(activity_pad, Priority::Normal).unwrap();

    let panel_keys = PANEL_KEYS.init(Leaf::ok_cancel(
        coordinator,
        ButtonHooks::pressed(|_: &&FocusCoordinator| LED_ACTIVITY.signal(())),
        ButtonHooks {
            on_pressed: Some(|_: &&FocusCoordinator| LED_ACTIVITY.signal(())),
            on_released: None,
            on_held: Some(|coordinator: &&FocusCoordinator| {
                info!("cancel held: requesting shutdown");
                coordinator.request_shutdown();
            }),
        },
    ));
    ROOT_CHAIN.register(panel_keys, Priority::Normal).unwrap();

    // One delivery task per bound key
    for binding in HUB.bindings() {
        match take_pin(&mut panel_pins, binding.pin) {
            Some(pin) => spawner.spawn(tasks::button_task(pin, binding, &HUB)).unwrap(),
            None => warn!(
                "{} bound to GPIO {} which this board does not expose",
                binding.name.as_str(),
                binding.pin
            ),
        }
    }

    // Indicator LEDs
    if let Some(led) = config.leds.activity {
        match take_pin(&mut panel_pins, led) {
            Some(pin) => spawner.spawn(tasks::activity_led_task(pin)).unwrap(),
            None => warn!("activity LED on unexposed GPIO {}", led),
        }
    }
    if let Some(led) = config.leds.heartbeat {
        match take_pin(&mut panel_pins, led) {
            Some(pin) => spawner.spawn(tasks::heartbeat_led_task(pin)).unwrap(),
            None => warn!("heartbeat LED on unexposed GPIO {}", led),
        }
    }

    info!("Front panel up, entering run loop");

    // Blocks until a shutdown request (long-held cancel), then winds down
    // the hub, chain, and panels exactly once
    match coordinator.start().await {
        Ok(()) => info!("Front panel stopped"),
        Err(e) => {
            error!("Front panel setup failed: {:?}", e);
            coordinator.shutdown().await;
        }
    }
    channels::SHUTDOWN_DONE.signal(());

    // Nothing left to coordinate; park the main task
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Bring up one SSD1306 panel and blank it
fn init_oled<I2C>(i2c: I2C, addr: u8) -> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new_custom_address(i2c, addr);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

/// Hooks for one always-on activity key
fn flash() -> ButtonHooks<()> {
    ButtonHooks::pressed(|_: &()| LED_ACTIVITY.signal(()))
}

/// Claim a GPIO from the board's exposed set
fn take_pin(table: &mut [(u8, Option<AnyPin>)], pin: u8) -> Option<AnyPin> {
    table
        .iter_mut()
        .find(|(wired, slot)| *wired == pin && slot.is_some())
        .and_then(|(_, slot)| slot.take())
}
