//! Indicator LEDs
//!
//! The activity LED flashes on every accepted key press, fed by the global
//! activity leaves on the dispatch chain. The heartbeat LED blinks while
//! the front panel is up and goes dark once shutdown completes.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_time::{Duration, Ticker, Timer};

use crate::channels::{LED_ACTIVITY, SHUTDOWN_DONE};

/// Flash duration for one accepted input event
const FLASH_MS: u64 = 30;

/// Heartbeat half-period
const HEARTBEAT_MS: u64 = 1000;

/// Activity LED task - one short flash per accepted key press
#[embassy_executor::task]
pub async fn activity_led_task(pin: AnyPin) {
    info!("Activity LED task started");

    let mut led = Output::new(pin, Level::Low);
    loop {
        LED_ACTIVITY.wait().await;
        led.set_high();
        Timer::after(Duration::from_millis(FLASH_MS)).await;
        led.set_low();
    }
}

/// Heartbeat LED task - slow blink until shutdown completes
#[embassy_executor::task]
pub async fn heartbeat_led_task(pin: AnyPin) {
    info!("Heartbeat LED task started");

    let mut led = Output::new(pin, Level::High);
    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_MS));
    loop {
        match select(ticker.next(), SHUTDOWN_DONE.wait()).await {
            Either::First(()) => led.toggle(),
            Either::Second(()) => break,
        }
    }
    led.set_low();
    info!("Heartbeat LED released");
}
