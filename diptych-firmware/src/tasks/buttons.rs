//! GPIO button delivery
//!
//! One task per bound key (active-low with internal pull-up on the stock
//! panel). Each task waits for an edge, debounces it, and feeds the
//! transition into the hub, which owns the pin→name resolution. Hold
//! detection runs between press and release: after `hold_ms` a `Held`
//! event fires, repeating at the hold interval when the binding asks for
//! repeat.

use defmt::*;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_time::{with_timeout, Duration, Instant, Timer};

use diptych_core::input::{ButtonAction, ButtonBinding, InputHub};

/// Run one key's delivery loop
#[embassy_executor::task(pool_size = 6)]
pub async fn button_task(pin: AnyPin, binding: ButtonBinding, hub: &'static InputHub) {
    let pull = if binding.pull_up { Pull::Up } else { Pull::Down };
    let mut input = Input::new(pin, pull);
    let bounce = Duration::from_millis(binding.bounce_ms as u64);

    info!(
        "button task up: {} on GPIO {}",
        binding.name.as_str(),
        binding.pin
    );

    loop {
        wait_pressed_edge(&mut input, binding.pull_up).await;

        // Debounce: wait and re-check
        Timer::after(bounce).await;
        if !is_pressed(&input, binding.pull_up) {
            continue;
        }

        debug!("{} pressed", binding.name.as_str());
        hub.dispatch(binding.pin, ButtonAction::Pressed, Instant::now());

        match binding.hold_ms {
            Some(hold_ms) => {
                let hold = Duration::from_millis(hold_ms as u64);
                loop {
                    match with_timeout(hold, wait_released_edge(&mut input, binding.pull_up)).await
                    {
                        Ok(()) => break,
                        Err(_) => {
                            debug!("{} held", binding.name.as_str());
                            hub.dispatch(binding.pin, ButtonAction::Held, Instant::now());
                            if !binding.hold_repeat {
                                wait_released_edge(&mut input, binding.pull_up).await;
                                break;
                            }
                        }
                    }
                }
            }
            None => wait_released_edge(&mut input, binding.pull_up).await,
        }

        // Debounce the release edge before rearming
        Timer::after(bounce).await;
        hub.dispatch(binding.pin, ButtonAction::Released, Instant::now());
    }
}

fn is_pressed(input: &Input<'static>, pull_up: bool) -> bool {
    if pull_up {
        input.is_low()
    } else {
        input.is_high()
    }
}

async fn wait_pressed_edge(input: &mut Input<'static>, pull_up: bool) {
    if pull_up {
        input.wait_for_falling_edge().await
    } else {
        input.wait_for_rising_edge().await
    }
}

async fn wait_released_edge(input: &mut Input<'static>, pull_up: bool) {
    if pull_up {
        input.wait_for_rising_edge().await
    } else {
        input.wait_for_falling_edge().await
    }
}
