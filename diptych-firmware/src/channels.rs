//! Inter-task signals
//!
//! Defines the static signals used for communication between Embassy tasks.
//! The dispatch chain and refresh queue live in diptych-core; only the
//! indicator plumbing is firmware-local.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Flashed by the global activity leaves on every accepted key press
pub static LED_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Raised once after the coordinator has wound down; stops the heartbeat
pub static SHUTDOWN_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
