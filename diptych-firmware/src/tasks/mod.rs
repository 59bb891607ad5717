//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod indicator;

pub use buttons::button_task;
pub use indicator::{activity_led_task, heartbeat_led_task};
