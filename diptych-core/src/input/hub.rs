//! Keypad registry and event fan-in
//!
//! One hub instance owns the pin→name map for the shared keypad and forwards
//! every event to exactly one root dispatch sink. The hub is explicitly
//! constructed and handed to a single coordinator; there is no process-wide
//! registry.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use heapless::Vec;

use crate::controller::Controller;

use super::{ButtonAction, ButtonEvent, ButtonName, PinId, PIN_MAX};

/// Maximum number of physical key bindings
pub const MAX_BINDINGS: usize = 8;

/// Setup-time registration failures
///
/// These indicate a static wiring mistake, are raised synchronously during
/// construction, and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingError {
    /// The pin is already bound to a button
    DuplicatePin(PinId),
    /// The logical name is already claimed by another pin
    DuplicateBinding(ButtonName),
    /// The pin number is outside the usable GPIO range
    InvalidPin(PinId),
    /// Exceeded the fixed binding capacity
    TooManyBindings,
}

/// One pin→name binding with its debounce/hold parameters
///
/// Created once per pin at setup and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonBinding {
    pub pin: PinId,
    pub name: ButtonName,
    /// Input is active-low with an internal pull-up
    pub pull_up: bool,
    /// Debounce window in milliseconds
    pub bounce_ms: u16,
    /// Emit `Held` after the button stays down this long; `None` disables
    /// hold detection
    pub hold_ms: Option<u16>,
    /// Repeat `Held` at the hold interval while the button stays down
    pub hold_repeat: bool,
}

impl ButtonBinding {
    pub const fn new(pin: PinId, name: ButtonName) -> Self {
        Self {
            pin,
            name,
            pull_up: true,
            bounce_ms: crate::config::DEFAULT_BOUNCE_MS,
            hold_ms: None,
            hold_repeat: false,
        }
    }
}

struct HubState {
    bindings: Vec<ButtonBinding, MAX_BINDINGS>,
    sink: Option<&'static dyn Controller>,
    shut_down: bool,
}

/// Keypad registry mapping pins to logical buttons
///
/// Bindings are permanent for the process lifetime; there is no
/// unregistration short of [`shutdown`](InputHub::shutdown), matching the
/// fixed keypad model.
pub struct InputHub {
    state: Mutex<CriticalSectionRawMutex, RefCell<HubState>>,
}

impl InputHub {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(HubState {
                bindings: Vec::new(),
                sink: None,
                shut_down: false,
            })),
        }
    }

    /// Bind a pin to a logical button
    ///
    /// Fails if the pin is out of range, already bound, or the name is
    /// already claimed by another pin.
    pub fn register(&self, binding: ButtonBinding) -> Result<(), BindingError> {
        if binding.pin > PIN_MAX {
            return Err(BindingError::InvalidPin(binding.pin));
        }
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.bindings.iter().any(|b| b.pin == binding.pin) {
                return Err(BindingError::DuplicatePin(binding.pin));
            }
            if state.bindings.iter().any(|b| b.name == binding.name) {
                return Err(BindingError::DuplicateBinding(binding.name));
            }
            state
                .bindings
                .push(binding)
                .map_err(|_| BindingError::TooManyBindings)
        })
    }

    /// Install the single root dispatch target, detaching any previous one
    pub fn set_sink(&self, sink: &'static dyn Controller) {
        self.state.lock(|state| {
            state.borrow_mut().sink = Some(sink);
        });
    }

    /// Deliver one hardware transition
    ///
    /// Builds a [`ButtonEvent`] for the bound pin and hands it to the sink on
    /// the calling context. Transitions on unbound pins, events after
    /// shutdown, and events with no sink installed are dropped silently.
    pub fn dispatch(&self, pin: PinId, action: ButtonAction, at: Instant) {
        let target = self.state.lock(|state| {
            let state = state.borrow();
            if state.shut_down {
                return None;
            }
            let name = state.bindings.iter().find(|b| b.pin == pin)?.name;
            state.sink.map(|sink| (sink, name))
        });
        // The sink runs outside the registry lock so handlers may re-enter
        // the hub or mutate chain membership.
        if let Some((sink, name)) = target {
            sink.handle(ButtonEvent {
                pin,
                name,
                action,
                timestamp: at,
            });
        }
    }

    /// Look up the binding for a pin
    pub fn binding(&self, pin: PinId) -> Option<ButtonBinding> {
        self.state
            .lock(|state| state.borrow().bindings.iter().find(|b| b.pin == pin).copied())
    }

    /// Copy out all current bindings (for the hardware layer to spawn
    /// per-pin delivery)
    pub fn bindings(&self) -> Vec<ButtonBinding, MAX_BINDINGS> {
        self.state.lock(|state| state.borrow().bindings.clone())
    }

    /// Release all bindings and detach the sink
    ///
    /// Idempotent; safe to call from a different context than delivery. Any
    /// event arriving after shutdown begins is dropped.
    pub fn shutdown(&self) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            state.bindings.clear();
            state.sink = None;
            state.shut_down = true;
        });
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock(|state| state.borrow().shut_down)
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}
