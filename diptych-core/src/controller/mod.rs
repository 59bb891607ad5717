//! Controller capability and leaf handlers
//!
//! A controller reacts to keypad events; a chain is a controller that
//! contains controllers. Leaf behavior is supplied through small structs of
//! callback fields, not through subclass hierarchies.

pub mod chain;

pub use chain::{ChainFull, ControllerChain, Priority, MAX_CONTROLLERS};

use heapless::Vec;

use crate::input::{BindingError, ButtonAction, ButtonEvent, ButtonName};

/// Reacts to keypad events
///
/// `handle` is invoked on the delivery context and must not block: no I/O,
/// no synchronous redraw beyond queueing a refresh request.
pub trait Controller: Sync {
    fn handle(&self, event: ButtonEvent);
}

/// Hook set for one logical button
///
/// Unset hooks are no-ops. Hooks receive the leaf's context value, which is
/// how stateless function pointers reach shared state.
pub struct ButtonHooks<C> {
    pub on_pressed: Option<fn(&C)>,
    pub on_released: Option<fn(&C)>,
    pub on_held: Option<fn(&C)>,
}

impl<C> ButtonHooks<C> {
    /// All hooks unset
    pub const NONE: Self = Self {
        on_pressed: None,
        on_released: None,
        on_held: None,
    };

    /// Hook set reacting to the press edge only
    pub const fn pressed(hook: fn(&C)) -> Self {
        Self {
            on_pressed: Some(hook),
            on_released: None,
            on_held: None,
        }
    }

    fn for_action(&self, action: ButtonAction) -> Option<fn(&C)> {
        match action {
            ButtonAction::Pressed => self.on_pressed,
            ButtonAction::Released => self.on_released,
            ButtonAction::Held => self.on_held,
        }
    }
}

// Manual impls: `derive` would require `C: Clone`, but only fn pointers are
// copied here.
impl<C> Clone for ButtonHooks<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ButtonHooks<C> {}

/// Fixed-vocabulary leaf controller
///
/// Owns a local name→hooks map over a context value. Events naming a button
/// outside the map are ignored.
pub struct Leaf<C, const N: usize> {
    ctx: C,
    keys: Vec<(ButtonName, ButtonHooks<C>), N>,
}

impl<C, const N: usize> Leaf<C, N> {
    pub fn new(ctx: C) -> Self {
        Self {
            ctx,
            keys: Vec::new(),
        }
    }

    /// Add hooks for one button name
    ///
    /// Claiming a name twice within one leaf is a wiring mistake and fails.
    pub fn bind(&mut self, name: ButtonName, hooks: ButtonHooks<C>) -> Result<(), BindingError> {
        if self.keys.iter().any(|(n, _)| *n == name) {
            return Err(BindingError::DuplicateBinding(name));
        }
        self.keys
            .push((name, hooks))
            .map_err(|_| BindingError::TooManyBindings)
    }

    pub fn ctx(&self) -> &C {
        &self.ctx
    }
}

impl<C> Leaf<C, 4> {
    /// Four-direction pad leaf
    pub fn dpad(
        ctx: C,
        up: ButtonHooks<C>,
        down: ButtonHooks<C>,
        left: ButtonHooks<C>,
        right: ButtonHooks<C>,
    ) -> Self {
        let mut leaf = Self::new(ctx);
        // Distinct names into an empty map cannot collide
        let _ = leaf.bind(ButtonName::Up, up);
        let _ = leaf.bind(ButtonName::Down, down);
        let _ = leaf.bind(ButtonName::Left, left);
        let _ = leaf.bind(ButtonName::Right, right);
        leaf
    }
}

impl<C> Leaf<C, 2> {
    /// Ok/cancel pair leaf
    pub fn ok_cancel(ctx: C, ok: ButtonHooks<C>, cancel: ButtonHooks<C>) -> Self {
        let mut leaf = Self::new(ctx);
        let _ = leaf.bind(ButtonName::Ok, ok);
        let _ = leaf.bind(ButtonName::Cancel, cancel);
        leaf
    }
}

impl<C: Sync, const N: usize> Controller for Leaf<C, N> {
    fn handle(&self, event: ButtonEvent) {
        let Some((_, hooks)) = self.keys.iter().find(|(n, _)| *n == event.name) else {
            return;
        };
        if let Some(hook) = hooks.for_action(event.action) {
            hook(&self.ctx);
        }
    }
}
