//! Ordered broadcast chain
//!
//! The chain holds non-owning handles; controllers are owned by whoever
//! constructs them. Every member receives every event (broadcast, not
//! stop-on-first-handled), so independent subsystems can observe the same
//! keypad.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::input::ButtonEvent;

use super::Controller;

/// Maximum chain members
pub const MAX_CONTROLLERS: usize = 8;

/// The chain is at capacity; registration is a setup-time operation, so this
/// is fatal to setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChainFull;

/// Where a new member lands in the broadcast order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    /// Appended after existing members
    #[default]
    Normal,
    /// Prepended before existing members
    Front,
}

type Members = Vec<&'static dyn Controller, MAX_CONTROLLERS>;

/// Ordered, mutable broadcast list of dispatch targets
///
/// Membership may be mutated while a broadcast from another context is in
/// flight: every broadcast acts on the snapshot taken when it begins, so an
/// in-progress delivery never observes a half-updated list and the next
/// event reflects the new membership.
pub struct ControllerChain {
    members: Mutex<CriticalSectionRawMutex, RefCell<Members>>,
}

/// Identity comparison on the data pointer only; vtable pointers for one
/// object can differ between codegen units.
fn same(a: &dyn Controller, b: &dyn Controller) -> bool {
    core::ptr::eq(
        a as *const dyn Controller as *const (),
        b as *const dyn Controller as *const (),
    )
}

impl ControllerChain {
    pub const fn new() -> Self {
        Self {
            members: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Add a member at the back (`Normal`) or front (`Front`)
    pub fn register(
        &self,
        controller: &'static dyn Controller,
        priority: Priority,
    ) -> Result<(), ChainFull> {
        self.members.lock(|members| {
            let mut members = members.borrow_mut();
            match priority {
                Priority::Normal => members.push(controller).map_err(|_| ChainFull),
                Priority::Front => members.insert(0, controller).map_err(|_| ChainFull),
            }
        })
    }

    /// Remove all occurrences of a controller; absent controllers are a no-op
    pub fn unregister(&self, controller: &dyn Controller) {
        self.members.lock(|members| {
            members.borrow_mut().retain(|m| !same(*m, controller));
        });
    }

    /// Swap one member for another in a single step
    ///
    /// A broadcast beginning concurrently observes either both or neither
    /// change, which is what focus transitions rely on.
    pub fn replace(
        &self,
        old: Option<&dyn Controller>,
        new: Option<&'static dyn Controller>,
    ) -> Result<(), ChainFull> {
        self.members.lock(|members| {
            let mut members = members.borrow_mut();
            if let Some(old) = old {
                members.retain(|m| !same(*m, old));
            }
            if let Some(new) = new {
                members.push(new).map_err(|_| ChainFull)?;
            }
            Ok(())
        })
    }

    /// Remove every member
    pub fn clear(&self) {
        self.members.lock(|members| members.borrow_mut().clear());
    }

    pub fn contains(&self, controller: &dyn Controller) -> bool {
        self.members
            .lock(|members| members.borrow().iter().any(|m| same(*m, controller)))
    }

    pub fn len(&self) -> usize {
        self.members.lock(|members| members.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Members {
        self.members.lock(|members| members.borrow().clone())
    }
}

impl Default for ControllerChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ControllerChain {
    /// Broadcast to every member registered at the time the broadcast
    /// begins, in list order
    fn handle(&self, event: ButtonEvent) {
        // Members run outside the lock: a handler may unregister itself or
        // others without corrupting this delivery.
        for member in self.snapshot() {
            member.handle(event);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::input::{ButtonAction, ButtonName};
    use crate::testing::{event, leak, Recorder, SharedLog};

    /// Unregisters a target from the chain when handling any event
    struct SelfRemover {
        chain: &'static ControllerChain,
        log: &'static SharedLog,
        id: u8,
    }

    impl Controller for SelfRemover {
        fn handle(&self, _event: ButtonEvent) {
            self.log.push(self.id);
            self.chain.unregister(self);
        }
    }

    fn press() -> ButtonEvent {
        event(ButtonName::Ok, ButtonAction::Pressed)
    }

    #[test]
    fn test_broadcast_reaches_all_members_in_order() {
        let chain = ControllerChain::new();
        let log = leak(SharedLog::new());
        let a = leak(Recorder::with_log(1, log));
        let b = leak(Recorder::with_log(2, log));
        let c = leak(Recorder::with_log(3, log));

        chain.register(a, Priority::Normal).unwrap();
        chain.register(b, Priority::Normal).unwrap();
        chain.register(c, Priority::Normal).unwrap();

        chain.handle(press());

        assert_eq!(log.entries(), [1, 2, 3]);
        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
        assert_eq!(c.events().len(), 1);
    }

    #[test]
    fn test_front_priority_prepends() {
        let chain = ControllerChain::new();
        let log = leak(SharedLog::new());
        let back = leak(Recorder::with_log(1, log));
        let front = leak(Recorder::with_log(2, log));

        chain.register(back, Priority::Normal).unwrap();
        chain.register(front, Priority::Front).unwrap();

        chain.handle(press());
        assert_eq!(log.entries(), [2, 1]);
    }

    #[test]
    fn test_self_unregister_does_not_disturb_in_flight_broadcast() {
        let chain = leak(ControllerChain::new());
        let log = leak(SharedLog::new());
        let first = leak(Recorder::with_log(1, log));
        let remover = leak(SelfRemover {
            chain,
            log,
            id: 2,
        });
        let last = leak(Recorder::with_log(3, log));

        chain.register(first, Priority::Normal).unwrap();
        chain.register(remover, Priority::Normal).unwrap();
        chain.register(last, Priority::Normal).unwrap();

        // The remover drops out mid-broadcast; the member after it still
        // sees this event exactly once.
        chain.handle(press());
        assert_eq!(log.entries(), [1, 2, 3]);

        // The next event reflects the updated membership.
        chain.handle(press());
        assert_eq!(log.entries(), [1, 2, 3, 1, 3]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let chain = ControllerChain::new();
        let member = leak(Recorder::new());
        let stranger = leak(Recorder::new());

        chain.register(member, Priority::Normal).unwrap();
        chain.unregister(stranger);

        assert_eq!(chain.len(), 1);
        assert!(chain.contains(member));
    }

    #[test]
    fn test_unregister_removes_all_occurrences() {
        let chain = ControllerChain::new();
        let member = leak(Recorder::new());

        chain.register(member, Priority::Normal).unwrap();
        chain.register(member, Priority::Front).unwrap();
        assert_eq!(chain.len(), 2);

        chain.unregister(member);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_replace_is_single_step() {
        let chain = ControllerChain::new();
        let old = leak(Recorder::new());
        let new = leak(Recorder::new());

        chain.register(old, Priority::Normal).unwrap();
        chain.replace(Some(old), Some(new)).unwrap();

        assert!(!chain.contains(old));
        assert!(chain.contains(new));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_chains_nest() {
        let inner = leak(ControllerChain::new());
        let outer = ControllerChain::new();
        let leaf = leak(Recorder::new());

        inner.register(leaf, Priority::Normal).unwrap();
        outer.register(inner, Priority::Normal).unwrap();

        outer.handle(press());
        assert_eq!(leaf.events().len(), 1);
    }

    #[test]
    fn test_register_past_capacity_fails() {
        let chain = ControllerChain::new();
        for _ in 0..MAX_CONTROLLERS {
            chain
                .register(leak(Recorder::new()), Priority::Normal)
                .unwrap();
        }
        assert_eq!(
            chain.register(leak(Recorder::new()), Priority::Normal),
            Err(ChainFull)
        );
    }
}
