//! Focus coordination across the two panels
//!
//! The coordinator owns both screens and their window slots, tracks which
//! window holds navigation focus, and keeps the root chain membership in
//! step: exactly the focused window's controller (plus permanently
//! registered globals) is reachable from the chain. The coordinator is
//! itself the permanently registered screen-switch controller, broadcast
//! first so left/right always reach it regardless of focus.

use core::cell::RefCell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::config::KeypadConfig;
use crate::controller::{ChainFull, Controller, ControllerChain, Priority};
use crate::input::{BindingError, ButtonAction, ButtonEvent, ButtonName, InputHub};
use crate::ui::{DrawError, Screen, Window};

/// The two panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenId {
    Left,
    Right,
}

impl ScreenId {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Pending redraw capacity; requests beyond this are dropped because a full
/// queue already guarantees a redraw of every panel
pub const REFRESH_QUEUE_DEPTH: usize = 4;

/// Queued redraw requests
///
/// Windows request redraws from the event-delivery context; the render loop
/// drains the queue and does the actual drawing, keeping event handling
/// bounded in time.
pub struct RefreshQueue {
    requests: Channel<CriticalSectionRawMutex, ScreenId, REFRESH_QUEUE_DEPTH>,
}

impl RefreshQueue {
    pub const fn new() -> Self {
        Self {
            requests: Channel::new(),
        }
    }

    /// Queue a redraw; never blocks
    pub fn request(&self, id: ScreenId) {
        let _ = self.requests.try_send(id);
    }

    /// Wait for the next redraw request
    pub async fn next(&self) -> ScreenId {
        self.requests.receive().await
    }

    /// Non-blocking poll, used by tests and by shutdown draining
    pub fn try_next(&self) -> Option<ScreenId> {
        self.requests.try_receive().ok()
    }
}

impl Default for RefreshQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Failures during coordinator installation and initial draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    Binding(BindingError),
    Chain(ChainFull),
    Draw(DrawError),
}

impl From<BindingError> for SetupError {
    fn from(e: BindingError) -> Self {
        Self::Binding(e)
    }
}

impl From<ChainFull> for SetupError {
    fn from(e: ChainFull) -> Self {
        Self::Chain(e)
    }
}

impl From<DrawError> for SetupError {
    fn from(e: DrawError) -> Self {
        Self::Draw(e)
    }
}

struct FocusState {
    focused: Option<ScreenId>,
    installed: bool,
    shut_down: bool,
}

/// Windows join the chain through their controller capability
fn as_controller(window: &'static dyn Window) -> &'static dyn Controller {
    window
}

/// Exclusive handle to one panel; the panel itself lives in a static owned
/// by whoever built it
pub type PanelRef = &'static mut (dyn Screen + Send);

/// Owns the two screens, their windows, and the focus state machine
///
/// States are `Unfocused` and `FocusedOn(screen)`; the only mutating
/// transition is [`focus`](Self::focus), which swaps chain membership in a
/// single step so a concurrently arriving event is delivered to either the
/// fully-old or fully-new configuration, never a partial one.
pub struct FocusCoordinator {
    hub: &'static InputHub,
    chain: &'static ControllerChain,
    refresh: &'static RefreshQueue,
    keypad: KeypadConfig,
    screens: [Mutex<CriticalSectionRawMutex, PanelRef>; 2],
    windows: BlockingMutex<CriticalSectionRawMutex, RefCell<[Option<&'static dyn Window>; 2]>>,
    state: BlockingMutex<CriticalSectionRawMutex, RefCell<FocusState>>,
    stop: Signal<CriticalSectionRawMutex, ()>,
}

impl FocusCoordinator {
    pub fn new(
        hub: &'static InputHub,
        chain: &'static ControllerChain,
        refresh: &'static RefreshQueue,
        keypad: KeypadConfig,
        left: PanelRef,
        right: PanelRef,
    ) -> Self {
        Self {
            hub,
            chain,
            refresh,
            keypad,
            screens: [Mutex::new(left), Mutex::new(right)],
            windows: BlockingMutex::new(RefCell::new([None, None])),
            state: BlockingMutex::new(RefCell::new(FocusState {
                focused: None,
                installed: false,
                shut_down: false,
            })),
            stop: Signal::new(),
        }
    }

    /// Register the keypad with the hub, install the chain as the hub sink,
    /// and put this coordinator at the front of the chain
    ///
    /// Idempotent. Registration failures are fatal; nothing is retried.
    pub fn install(&'static self) -> Result<(), SetupError> {
        let already = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            core::mem::replace(&mut state.installed, true)
        });
        if already {
            return Ok(());
        }
        for binding in self.keypad.bindings() {
            self.hub.register(binding)?;
        }
        self.hub.set_sink(self.chain);
        self.chain.register(self, Priority::Front)?;
        Ok(())
    }

    /// Bind a window to a screen slot
    ///
    /// If no screen is focused yet this also focuses the slot's screen. A
    /// window assigned to the currently focused screen replaces the previous
    /// one in the chain immediately.
    pub fn assign_window(
        &self,
        id: ScreenId,
        window: &'static dyn Window,
    ) -> Result<(), ChainFull> {
        window.attach(self.refresh, id);
        let previous = self.windows.lock(|windows| {
            windows.borrow_mut()[id.index()].replace(window)
        });
        match self.focused() {
            Some(focused) if focused == id => {
                self.chain
                    .replace(previous.map(as_controller), Some(as_controller(window)))?;
                if let Some(previous) = previous {
                    previous.on_unfocused();
                }
                window.on_focused();
                window.refresh();
                Ok(())
            }
            Some(_) => Ok(()),
            None => self.focus(id),
        }
    }

    /// Move focus to a screen
    ///
    /// Focusing the already-focused screen is a no-op: chain membership is
    /// untouched and no refresh is issued. Otherwise the old window leaves
    /// the chain and the new one enters it in one step, lifecycle hooks run
    /// in unfocus→focus order, and the newly focused window is refreshed.
    pub fn focus(&self, id: ScreenId) -> Result<(), ChainFull> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.shut_down || state.focused == Some(id) {
                return Ok(());
            }
            let windows = self.windows.lock(|windows| *windows.borrow());
            let old = state.focused.and_then(|f| windows[f.index()]);
            let new = windows[id.index()];
            self.chain
                .replace(old.map(as_controller), new.map(as_controller))?;
            if let Some(old) = old {
                old.on_unfocused();
            }
            state.focused = Some(id);
            if let Some(new) = new {
                new.on_focused();
                new.refresh();
            }
            Ok(())
        })
    }

    pub fn focused(&self) -> Option<ScreenId> {
        self.state.lock(|state| state.borrow().focused)
    }

    pub fn window(&self, id: ScreenId) -> Option<&'static dyn Window> {
        self.windows.lock(|windows| windows.borrow()[id.index()])
    }

    /// Draw one panel: its assigned window, or blank when the slot is empty
    pub async fn render(&self, id: ScreenId) -> Result<(), DrawError> {
        let window = self.window(id);
        let mut screen = self.screens[id.index()].lock().await;
        match window {
            Some(window) => screen.draw_window(window),
            None => screen.clear(),
        }
    }

    /// Install, draw both panels, then block until a shutdown request
    ///
    /// On cancellation [`shutdown`](Self::shutdown) runs exactly once before
    /// returning. Redraw requests arriving while blocked are rendered here,
    /// never on the event-delivery context.
    pub async fn start(&'static self) -> Result<(), SetupError> {
        self.install()?;
        for id in ScreenId::ALL {
            self.render(id).await?;
        }
        loop {
            match select(self.refresh.next(), self.stop.wait()).await {
                // A panel glitch must not take input handling down with it
                Either::First(id) => {
                    let _ = self.render(id).await;
                }
                Either::Second(()) => break,
            }
        }
        self.shutdown().await;
        Ok(())
    }

    /// Ask a blocked [`start`](Self::start) to wind down
    pub fn request_shutdown(&self) {
        self.stop.signal(());
    }

    /// Release chain membership and keypad bindings and blank both panels
    ///
    /// Idempotent; safe to call after a failed start. Events arriving after
    /// shutdown begins are dropped by the hub.
    pub async fn shutdown(&self) {
        let first = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.shut_down {
                None
            } else {
                state.shut_down = true;
                Some(state.focused.take())
            }
        });
        let Some(focused) = first else {
            return;
        };
        if let Some(window) = focused.and_then(|id| self.window(id)) {
            window.on_unfocused();
        }
        self.hub.shutdown();
        self.chain.clear();
        self.clear_screens().await;
    }

    async fn clear_screens(&self) {
        for screen in &self.screens {
            let _ = screen.lock().await.clear();
        }
    }
}

impl Controller for FocusCoordinator {
    /// The global screen-switch controller: left/right presses move focus,
    /// everything else is ignored here and handled by whoever is focused
    fn handle(&self, event: ButtonEvent) {
        if event.action != ButtonAction::Pressed {
            return;
        }
        match event.name {
            ButtonName::Left => {
                let _ = self.focus(ScreenId::Left);
            }
            ButtonName::Right => {
                let _ = self.focus(ScreenId::Right);
            }
            _ => {}
        }
    }
}
