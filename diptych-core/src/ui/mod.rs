//! Window contract and drawing collaborators
//!
//! Windows are stateful UI units that are also controllers. Rendering goes
//! through two narrow seams: a [`Screen`] renders whole windows and reports
//! pixel geometry, and a [`Surface`] offers the primitive operations a
//! window may use inside [`Window::draw`]. Hardware implementations live in
//! the display crate.

pub mod menu;

pub use menu::{MenuError, MenuWindow, MAX_LABEL_LEN, MAX_MENU_ITEMS};

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_graphics::geometry::{Point, Size};

use crate::controller::Controller;
use crate::focus::{RefreshQueue, ScreenId};

/// Pixel fill for the monochrome panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fill {
    On,
    Off,
}

/// Font slots a surface implementation maps to real fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontKind {
    Title,
    #[default]
    Body,
}

/// Drawing failures surfaced by screens and surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawError {
    /// Communication with the panel failed
    Comm,
    /// Coordinates or dimensions outside the drawable area
    OutOfBounds,
    /// Panel not initialized
    NotReady,
}

/// Primitive drawing operations available inside [`Window::draw`]
///
/// Text origins are the top-left corner of the glyph box.
pub trait Surface {
    fn size(&self) -> Size;

    /// Select the font used by subsequent `text` calls
    fn set_font(&mut self, font: FontKind);

    /// Pixel height of a text line in the current font
    fn line_height(&self) -> u32;

    fn text(&mut self, origin: Point, text: &str, fill: Fill) -> Result<(), DrawError>;

    fn rect(
        &mut self,
        top_left: Point,
        size: Size,
        fill: Fill,
        outline: Option<Fill>,
    ) -> Result<(), DrawError>;
}

/// Renders windows onto one physical panel
///
/// Drawing is synchronous from the caller's perspective and is only invoked
/// from the render path, never from event delivery.
pub trait Screen {
    fn draw_window(&mut self, window: &dyn Window) -> Result<(), DrawError>;

    fn clear(&mut self) -> Result<(), DrawError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}

/// A stateful UI unit that is also a controller
pub trait Window: Controller {
    /// Bind to a refresh queue slot; called by the coordinator on
    /// assignment
    fn attach(&self, refresh: &'static RefreshQueue, screen: ScreenId);

    /// The window became the focused input target
    fn on_focused(&self);

    /// The window stopped being the focused input target
    fn on_unfocused(&self);

    /// Pure render of the current state into the supplied surface; no side
    /// effects on window state
    fn draw(&self, surface: &mut dyn Surface) -> Result<(), DrawError>;

    /// Queue a redraw request; a no-op when not attached to a screen
    fn refresh(&self);
}

struct AttachState {
    slot: Option<(&'static RefreshQueue, ScreenId)>,
    focused: bool,
}

/// Shared attach/focus bookkeeping for window implementations
pub struct WindowCore {
    state: Mutex<CriticalSectionRawMutex, RefCell<AttachState>>,
}

impl WindowCore {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(AttachState {
                slot: None,
                focused: false,
            })),
        }
    }

    pub fn attach(&self, refresh: &'static RefreshQueue, screen: ScreenId) {
        self.state.lock(|state| {
            state.borrow_mut().slot = Some((refresh, screen));
        });
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.lock(|state| {
            state.borrow_mut().focused = focused;
        });
    }

    pub fn is_focused(&self) -> bool {
        self.state.lock(|state| state.borrow().focused)
    }

    pub fn screen(&self) -> Option<ScreenId> {
        self.state.lock(|state| state.borrow().slot.map(|(_, id)| id))
    }

    /// Queue a redraw of the attached screen; silently does nothing when
    /// unattached
    pub fn request_refresh(&self) {
        let slot = self.state.lock(|state| state.borrow().slot);
        if let Some((refresh, id)) = slot {
            refresh.request(id);
        }
    }
}

impl Default for WindowCore {
    fn default() -> Self {
        Self::new()
    }
}
