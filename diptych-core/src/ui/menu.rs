//! Menu window
//!
//! A titled list of labelled items with one highlighted selection. Up/down
//! move the selection without wrapping, ok runs the selected item's action,
//! cancel is forwarded to an externally owned hook (the navigation history
//! lives outside this crate).

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_graphics::geometry::{Point, Size};
use heapless::{String, Vec};

use crate::controller::Controller;
use crate::focus::{RefreshQueue, ScreenId};
use crate::input::{ButtonAction, ButtonEvent, ButtonName};

use super::{DrawError, Fill, FontKind, Surface, Window, WindowCore};

/// Maximum entries per menu
pub const MAX_MENU_ITEMS: usize = 16;

/// Maximum label length (one 128 px row of the body font)
pub const MAX_LABEL_LEN: usize = 21;

/// Vertical band reserved for the title row
const TITLE_BAND: i32 = 16;
const PAD_LEFT: i32 = 2;
const PAD_TOP: i32 = 1;
const PAD_BOTTOM: i32 = 1;

/// Invoked when the item under the cursor is activated
pub type ItemAction = fn();

/// Menu mutation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// Exceeded the fixed item capacity
    TooManyItems,
    /// Insertion index beyond the current item count
    BadIndex,
}

#[derive(Clone)]
struct MenuItem {
    label: String<MAX_LABEL_LEN>,
    action: Option<ItemAction>,
}

impl MenuItem {
    fn new(label: &str, action: Option<ItemAction>) -> Self {
        let mut item = Self {
            label: String::new(),
            action,
        };
        // Truncate to the row width
        let _ = item
            .label
            .push_str(&label[..label.len().min(MAX_LABEL_LEN)]);
        item
    }
}

struct MenuState {
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
    position: usize,
    cancel_hook: Option<fn()>,
}

/// A menu bound to one panel
pub struct MenuWindow {
    title: &'static str,
    core: WindowCore,
    state: Mutex<CriticalSectionRawMutex, RefCell<MenuState>>,
}

impl MenuWindow {
    pub const fn new(title: &'static str) -> Self {
        Self {
            title,
            core: WindowCore::new(),
            state: Mutex::new(RefCell::new(MenuState {
                items: Vec::new(),
                position: 0,
                cancel_hook: None,
            })),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Append an item; the current selection is unaffected
    pub fn add_item(&self, label: &str, action: Option<ItemAction>) -> Result<(), MenuError> {
        self.state.lock(|state| {
            state
                .borrow_mut()
                .items
                .push(MenuItem::new(label, action))
                .map_err(|_| MenuError::TooManyItems)
        })
    }

    /// Insert an item at an index; the current selection is unaffected
    pub fn insert_item(
        &self,
        index: usize,
        label: &str,
        action: Option<ItemAction>,
    ) -> Result<(), MenuError> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if index > state.items.len() {
                return Err(MenuError::BadIndex);
            }
            state
                .items
                .insert(index, MenuItem::new(label, action))
                .map_err(|_| MenuError::TooManyItems)
        })
    }

    /// Point the cancel button at the externally owned back-navigation
    pub fn set_cancel_hook(&self, hook: fn()) {
        self.state.lock(|state| {
            state.borrow_mut().cancel_hook = Some(hook);
        });
    }

    pub fn position(&self) -> usize {
        self.state.lock(|state| state.borrow().position)
    }

    pub fn len(&self) -> usize {
        self.state.lock(|state| state.borrow().items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the selection, clamped to the item range; refreshes only when
    /// the position actually moved
    fn step(&self, delta: i8) {
        let changed = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.items.is_empty() {
                return false;
            }
            let last = state.items.len() - 1;
            let next = if delta < 0 {
                state.position.saturating_sub(1)
            } else {
                (state.position + 1).min(last)
            };
            if next == state.position {
                false
            } else {
                state.position = next;
                true
            }
        });
        if changed {
            self.refresh();
        }
    }

    /// Run the action of the selected item, if it has one
    fn activate(&self) {
        let action = self.state.lock(|state| {
            let state = state.borrow();
            state.items.get(state.position).and_then(|item| item.action)
        });
        // Run outside the state lock so actions may mutate the menu
        if let Some(action) = action {
            action();
        }
    }

    fn cancel(&self) {
        let hook = self.state.lock(|state| state.borrow().cancel_hook);
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl Controller for MenuWindow {
    fn handle(&self, event: ButtonEvent) {
        match (event.name, event.action) {
            // A held vertical button repeats the step: hold-to-scroll
            (
                ButtonName::Up | ButtonName::Down,
                ButtonAction::Pressed | ButtonAction::Held,
            ) => self.step(event.name.vertical_delta()),
            (ButtonName::Ok, ButtonAction::Pressed) => self.activate(),
            (ButtonName::Cancel, ButtonAction::Pressed) => self.cancel(),
            _ => {}
        }
    }
}

impl Window for MenuWindow {
    fn attach(&self, refresh: &'static RefreshQueue, screen: ScreenId) {
        self.core.attach(refresh, screen);
    }

    fn on_focused(&self) {
        self.core.set_focused(true);
    }

    fn on_unfocused(&self) {
        self.core.set_focused(false);
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        let (items, position) = self.state.lock(|state| {
            let state = state.borrow();
            (state.items.clone(), state.position)
        });

        surface.set_font(FontKind::Title);
        surface.text(Point::new(PAD_LEFT, 0), self.title, Fill::On)?;

        surface.set_font(FontKind::Body);
        let width = surface.size().width;
        let height = surface.size().height as i32;
        let item_h = surface.line_height() as i32 + PAD_TOP + PAD_BOTTOM;
        let visible = (((height - TITLE_BAND) / item_h).max(1)) as usize;

        // Scroll so the selection stays on the panel
        let first = if position >= visible {
            position + 1 - visible
        } else {
            0
        };

        let mut top = TITLE_BAND;
        for (i, item) in items.iter().enumerate().skip(first).take(visible) {
            if i == position {
                surface.rect(
                    Point::new(0, top),
                    Size::new(width, item_h as u32),
                    Fill::On,
                    None,
                )?;
                surface.text(Point::new(PAD_LEFT, top + PAD_TOP), &item.label, Fill::Off)?;
            } else {
                surface.text(Point::new(PAD_LEFT, top + PAD_TOP), &item.label, Fill::On)?;
            }
            top += item_h;
        }
        Ok(())
    }

    fn refresh(&self) {
        self.core.request_refresh();
    }
}
