//! Shared test doubles: recording controllers, fake panels, and a fake
//! drawing surface.

extern crate std;

use core::cell::RefCell;
use std::boxed::Box;
use std::string::{String, ToString};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use embedded_graphics::geometry::{Point, Size};

use crate::controller::Controller;
use crate::focus::{RefreshQueue, ScreenId};
use crate::input::{ButtonAction, ButtonEvent, ButtonName};
use crate::ui::{DrawError, Fill, FontKind, Screen, Surface, Window, WindowCore};

/// Tests hand out `'static` references the same way the firmware does with
/// `StaticCell`, just heap-backed.
pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

pub fn leak_mut<T>(value: T) -> &'static mut T {
    Box::leak(Box::new(value))
}

pub fn event(name: ButtonName, action: ButtonAction) -> ButtonEvent {
    ButtonEvent {
        pin: 0,
        name,
        action,
        timestamp: Instant::from_ticks(0),
    }
}

/// Cross-controller delivery order log
pub struct SharedLog {
    entries: Mutex<CriticalSectionRawMutex, RefCell<Vec<u8>>>,
}

impl SharedLog {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn push(&self, id: u8) {
        self.entries.lock(|entries| entries.borrow_mut().push(id));
    }

    pub fn entries(&self) -> Vec<u8> {
        self.entries.lock(|entries| entries.borrow().clone())
    }
}

/// Controller that records every event it sees
pub struct Recorder {
    id: u8,
    log: Option<&'static SharedLog>,
    events: Mutex<CriticalSectionRawMutex, RefCell<Vec<ButtonEvent>>>,
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            id: 0,
            log: None,
            events: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub const fn with_log(id: u8, log: &'static SharedLog) -> Self {
        Self {
            id,
            log: Some(log),
            events: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<ButtonEvent> {
        self.events.lock(|events| events.borrow().clone())
    }
}

impl Controller for Recorder {
    fn handle(&self, event: ButtonEvent) {
        self.events.lock(|events| events.borrow_mut().push(event));
        if let Some(log) = self.log {
            log.push(self.id);
        }
    }
}

/// Draw/clear counters shared with a [`TestScreen`] that the coordinator
/// has taken ownership of
pub struct ScreenStats {
    pub draws: AtomicUsize,
    pub clears: AtomicUsize,
}

impl ScreenStats {
    pub const fn new() -> Self {
        Self {
            draws: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }
}

/// Fake panel counting renders
pub struct TestScreen {
    stats: &'static ScreenStats,
}

impl TestScreen {
    pub fn new(stats: &'static ScreenStats) -> Self {
        Self { stats }
    }
}

impl Screen for TestScreen {
    fn draw_window(&mut self, _window: &dyn Window) -> Result<(), DrawError> {
        self.stats.draws.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DrawError> {
        self.stats.clears.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn width(&self) -> u32 {
        128
    }

    fn height(&self) -> u32 {
        64
    }
}

/// Minimal window counting deliveries and focus transitions
pub struct TestWindow {
    core: WindowCore,
    hits: AtomicUsize,
    focused: AtomicUsize,
    unfocused: AtomicUsize,
}

impl TestWindow {
    pub const fn new() -> Self {
        Self {
            core: WindowCore::new(),
            hits: AtomicUsize::new(0),
            focused: AtomicUsize::new(0),
            unfocused: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn focused_count(&self) -> usize {
        self.focused.load(Ordering::Relaxed)
    }

    pub fn unfocused_count(&self) -> usize {
        self.unfocused.load(Ordering::Relaxed)
    }
}

impl Controller for TestWindow {
    fn handle(&self, _event: ButtonEvent) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
}

impl Window for TestWindow {
    fn attach(&self, refresh: &'static RefreshQueue, screen: ScreenId) {
        self.core.attach(refresh, screen);
    }

    fn on_focused(&self) {
        self.focused.fetch_add(1, Ordering::Relaxed);
        self.core.set_focused(true);
    }

    fn on_unfocused(&self) {
        self.unfocused.fetch_add(1, Ordering::Relaxed);
        self.core.set_focused(false);
    }

    fn draw(&self, _surface: &mut dyn Surface) -> Result<(), DrawError> {
        Ok(())
    }

    fn refresh(&self) {
        self.core.request_refresh();
    }
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Font(FontKind),
    Text {
        x: i32,
        y: i32,
        text: String,
        fill: Fill,
    },
    Rect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        fill: Fill,
    },
}

/// Fake 128x64 surface recording the operations issued against it
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    font: FontKind,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font: FontKind::Body,
        }
    }

    /// Line height this fake reports for the body font
    pub fn body_line_height(&self) -> u32 {
        10
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }

    fn set_font(&mut self, font: FontKind) {
        self.font = font;
        self.ops.push(SurfaceOp::Font(font));
    }

    fn line_height(&self) -> u32 {
        match self.font {
            FontKind::Title => 12,
            FontKind::Body => 10,
        }
    }

    fn text(&mut self, origin: Point, text: &str, fill: Fill) -> Result<(), DrawError> {
        self.ops.push(SurfaceOp::Text {
            x: origin.x,
            y: origin.y,
            text: text.to_string(),
            fill,
        });
        Ok(())
    }

    fn rect(
        &mut self,
        top_left: Point,
        size: Size,
        fill: Fill,
        _outline: Option<Fill>,
    ) -> Result<(), DrawError> {
        self.ops.push(SurfaceOp::Rect {
            x: top_left.x,
            y: top_left.y,
            w: size.width,
            h: size.height,
            fill,
        });
        Ok(())
    }
}
