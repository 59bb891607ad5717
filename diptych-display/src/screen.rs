//! Screen adapter over buffered draw targets
//!
//! A window renders into the target's RAM buffer through the surface seam;
//! the buffer is pushed to the panel in one flush afterwards, so nothing on
//! the render path holds the bus for longer than a single frame transfer.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::Ssd1306;

use diptych_core::ui::{DrawError, Screen, Window};

use crate::surface::GraphicsSurface;

/// Buffered monochrome target that can push its buffer to the panel
pub trait FlushTarget: DrawTarget<Color = BinaryColor> {
    fn flush_buffer(&mut self) -> Result<(), DrawError>;
}

/// One panel: a buffered target rendered through the surface adapter
pub struct GraphicsScreen<D> {
    target: D,
}

impl<D: FlushTarget> GraphicsScreen<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }
}

impl<D: FlushTarget> Screen for GraphicsScreen<D> {
    fn draw_window(&mut self, window: &dyn Window) -> Result<(), DrawError> {
        self.target
            .clear(BinaryColor::Off)
            .map_err(|_| DrawError::Comm)?;
        let mut surface = GraphicsSurface::new(&mut self.target);
        window.draw(&mut surface)?;
        self.target.flush_buffer()
    }

    fn clear(&mut self) -> Result<(), DrawError> {
        self.target
            .clear(BinaryColor::Off)
            .map_err(|_| DrawError::Comm)?;
        self.target.flush_buffer()
    }

    fn width(&self) -> u32 {
        self.target.bounding_box().size.width
    }

    fn height(&self) -> u32 {
        self.target.bounding_box().size.height
    }
}

/// The SSD1306 driver in buffered graphics mode is the firmware's flush
/// target
impl<DI, SIZE> FlushTarget for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    fn flush_buffer(&mut self) -> Result<(), DrawError> {
        self.flush().map_err(|_| DrawError::Comm)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::geometry::{Point, Size};
    use embedded_graphics::Pixel;

    use diptych_core::controller::Controller;
    use diptych_core::input::{ButtonAction, ButtonEvent, ButtonName};
    use diptych_core::ui::{Fill, FontKind, MenuWindow, Surface};

    use super::*;

    const W: usize = 128;
    const H: usize = 64;

    /// In-memory 128x64 panel
    struct Frame {
        pixels: [[bool; W]; H],
        flushes: usize,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                pixels: [[false; W]; H],
                flushes: 0,
            }
        }

        fn lit(&self) -> usize {
            self.pixels
                .iter()
                .map(|row| row.iter().filter(|p| **p).count())
                .sum()
        }

        fn is_lit(&self, x: usize, y: usize) -> bool {
            self.pixels[y][x]
        }

        fn lit_in_rows(&self, rows: core::ops::Range<usize>) -> usize {
            self.pixels[rows]
                .iter()
                .map(|row| row.iter().filter(|p| **p).count())
                .sum()
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new(W as u32, H as u32)
        }
    }

    impl DrawTarget for Frame {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<BinaryColor>>,
        {
            for Pixel(point, color) in pixels {
                if (0..W as i32).contains(&point.x) && (0..H as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl FlushTarget for Frame {
        fn flush_buffer(&mut self) -> Result<(), DrawError> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn sample_menu() -> MenuWindow {
        let menu = MenuWindow::new("Main Menu");
        menu.add_item("System Info", None).unwrap();
        menu.add_item("Options", None).unwrap();
        menu.add_item("Reboot", None).unwrap();
        menu
    }

    #[test]
    fn test_draw_window_renders_and_flushes() {
        let menu = sample_menu();
        let mut screen = GraphicsScreen::new(Frame::new());

        screen.draw_window(&menu).unwrap();

        assert_eq!(screen.target.flushes, 1);
        // Title band and list area both carry pixels
        assert!(screen.target.lit_in_rows(0..16) > 0);
        assert!(screen.target.lit_in_rows(16..64) > 0);
        // The selected first row is a filled highlight bar: its left edge is
        // lit where no glyph is drawn
        assert!(screen.target.is_lit(0, 17));
        assert!(screen.target.is_lit(127, 17));
    }

    #[test]
    fn test_clear_blanks_panel() {
        let menu = sample_menu();
        let mut screen = GraphicsScreen::new(Frame::new());

        screen.draw_window(&menu).unwrap();
        screen.clear().unwrap();

        assert_eq!(screen.target.lit(), 0);
        assert_eq!(screen.target.flushes, 2);
    }

    #[test]
    fn test_redraw_replaces_previous_content() {
        let menu = sample_menu();
        let mut screen = GraphicsScreen::new(Frame::new());
        screen.draw_window(&menu).unwrap();
        let first = screen.target.pixels;

        // Selection moves: the highlight bar must move with it, not stack
        menu.handle(ButtonEvent {
            pin: 0,
            name: ButtonName::Down,
            action: ButtonAction::Pressed,
            timestamp: embassy_time::Instant::from_ticks(0),
        });
        screen.draw_window(&menu).unwrap();

        assert_ne!(first, screen.target.pixels);
        assert!(!screen.target.is_lit(0, 17));
        assert!(screen.target.is_lit(0, 29));
    }

    #[test]
    fn test_surface_reports_geometry() {
        let mut frame = Frame::new();
        let mut surface = GraphicsSurface::new(&mut frame);

        assert_eq!(surface.size(), Size::new(128, 64));
        surface.set_font(FontKind::Body);
        assert_eq!(surface.line_height(), 10);
        surface.set_font(FontKind::Title);
        assert_eq!(surface.line_height(), 13);
    }

    #[test]
    fn test_surface_rect_fill_and_outline() {
        let mut frame = Frame::new();
        let mut surface = GraphicsSurface::new(&mut frame);

        surface
            .rect(Point::new(10, 10), Size::new(4, 4), Fill::On, None)
            .unwrap();
        assert!(frame.is_lit(10, 10));
        assert!(frame.is_lit(13, 13));

        let mut frame = Frame::new();
        let mut surface = GraphicsSurface::new(&mut frame);
        surface
            .rect(Point::new(0, 0), Size::new(8, 8), Fill::Off, Some(Fill::On))
            .unwrap();
        assert!(frame.is_lit(0, 0));
        assert!(!frame.is_lit(4, 4));
    }

    #[test]
    fn test_surface_text_draws_from_top_left() {
        let mut frame = Frame::new();
        let mut surface = GraphicsSurface::new(&mut frame);
        surface.set_font(FontKind::Body);

        surface.text(Point::new(0, 20), "X", Fill::On).unwrap();

        assert_eq!(frame.lit_in_rows(0..20), 0);
        assert!(frame.lit_in_rows(20..30) > 0);
        assert_eq!(frame.lit_in_rows(30..64), 0);
    }
}
