//! Window surface over an embedded-graphics draw target

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use diptych_core::ui::{DrawError, Fill, FontKind, Surface};

use crate::theme;

fn color(fill: Fill) -> BinaryColor {
    match fill {
        Fill::On => BinaryColor::On,
        Fill::Off => BinaryColor::Off,
    }
}

/// Adapts any monochrome draw target to the window surface contract
///
/// Text origins are interpreted as the top-left corner of the glyph box.
pub struct GraphicsSurface<'a, D> {
    target: &'a mut D,
    font: FontKind,
}

impl<'a, D> GraphicsSurface<'a, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            font: FontKind::default(),
        }
    }
}

impl<D> Surface for GraphicsSurface<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    fn set_font(&mut self, font: FontKind) {
        self.font = font;
    }

    fn line_height(&self) -> u32 {
        theme::line_height(self.font)
    }

    fn text(&mut self, origin: Point, text: &str, fill: Fill) -> Result<(), DrawError> {
        Text::with_baseline(
            text,
            origin,
            theme::style(self.font, color(fill)),
            Baseline::Top,
        )
        .draw(self.target)
        .map(|_| ())
        .map_err(|_| DrawError::Comm)
    }

    fn rect(
        &mut self,
        top_left: Point,
        size: Size,
        fill: Fill,
        outline: Option<Fill>,
    ) -> Result<(), DrawError> {
        let style = match outline {
            Some(outline) => PrimitiveStyleBuilder::new()
                .fill_color(color(fill))
                .stroke_color(color(outline))
                .stroke_width(1)
                .build(),
            None => PrimitiveStyle::with_fill(color(fill)),
        };
        Rectangle::new(top_left, size)
            .into_styled(style)
            .draw(self.target)
            .map_err(|_| DrawError::Comm)
    }
}
