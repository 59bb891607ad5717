//! Font theme
//!
//! Maps the core's font slots to concrete monospace fonts. The title font
//! must fit the 16 px title band the menu layout reserves.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_6X13_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;

use diptych_core::ui::FontKind;

pub fn font(kind: FontKind) -> &'static MonoFont<'static> {
    match kind {
        FontKind::Title => &FONT_6X13_BOLD,
        FontKind::Body => &FONT_6X10,
    }
}

pub fn line_height(kind: FontKind) -> u32 {
    font(kind).character_size.height
}

pub fn style(kind: FontKind, color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font(kind))
        .text_color(color)
        .build()
}
