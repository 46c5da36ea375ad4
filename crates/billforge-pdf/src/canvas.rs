//! Drawing primitives for one page.
//!
//! A thin layer over `pdf_writer::Content` that speaks in the renderer's
//! terms: aligned text in a given weight, filled and stroked boxes, the logo.
//! Coordinates are PDF points with the origin at the bottom-left corner.

use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontSet, FontWeight, TextMeasure};
use crate::theme::Color;

pub(crate) const REGULAR_FONT: Name<'static> = Name(b"F1");
pub(crate) const BOLD_FONT: Name<'static> = Name(b"F2");
pub(crate) const WATERMARK_STATE: Name<'static> = Name(b"Gs1");

/// Horizontal anchor for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge.
    Left,
    /// `x` is the centre.
    Center,
    /// `x` is the right edge.
    Right,
}

pub(crate) struct PageCanvas<'a> {
    content: Content,
    fonts: &'a FontSet,
}

impl<'a> PageCanvas<'a> {
    pub fn new(fonts: &'a FontSet) -> Self {
        PageCanvas {
            content: Content::new(),
            fonts,
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    pub fn text_width(&self, text: &str, weight: FontWeight, size: f32) -> f32 {
        self.fonts.face(weight).text_width(text, size)
    }

    /// Draws one line of text with its baseline at `baseline`.
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        baseline: f32,
        align: Align,
        weight: FontWeight,
        size: f32,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }
        let width = self.text_width(text, weight, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let font_name = match weight {
            FontWeight::Regular => REGULAR_FONT,
            FontWeight::Bold => BOLD_FONT,
        };
        let encoded = self.fonts.face(weight).encode(text);

        self.content.set_fill_rgb(color.r, color.g, color.b);
        self.content.begin_text();
        self.content.set_font(font_name, size);
        self.content.next_line(left, baseline);
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.content.set_fill_rgb(color.r, color.g, color.b);
        self.content.rect(x, y, width, height);
        self.content.fill_nonzero();
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line: f32, color: Color) {
        self.content.set_line_width(line);
        self.content.set_stroke_rgb(color.r, color.g, color.b);
        self.content.rect(x, y, width, height);
        self.content.stroke();
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), line: f32, color: Color) {
        self.content.set_line_width(line);
        self.content.set_stroke_rgb(color.r, color.g, color.b);
        self.content.move_to(from.0, from.1);
        self.content.line_to(to.0, to.1);
        self.content.stroke();
    }

    /// Paints an image XObject into the box whose bottom-left is `(x, y)`.
    pub fn image(&mut self, name: Name<'_>, x: f32, y: f32, width: f32, height: f32) {
        self.content.save_state();
        self.content.transform([width, 0.0, 0.0, height, x, y]);
        self.content.x_object(name);
        self.content.restore_state();
    }

    /// Paints an image under a graphics state that sets its opacity.
    #[allow(clippy::too_many_arguments)]
    pub fn translucent_image(
        &mut self,
        state: Name<'_>,
        name: Name<'_>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.content.save_state();
        self.content.set_parameters(state);
        self.image(name, x, y, width, height);
        self.content.restore_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lands_in_content_stream() {
        let fonts = FontSet::builtin();
        let mut canvas = PageCanvas::new(&fonts);
        canvas.text(
            "Sub Total",
            100.0,
            700.0,
            Align::Right,
            FontWeight::Bold,
            10.0,
            Color::white(),
        );
        let bytes = canvas.finish();
        let stream = String::from_utf8_lossy(&bytes);
        assert!(stream.contains("(Sub Total) Tj"));
        assert!(stream.contains("/F2 10 Tf"));
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let fonts = FontSet::builtin();
        let mut canvas = PageCanvas::new(&fonts);
        canvas.text("", 0.0, 0.0, Align::Left, FontWeight::Regular, 10.0, Color::white());
        assert!(canvas.finish().is_empty());
    }
}
