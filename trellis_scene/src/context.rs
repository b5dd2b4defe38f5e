// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host drawing surface, plus a recording implementation for headless use.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Arc, Point, Rect, Size};

use crate::paint::{Color, CompositeOp, Font};

/// Vertical anchor of text relative to the point it is drawn at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variants mirror the canvas baseline names")]
pub enum TextBaseline {
    Top,
    Hanging,
    #[default]
    Middle,
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    /// The canvas name of this baseline.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "bottom",
        }
    }
}

/// Horizontal anchor of text relative to the point it is drawn at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variants mirror the canvas alignment names")]
pub enum TextAlign {
    Left,
    Right,
    #[default]
    Center,
    Start,
    End,
}

impl TextAlign {
    /// The canvas name of this alignment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Measures the advance width of strings.
pub trait TextMeasure {
    /// Width of `text` when drawn with `font`.
    fn measure_text(&self, text: &str, font: &Font) -> f64;
}

/// A 2D drawing surface with a stateful paint context.
///
/// The method set follows the HTML canvas 2D context. `save`/`restore` push
/// and pop the paint state (colors, line width, font, composite, text
/// settings); everything else draws immediately.
pub trait DrawContext: TextMeasure {
    /// Surface size in pixels.
    fn surface_size(&self) -> Size;
    /// Resize the surface. Hosts may reset paint state as a side effect.
    fn set_surface_size(&mut self, size: Size);

    /// Push the paint state.
    fn save(&mut self);
    /// Pop the paint state.
    fn restore(&mut self);

    /// Set the stroke color.
    fn set_stroke_color(&mut self, color: &Color);
    /// Set the fill color.
    fn set_fill_color(&mut self, color: &Color);
    /// Set the stroke width.
    fn set_line_width(&mut self, width: f64);
    /// Set the font used by text primitives.
    fn set_font(&mut self, font: &Font);
    /// Set the composite operation.
    fn set_composite(&mut self, op: CompositeOp);
    /// Set the text baseline.
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    /// Set the text alignment.
    fn set_text_align(&mut self, align: TextAlign);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect);
    /// Stroke a rectangle.
    fn stroke_rect(&mut self, rect: Rect);
    /// Fill an arc, closed through its chord.
    fn fill_arc(&mut self, arc: &Arc);
    /// Stroke an arc.
    fn stroke_arc(&mut self, arc: &Arc);
    /// Fill text anchored at `at`.
    fn fill_text(&mut self, text: &str, at: Point);
    /// Stroke text anchored at `at`.
    fn stroke_text(&mut self, text: &str, at: Point);
    /// Reset a region to transparent.
    fn clear_rect(&mut self, rect: Rect);
}

/// A drawing call captured by [`RecordingContext`].
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "each variant mirrors one DrawContext method")]
pub enum DrawOp {
    Resize(Size),
    Save,
    Restore,
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    Font(Font),
    Composite(CompositeOp),
    TextBaseline(TextBaseline),
    TextAlign(TextAlign),
    FillRect(Rect),
    StrokeRect(Rect),
    FillArc(Arc),
    StrokeArc(Arc),
    FillText(String, Point),
    StrokeText(String, Point),
    ClearRect(Rect),
}

/// A [`DrawContext`] that records every call instead of drawing.
///
/// Text is measured with a fixed advance of `advance × font size` per
/// character, which is enough for layout in tests and headless demos.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    size: Size,
    advance: f64,
    ops: Vec<DrawOp>,
}

impl RecordingContext {
    /// Fixed per-character advance, as a fraction of the font size.
    pub const DEFAULT_ADVANCE: f64 = 0.5;

    /// Create a recorder for a surface of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            advance: Self::DEFAULT_ADVANCE,
            ops: Vec::new(),
        }
    }

    /// Replace the per-character advance used by [`TextMeasure`].
    #[must_use]
    pub fn with_advance(mut self, advance: f64) -> Self {
        self.advance = advance;
        self
    }

    /// Calls recorded so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn save_depth(&self) -> isize {
        self.ops.iter().fold(0, |depth, op| match op {
            DrawOp::Save => depth + 1,
            DrawOp::Restore => depth - 1,
            _ => depth,
        })
    }
}

impl TextMeasure for RecordingContext {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size * self.advance
    }
}

impl DrawContext for RecordingContext {
    fn surface_size(&self) -> Size {
        self.size
    }

    fn set_surface_size(&mut self, size: Size) {
        self.size = size;
        self.ops.push(DrawOp::Resize(size));
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ops.push(DrawOp::StrokeColor(color.clone()));
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ops.push(DrawOp::FillColor(color.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_font(&mut self, font: &Font) {
        self.ops.push(DrawOp::Font(font.clone()));
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.ops.push(DrawOp::Composite(op));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(DrawOp::TextBaseline(baseline));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(DrawOp::TextAlign(align));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::StrokeRect(rect));
    }

    fn fill_arc(&mut self, arc: &Arc) {
        self.ops.push(DrawOp::FillArc(*arc));
    }

    fn stroke_arc(&mut self, arc: &Arc) {
        self.ops.push(DrawOp::StrokeArc(*arc));
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        self.ops.push(DrawOp::FillText(text.into(), at));
    }

    fn stroke_text(&mut self, text: &str, at: Point) {
        self.ops.push(DrawOp::StrokeText(text.into(), at));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClearRect(rect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_fixed_advance() {
        let ctx = RecordingContext::new(Size::new(1.0, 1.0)).with_advance(0.25);
        let width = ctx.measure_text("four", &Font::new("mono", 20.0));
        assert_eq!(width, 20.0);
    }

    #[test]
    fn take_ops_drains_the_log() {
        let mut ctx = RecordingContext::new(Size::new(1.0, 1.0));
        ctx.save();
        ctx.clear_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(ctx.save_depth(), 1);
        let ops = ctx.take_ops();
        assert_eq!(ops.len(), 2);
        assert!(ctx.ops().is_empty(), "log is empty after take");
    }
}
