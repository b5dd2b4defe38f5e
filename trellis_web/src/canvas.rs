// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`DrawContext`] over the HTML canvas 2D API.

use alloc::string::ToString;
use core::fmt;

use kurbo::{Arc, Point, Rect, Size};
use trellis_scene::{
    Color, CompositeOp, DrawContext, Font, TextAlign, TextBaseline, TextMeasure,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Errors from binding a canvas element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasError {
    /// `getContext("2d")` threw or returned `null`.
    ContextUnavailable,
    /// The returned object was not a `CanvasRenderingContext2d`.
    WrongContextType,
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextUnavailable => f.write_str("canvas has no 2d context"),
            Self::WrongContextType => f.write_str("2d context has an unexpected type"),
        }
    }
}

impl core::error::Error for CanvasError {}

/// A canvas element and its 2D rendering context.
pub struct CanvasContext {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasContext {
    /// Bind the 2D context of `canvas`.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(CanvasError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::WrongContextType)?;
        Ok(Self { canvas, ctx })
    }

    /// The bound canvas element.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// The raw 2D context, for drawing the trait does not cover.
    pub fn raw(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn arc_path(&self, arc: &Arc) {
        self.ctx.begin_path();
        let result = self.ctx.ellipse_with_anticlockwise(
            arc.center.x,
            arc.center.y,
            arc.radii.x,
            arc.radii.y,
            arc.x_rotation,
            arc.start_angle,
            arc.start_angle + arc.sweep_angle,
            arc.sweep_angle < 0.0,
        );
        ignore("ellipse", result);
    }
}

impl fmt::Debug for CanvasContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasContext")
            .field("size", &self.surface_size())
            .finish_non_exhaustive()
    }
}

/// The canvas API reports bad arguments by throwing; a bad call draws nothing.
fn ignore(call: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("canvas {call} failed: {err:?}");
    }
}

impl TextMeasure for CanvasContext {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        self.ctx.save();
        self.ctx.set_font(&font.to_string());
        let width = self.ctx.measure_text(text).map_or(0.0, |m| m.width());
        self.ctx.restore();
        width
    }
}

impl DrawContext for CanvasContext {
    fn surface_size(&self) -> Size {
        Size::new(self.canvas.width().into(), self.canvas.height().into())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "canvas dimensions are whole pixels well inside u32"
    )]
    fn set_surface_size(&mut self, size: Size) {
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ctx.set_stroke_style_str(color.as_str());
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ctx.set_fill_style_str(color.as_str());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_font(&mut self, font: &Font) {
        self.ctx.set_font(&font.to_string());
    }

    fn set_composite(&mut self, op: CompositeOp) {
        ignore(
            "globalCompositeOperation",
            self.ctx.set_global_composite_operation(op.as_str()),
        );
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(baseline.as_str());
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_arc(&mut self, arc: &Arc) {
        self.arc_path(arc);
        self.ctx.fill();
    }

    fn stroke_arc(&mut self, arc: &Arc) {
        self.arc_path(arc);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        ignore("fillText", self.ctx.fill_text(text, at.x, at.y));
    }

    fn stroke_text(&mut self, text: &str, at: Point) {
        ignore("strokeText", self.ctx.stroke_text(text, at.x, at.y));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }
}
