// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global defaults used wherever an option is left unspecified.

use crate::context::{TextAlign, TextBaseline};
use crate::paint::{Color, CompositeOp, FontWeight};
use crate::types::{HorizontalAlign, VerticalAlign};

/// Padding of bounded nodes and scenes.
pub const PADDING: f64 = 0.0;
/// Vertical alignment of bounded nodes.
pub const VERTICAL_ALIGN: VerticalAlign = VerticalAlign::Top;
/// Horizontal alignment of bounded nodes.
pub const HORIZONTAL_ALIGN: HorizontalAlign = HorizontalAlign::Left;

/// Font size in pixels.
pub const FONT_SIZE: f64 = 50.0;
/// Font family.
pub const FONT_FAMILY: &str = "sans-serif";
/// Font weight.
pub const FONT_WEIGHT: FontWeight = FontWeight::Normal;

/// Stroke line width.
pub const LINE_WIDTH: f64 = 2.0;
/// Stroke color.
pub const STROKE: Color = Color::named("red");
/// Fill color.
pub const FILL: Color = Color::named("black");
/// Composite operation.
pub const COMPOSITE: CompositeOp = CompositeOp::SourceOver;

/// Text baseline installed on a scene's context.
pub const TEXT_BASELINE: TextBaseline = TextBaseline::Middle;
/// Text alignment installed on a scene's context.
pub const TEXT_ALIGN: TextAlign = TextAlign::Center;

/// Radius of the default pointer circle.
pub const POINTER_RADIUS: f64 = 10.0;
