// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint properties and the scoped paint bracket.

use alloc::borrow::Cow;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::context::DrawContext;
use crate::defaults;

/// A color understood by the host, such as a CSS color string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(Cow<'static, str>);

impl Color {
    /// A color from a static name or literal, e.g. `"red"` or `"#C20F00"`.
    pub const fn named(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// A color from any string.
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// The color's textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Weight of a font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// `normal`
    #[default]
    Normal,
    /// `bold`
    Bold,
    /// `lighter`
    Lighter,
    /// `bolder`
    Bolder,
    /// A numeric weight, e.g. `600`.
    Numeric(u16),
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Bold => f.write_str("bold"),
            Self::Lighter => f.write_str("lighter"),
            Self::Bolder => f.write_str("bolder"),
            Self::Numeric(w) => write!(f, "{w}"),
        }
    }
}

/// A font: family, pixel size, and weight.
///
/// `Display` renders the CSS shorthand, e.g. `bold 24px sans-serif`.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name.
    pub family: Cow<'static, str>,
    /// Size in pixels.
    pub size: f64,
    /// Weight.
    pub weight: FontWeight,
}

impl Font {
    /// A normal-weight font.
    pub fn new(family: impl Into<Cow<'static, str>>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Normal,
        }
    }

    /// Replace the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: Cow::Borrowed(defaults::FONT_FAMILY),
            size: defaults::FONT_SIZE,
            weight: defaults::FONT_WEIGHT,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px {}", self.weight, self.size, self.family)
    }
}

/// How new paint is combined with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variants mirror the canvas operation names")]
pub enum CompositeOp {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Difference,
    Exclusion,
}

impl CompositeOp {
    /// The canvas name of this operation, e.g. `source-atop`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceIn => "source-in",
            Self::SourceOut => "source-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationOver => "destination-over",
            Self::DestinationIn => "destination-in",
            Self::DestinationOut => "destination-out",
            Self::DestinationAtop => "destination-atop",
            Self::Lighter => "lighter",
            Self::Copy => "copy",
            Self::Xor => "xor",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }
}

/// Drawing-context state a node declares for its own paint.
///
/// Unspecified fields take the values in [`defaults`](crate::defaults).
#[derive(Clone, Debug, PartialEq)]
pub struct PaintProps {
    /// Stroke color.
    pub stroke: Color,
    /// Fill color.
    pub fill: Color,
    /// Stroke width.
    pub line_width: f64,
    /// Font for text primitives.
    pub font: Font,
    /// Composite operation.
    pub composite: CompositeOp,
}

impl Default for PaintProps {
    fn default() -> Self {
        Self {
            stroke: defaults::STROKE,
            fill: defaults::FILL,
            line_width: defaults::LINE_WIDTH,
            font: Font::default(),
            composite: defaults::COMPOSITE,
        }
    }
}

impl PaintProps {
    /// Write every property into `ctx`.
    pub fn apply(&self, ctx: &mut dyn DrawContext) {
        ctx.set_stroke_color(&self.stroke);
        ctx.set_fill_color(&self.fill);
        ctx.set_line_width(self.line_width);
        ctx.set_composite(self.composite);
        ctx.set_font(&self.font);
    }
}

/// Saves the context, applies paint properties, and restores on drop.
///
/// The restore runs on every exit path, so a render step that bails out
/// early cannot leak its style into siblings.
pub struct PaintScope<'a> {
    ctx: &'a mut dyn DrawContext,
}

impl<'a> PaintScope<'a> {
    /// Open a scope over `ctx` with `props` applied.
    pub fn open(ctx: &'a mut dyn DrawContext, props: &PaintProps) -> Self {
        ctx.save();
        props.apply(ctx);
        Self { ctx }
    }
}

impl<'a> Deref for PaintScope<'a> {
    type Target = dyn DrawContext + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for PaintScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for PaintScope<'_> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

impl fmt::Debug for PaintScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintScope").finish_non_exhaustive()
    }
}
