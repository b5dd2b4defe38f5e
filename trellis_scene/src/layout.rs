// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box alignment: placing a fixed-size footprint inside an outer region.
//!
//! Each axis is solved independently by the same function: the footprint is
//! placed flush with the start edge, centered, or flush with the end edge of
//! the outer region. That placement (the *anchor*) yields two results:
//!
//! - the content region, `anchor + padding` with the footprint's size minus
//!   twice the padding, handed to children as their outer region;
//! - the rendering position, which is the anchor itself for [`Anchor::Box`]
//!   and the footprint's center for [`Anchor::Text`].
//!
//! Both are then translated by the node's offset.

use kurbo::{Point, Rect, Size, Vec2};

use crate::error::ConfigurationError;
use crate::types::{Anchor, HorizontalAlign, NodeOptions, VerticalAlign};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Start,
    Center,
    End,
}

impl From<VerticalAlign> for Align {
    fn from(value: VerticalAlign) -> Self {
        match value {
            VerticalAlign::Top => Self::Start,
            VerticalAlign::Middle => Self::Center,
            VerticalAlign::Bottom => Self::End,
        }
    }
}

impl From<HorizontalAlign> for Align {
    fn from(value: HorizontalAlign) -> Self {
        match value {
            HorizontalAlign::Left => Self::Start,
            HorizontalAlign::Center => Self::Center,
            HorizontalAlign::Right => Self::End,
        }
    }
}

/// Place a footprint of length `own` inside `[start, start + extent]`.
///
/// Returns the padded content start and the un-padded anchor.
fn align_axis(start: f64, extent: f64, own: f64, padding: f64, align: Align) -> (f64, f64) {
    let anchor = match align {
        Align::Start => start,
        Align::Center => start + (extent - own) / 2.0,
        Align::End => start + (extent - own),
    };
    (anchor + padding, anchor)
}

impl Anchor {
    fn adjust(self, anchor: f64, own: f64) -> f64 {
        match self {
            Self::Box => anchor,
            Self::Text => anchor + own / 2.0,
        }
    }
}

/// Geometry of a bounded node.
///
/// The size is fixed at construction. [`Layout::set_bounds`] recomputes the
/// content region and rendering position together, so the two always
/// describe the same outer region.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    size: Size,
    offset: Vec2,
    padding: f64,
    vertical: VerticalAlign,
    horizontal: HorizontalAlign,
    anchor: Anchor,
    inner_bounds: Rect,
    rendering_position: Point,
}

impl Layout {
    /// Build a layout from construction options.
    pub fn new(options: &NodeOptions) -> Result<Self, ConfigurationError> {
        let width = options.width.ok_or(ConfigurationError::MissingWidth)?;
        let height = options.height.ok_or(ConfigurationError::MissingHeight)?;
        let valid = |d: f64| d.is_finite() && d >= 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigurationError::InvalidDimension { width, height });
        }
        Ok(Self {
            size: Size::new(width, height),
            offset: options.offset,
            padding: options.padding,
            vertical: options.vertical,
            horizontal: options.horizontal,
            anchor: Anchor::Box,
            inner_bounds: Rect::ZERO,
            rendering_position: Point::ZERO,
        })
    }

    /// A top-left aligned layout of `size`, as used by scene roots.
    pub(crate) fn fixed(size: Size, padding: f64) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            padding,
            vertical: VerticalAlign::Top,
            horizontal: HorizontalAlign::Left,
            anchor: Anchor::Box,
            inner_bounds: Rect::ZERO,
            rendering_position: Point::ZERO,
        }
    }

    /// Replace the anchor variant.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Recompute the content region and rendering position against `outer`.
    pub fn set_bounds(&mut self, outer: Rect) {
        let (x, anchor_x) = align_axis(
            outer.x0,
            outer.width(),
            self.size.width,
            self.padding,
            self.horizontal.into(),
        );
        let (y, anchor_y) = align_axis(
            outer.y0,
            outer.height(),
            self.size.height,
            self.padding,
            self.vertical.into(),
        );
        let w = self.size.width - self.padding * 2.0;
        let h = self.size.height - self.padding * 2.0;

        self.inner_bounds = Rect::new(x, y, x + w, y + h) + self.offset;
        self.rendering_position = Point::new(
            self.anchor.adjust(anchor_x, self.size.width),
            self.anchor.adjust(anchor_y, self.size.height),
        ) + self.offset;
    }

    /// Region available to children, as of the last [`set_bounds`](Self::set_bounds).
    pub fn inner_bounds(&self) -> Rect {
        self.inner_bounds
    }

    /// Point paint primitives should be anchored at.
    pub fn rendering_position(&self) -> Point {
        self.rendering_position
    }

    /// The footprint size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The footprint rectangle at the rendering position, for box anchors.
    ///
    /// For text anchors this is the footprint centered on the rendering
    /// position.
    pub fn footprint(&self) -> Rect {
        let origin = match self.anchor {
            Anchor::Box => self.rendering_position,
            Anchor::Text => self.rendering_position - self.size.to_vec2() / 2.0,
        };
        Rect::from_origin_size(origin, self.size)
    }

    /// Translation applied after alignment.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Replace the offset; takes effect at the next bounds computation.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Inset between footprint and content region.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Vertical alignment.
    pub fn vertical(&self) -> VerticalAlign {
        self.vertical
    }

    /// Horizontal alignment.
    pub fn horizontal(&self) -> HorizontalAlign {
        self.horizontal
    }

    /// Replace both alignments; takes effect at the next bounds computation.
    pub fn set_alignment(&mut self, vertical: VerticalAlign, horizontal: HorizontalAlign) {
        self.vertical = vertical;
        self.horizontal = horizontal;
    }

    /// The anchor variant.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}
