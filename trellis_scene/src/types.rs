// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node flags, alignment, and construction options.

use kurbo::Vec2;

use crate::defaults;
use crate::paint::PaintProps;

bitflags::bitflags! {
    /// Node flags controlling participation in the frame phases.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (its render hook and its subtree are painted).
        const VISIBLE  = 0b0000_0001;
        /// Node is animated (its update hook runs each tick).
        ///
        /// Bounds and children are processed regardless of this flag.
        const ANIMATED = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ANIMATED
    }
}

/// Placement of a node along the vertical axis of its outer region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Flush with the top edge.
    #[default]
    Top,
    /// Centered.
    Middle,
    /// Flush with the bottom edge.
    Bottom,
}

/// Placement of a node along the horizontal axis of its outer region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Flush with the left edge.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush with the right edge.
    Right,
}

/// Where a node's rendering position sits relative to its aligned footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The top-left corner, where rectangle primitives start painting.
    #[default]
    Box,
    /// The center of the footprint, which is where text drawn with a
    /// `middle` baseline and `center` alignment is anchored.
    Text,
}

/// Construction options for bounded and composite nodes.
///
/// `width` and `height` are required; construction fails with
/// [`ConfigurationError`](crate::ConfigurationError) when either is missing.
#[derive(Clone, Debug)]
pub struct NodeOptions {
    /// Width of the node's footprint.
    pub width: Option<f64>,
    /// Height of the node's footprint.
    pub height: Option<f64>,
    /// Translation applied after alignment.
    pub offset: Vec2,
    /// Inset between the footprint and the content region.
    pub padding: f64,
    /// Vertical placement inside the outer region.
    pub vertical: VerticalAlign,
    /// Horizontal placement inside the outer region.
    pub horizontal: HorizontalAlign,
    /// Paint properties applied around the node's render hook.
    pub paint: Option<PaintProps>,
    /// Phase participation flags.
    pub flags: NodeFlags,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            offset: Vec2::ZERO,
            padding: defaults::PADDING,
            vertical: defaults::VERTICAL_ALIGN,
            horizontal: defaults::HORIZONTAL_ALIGN,
            paint: None,
            flags: NodeFlags::default(),
        }
    }
}

impl NodeOptions {
    /// Options for a `width` × `height` node with every other field defaulted.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Set both alignments.
    #[must_use]
    pub fn aligned(mut self, vertical: VerticalAlign, horizontal: HorizontalAlign) -> Self {
        self.vertical = vertical;
        self.horizontal = horizontal;
        self
    }

    /// Set the offset.
    #[must_use]
    pub fn offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the paint properties.
    #[must_use]
    pub fn paint(mut self, paint: PaintProps) -> Self {
        self.paint = Some(paint);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_visible_and_animated() {
        let flags = NodeFlags::default();
        assert!(flags.contains(NodeFlags::VISIBLE), "visible by default");
        assert!(flags.contains(NodeFlags::ANIMATED), "animated by default");
    }

    #[test]
    fn sized_options_keep_defaults() {
        let opts = NodeOptions::sized(10.0, 20.0);
        assert_eq!(opts.width, Some(10.0));
        assert_eq!(opts.height, Some(20.0));
        assert_eq!(opts.vertical, VerticalAlign::Top);
        assert_eq!(opts.horizontal, HorizontalAlign::Left);
        assert_eq!(opts.padding, 0.0);
        assert!(opts.paint.is_none(), "no paint unless asked for");
    }
}
