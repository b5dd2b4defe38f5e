// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for Trellis scenes.
//!
//! This crate provides the two host traits `trellis_scene` consumes:
//!
//! - [`CanvasContext`]: a [`DrawContext`] over a `CanvasRenderingContext2d`
//! - [`RafScheduler`]: a [`FrameScheduler`] over `requestAnimationFrame`
//!
//! Input wiring stays with the page: forward pointer events to
//! [`Scene::set_pointer_target`] and window resizes to [`Scene::resize`].
//!
//! [`Scene::set_pointer_target`]: trellis_scene::Scene::set_pointer_target
//! [`Scene::resize`]: trellis_scene::Scene::resize

#![no_std]

extern crate alloc;

mod canvas;
mod raf;

pub use canvas::{CanvasContext, CanvasError};
pub use raf::RafScheduler;
pub use trellis_scene::{DrawContext, FrameScheduler};
