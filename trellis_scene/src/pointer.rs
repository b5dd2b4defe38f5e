// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer: raw input position in, rendering position out.
//!
//! The host writes the latest input sample with
//! [`Pointer::set_target_position`]; nothing is queued, so only the last
//! sample before a tick matters. Each update derives the rendering position
//! from the target (by [`Motion`] or a custom update hook) and publishes it
//! into the scene's store under [`keys::POINTER_POSITION`].

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::f64::consts::TAU;
use core::fmt;

use kurbo::{Arc, Point, Vec2};

use crate::context::DrawContext;
use crate::defaults;
use crate::error::HookError;
use crate::paint::{PaintProps, PaintScope};
use crate::props::{PropValue, Props, keys};

/// Shared handle to a pointer. The scene and the host both hold one.
pub type PointerHandle = Rc<RefCell<Pointer>>;

/// Replaces the motion step. Receives `(target, current)` and returns the new
/// rendering position.
pub type PointerUpdateHook =
    Box<dyn FnMut(Option<Point>, Option<Point>) -> Result<Option<Point>, HookError>>;
/// Replaces the default circle. Receives the context and the rendering position.
pub type PointerRenderHook = Box<dyn FnMut(&mut dyn DrawContext, Point) -> Result<(), HookError>>;

/// How the rendering position follows the target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Motion {
    /// Jump straight to the target.
    #[default]
    Snap,
    /// Close `factor` of the remaining distance each tick.
    ///
    /// The first tick without a rendering position snaps.
    Smooth {
        /// Convergence factor in `(0, 1]`.
        factor: f64,
    },
}

impl Motion {
    /// Next rendering position given the current target and rendering position.
    pub fn step(self, target: Option<Point>, current: Option<Point>) -> Option<Point> {
        let Some(target) = target else {
            return current;
        };
        match (self, current) {
            (Self::Smooth { factor }, Some(current)) => Some(current.lerp(target, factor)),
            _ => Some(target),
        }
    }
}

/// Construction options for a [`Pointer`].
#[derive(Clone, Debug)]
pub struct PointerOptions {
    /// Whether the pointer paints.
    pub visible: bool,
    /// Radius of the default circle.
    pub radius: f64,
    /// How the rendering position follows the target.
    pub motion: Motion,
    /// Paint properties applied around the pointer's paint.
    pub paint: Option<PaintProps>,
}

impl Default for PointerOptions {
    fn default() -> Self {
        Self {
            visible: true,
            radius: defaults::POINTER_RADIUS,
            motion: Motion::Snap,
            paint: Some(PaintProps::default()),
        }
    }
}

/// A pointer tracked by a scene and painted above everything else.
pub struct Pointer {
    props: Props,
    target: Option<Point>,
    rendering: Option<Point>,
    visible: bool,
    radius: f64,
    motion: Motion,
    paint: Option<PaintProps>,
    update_hook: Option<PointerUpdateHook>,
    render_hook: Option<PointerRenderHook>,
    /// Set while a scene holds this pointer.
    attached: bool,
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("target", &self.target)
            .field("rendering", &self.rendering)
            .field("visible", &self.visible)
            .field("radius", &self.radius)
            .field("motion", &self.motion)
            .field("paint", &self.paint)
            .field("props", &self.props)
            .field("on_update", &self.update_hook.is_some())
            .field("on_render", &self.render_hook.is_some())
            .field("attached", &self.attached)
            .finish()
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new(PointerOptions::default())
    }
}

impl Pointer {
    /// Create a pointer with no position yet.
    pub fn new(options: PointerOptions) -> Self {
        Self {
            props: Props::new(),
            target: None,
            rendering: None,
            visible: options.visible,
            radius: options.radius,
            motion: options.motion,
            paint: options.paint,
            update_hook: None,
            render_hook: None,
            attached: false,
        }
    }

    /// Wrap in a shared handle.
    pub fn into_handle(self) -> PointerHandle {
        Rc::new(RefCell::new(self))
    }

    /// Whether a scene currently holds this pointer.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    /// Record the latest input sample.
    pub fn set_target_position(&mut self, x: f64, y: f64) {
        self.target = Some(Point::new(x, y));
    }

    /// Set target and rendering position at once, e.g. on the first input.
    pub fn initialise_position(&mut self, x: f64, y: f64) {
        let at = Point::new(x, y);
        self.target = Some(at);
        self.rendering = Some(at);
    }

    /// The latest input sample.
    pub fn target_position(&self) -> Option<Point> {
        self.target
    }

    /// Where the pointer is drawn.
    pub fn rendering_position(&self) -> Option<Point> {
        self.rendering
    }

    /// Whether the pointer paints.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stop painting; the pointer keeps tracking.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Resume painting.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Radius of the default circle.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// How the rendering position follows the target.
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Replace the motion.
    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    /// Value under `key` in the pointer's own store.
    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Store `value` under `key` in the pointer's own store.
    pub fn set_prop(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        self.props.set(key, value);
    }

    /// Install an update hook replacing the [`Motion`] step.
    ///
    /// Whatever the hook returns is published like a built-in step would be.
    pub fn on_update(
        &mut self,
        hook: impl FnMut(Option<Point>, Option<Point>) -> Result<Option<Point>, HookError> + 'static,
    ) -> &mut Self {
        self.update_hook = Some(Box::new(hook));
        self
    }

    /// Install a render hook replacing the default circle.
    pub fn on_render(
        &mut self,
        hook: impl FnMut(&mut dyn DrawContext, Point) -> Result<(), HookError> + 'static,
    ) -> &mut Self {
        self.render_hook = Some(Box::new(hook));
        self
    }

    /// Advance the rendering position and publish it into `store`.
    pub fn update(&mut self, store: &mut Props) -> Result<(), HookError> {
        let next = match self.update_hook.as_mut() {
            Some(hook) => hook(self.target, self.rendering)?,
            None => self.motion.step(self.target, self.rendering),
        };
        self.rendering = next;
        if let Some(at) = next {
            store.set(keys::POINTER_POSITION, at);
        }
        Ok(())
    }

    /// Paint at the rendering position, if visible and positioned.
    pub fn render(&mut self, ctx: &mut dyn DrawContext) -> Result<(), HookError> {
        if !self.visible {
            return Ok(());
        }
        let Some(at) = self.rendering else {
            return Ok(());
        };
        let Self {
            paint,
            render_hook,
            radius,
            ..
        } = self;
        match paint {
            Some(paint) => {
                let mut scope = PaintScope::open(ctx, paint);
                draw(&mut *scope, render_hook, *radius, at)
            }
            None => draw(ctx, render_hook, *radius, at),
        }
    }
}

fn draw(
    ctx: &mut dyn DrawContext,
    hook: &mut Option<PointerRenderHook>,
    radius: f64,
    at: Point,
) -> Result<(), HookError> {
    if let Some(hook) = hook {
        return hook(ctx, at);
    }
    let circle = Arc {
        center: at,
        radii: Vec2::new(radius, radius),
        start_angle: 0.0,
        sweep_angle: TAU,
        x_rotation: 0.0,
    };
    ctx.fill_arc(&circle);
    ctx.stroke_arc(&circle);
    Ok(())
}
