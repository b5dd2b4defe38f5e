// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types and the per-frame failure report.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

/// A node could not be constructed from its options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigurationError {
    /// No width was supplied.
    MissingWidth,
    /// No height was supplied.
    MissingHeight,
    /// A dimension was negative or not finite.
    InvalidDimension {
        /// The width that was supplied.
        width: f64,
        /// The height that was supplied.
        height: f64,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWidth => f.write_str("bounded node has no width"),
            Self::MissingHeight => f.write_str("bounded node has no height"),
            Self::InvalidDimension { width, height } => {
                write!(f, "bounded node has an invalid size {width}x{height}")
            }
        }
    }
}

impl core::error::Error for ConfigurationError {}

/// An operation was invoked in a state that does not support it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateError {
    /// The scene has no pointer attached.
    PointerNotAttached,
    /// The pointer is already attached to another scene.
    PointerAlreadyAttached,
    /// Children can only be added to composite nodes.
    NotComposite,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerNotAttached => f.write_str("the scene's pointer hasn't been attached"),
            Self::PointerAlreadyAttached => {
                f.write_str("the pointer is attached to another scene")
            }
            Self::NotComposite => f.write_str("node cannot own children"),
        }
    }
}

impl core::error::Error for StateError {}

/// Failure reported by an update or render hook.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HookError {
    message: Cow<'static, str>,
}

impl HookError {
    /// Create an error carrying `message`.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied by the hook.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for HookError {}

/// Frame phase in which a hook ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The update pass.
    Update,
    /// The render pass.
    Render,
}

/// Where a failing hook lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureSite {
    /// The scene's pointer.
    Pointer,
    /// A node, addressed by child indices from the scene root.
    Node(Vec<usize>),
}

/// One isolated hook failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookFailure {
    /// Phase the hook ran in.
    pub phase: Phase,
    /// The hook's owner.
    pub site: FailureSite,
    /// What the hook returned.
    pub error: HookError,
}

/// Hook failures collected during a frame.
///
/// A failing hook never stops the traversal: the failure is logged, recorded
/// here, and the remaining nodes are processed as usual.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    failures: Vec<HookFailure>,
}

impl FrameReport {
    /// Returns true if no hook failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// The recorded failures, in traversal order.
    pub fn failures(&self) -> &[HookFailure] {
        &self.failures
    }

    /// Append the failures of `other`.
    pub fn merge(&mut self, other: Self) {
        self.failures.extend(other.failures);
    }

    pub(crate) fn record(&mut self, phase: Phase, site: FailureSite, error: HookError) {
        log::warn!("{phase:?} hook failed at {site:?}: {error}");
        self.failures.push(HookFailure { phase, site, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigurationError::MissingWidth.to_string(),
            "bounded node has no width"
        );
        assert_eq!(
            StateError::PointerNotAttached.to_string(),
            "the scene's pointer hasn't been attached"
        );
        assert_eq!(HookError::new("boom").to_string(), "boom");
    }

    #[test]
    fn merge_keeps_order() {
        let mut a = FrameReport::default();
        a.record(
            Phase::Update,
            FailureSite::Node(vec![0]),
            HookError::new("first"),
        );
        let mut b = FrameReport::default();
        b.record(Phase::Render, FailureSite::Pointer, HookError::new("second"));
        a.merge(b);
        assert!(!a.is_ok(), "two failures were recorded");
        let messages: Vec<_> = a.failures().iter().map(|f| f.error.message()).collect();
        assert_eq!(messages, ["first", "second"]);
    }
}
