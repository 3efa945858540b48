// src/anim/capability.rs

//! Optional capabilities an animatable may expose.
//!
//! A set fans `set_target` / `set_interpolator` out to its children through
//! [`Animatable::as_targetable`](super::Animatable::as_targetable) and
//! [`Animatable::as_interpolated`](super::Animatable::as_interpolated);
//! children returning `None` are skipped.

use std::fmt;
use std::sync::Arc;

/// Identifier of the object whose property an animation drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(pub String);

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target(s.to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque timing curve mapping linear progress in `[0, 1]` to eased progress.
#[derive(Clone)]
pub struct Interpolator(Arc<dyn Fn(f32) -> f32 + Send + Sync>);

impl Interpolator {
    pub fn new(curve: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Interpolator(Arc::new(curve))
    }

    pub fn linear() -> Self {
        Interpolator::new(|t| t)
    }

    pub fn apply(&self, fraction: f32) -> f32 {
        (self.0)(fraction)
    }

    /// Whether two handles share the same curve.
    pub fn same_curve(&self, other: &Interpolator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interpolator(..)")
    }
}

pub trait Targetable {
    fn set_target(&mut self, target: &Target);
}

pub trait Interpolated {
    fn set_interpolator(&mut self, interpolator: &Interpolator);
}
