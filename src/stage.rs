//! Core stage abstraction.
//!
//! A stage receives one element and either hands a (possibly new) value to the
//! next stage, rejects the element, or fails:
//!
//! * `Ok(Some(out))` – continue with `out`.
//! * `Ok(None)` – the element is discarded; later stages never see it.
//! * `Err(StageError)` – evaluation failed for this element.
//!
//! Input and output types are associated with the trait, so a chain of stages
//! whose types do not line up is rejected by the compiler instead of at runtime.

pub mod predicate;
pub mod transform;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use predicate::{Predicate, TryPredicate};
pub use transform::{Transform, TryTransform};

/// Public error type for every stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("evaluation failed at stage `{0}`: {1}")]
    Failed(&'static str, String),
}

impl StageError {
    /// Name of the stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Failed(name, _) => name,
        }
    }
}

/// A single pipeline step from `In` to `Self::Out`.
pub trait Stage<In> {
    type Out;

    /// Human-readable name – used in error messages and `Pipeline::stage_names`.
    fn name(&self) -> &'static str;

    /// Evaluate one element. `Ok(None)` rejects it.
    fn eval(&self, item: In) -> Result<Option<Self::Out>, StageError>;
}

type DynTransformFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
type DynPredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Tagged stage for pipelines assembled at runtime.
///
/// Every variant keeps the element type unchanged, so a plain list of them is
/// always well typed.
pub enum DynStage<T> {
    Transform(&'static str, DynTransformFn<T>),
    Predicate(&'static str, DynPredicateFn<T>),
}

impl<T> DynStage<T> {
    pub fn transform<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        DynStage::Transform(name, Arc::new(f))
    }

    pub fn predicate<F>(name: &'static str, p: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        DynStage::Predicate(name, Arc::new(p))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DynStage::Transform(name, _) | DynStage::Predicate(name, _) => name,
        }
    }

    #[inline]
    pub(crate) fn eval(&self, item: T) -> Option<T> {
        match self {
            DynStage::Transform(_, f) => Some(f(item)),
            DynStage::Predicate(_, p) => p(&item).then_some(item),
        }
    }
}

// Manual impl: cloning only bumps the `Arc`, so `T` need not be `Clone`.
impl<T> Clone for DynStage<T> {
    fn clone(&self) -> Self {
        match self {
            DynStage::Transform(name, f) => DynStage::Transform(name, Arc::clone(f)),
            DynStage::Predicate(name, p) => DynStage::Predicate(name, Arc::clone(p)),
        }
    }
}

impl<T> fmt::Debug for DynStage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DynStage::Transform(..) => "Transform",
            DynStage::Predicate(..) => "Predicate",
        };
        f.debug_tuple(kind).field(&self.name()).finish()
    }
}
