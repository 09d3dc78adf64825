use crate::stage::{Stage, StageError};
use std::fmt::{self, Display};

/// Replaces each element with `f(element)`. May change the element type.
#[derive(Clone, Copy)]
pub struct Transform<F> {
    name: &'static str,
    f: F,
}

impl<F> Transform<F> {
    pub fn new(f: F) -> Self {
        Self::named("transform", f)
    }

    pub fn named(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<T, U, F> Stage<T> for Transform<F>
where
    F: Fn(T) -> U,
{
    type Out = U;

    fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    fn eval(&self, item: T) -> Result<Option<U>, StageError> {
        Ok(Some((self.f)(item)))
    }
}

impl<F> fmt::Debug for Transform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// Fallible transform. An `Err(e)` becomes `StageError::Failed(name, e.to_string())`.
#[derive(Clone, Copy)]
pub struct TryTransform<F> {
    name: &'static str,
    f: F,
}

impl<F> TryTransform<F> {
    pub fn new(f: F) -> Self {
        Self::named("try_transform", f)
    }

    pub fn named(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<T, U, E, F> Stage<T> for TryTransform<F>
where
    F: Fn(T) -> Result<U, E>,
    E: Display,
{
    type Out = U;

    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn eval(&self, item: T) -> Result<Option<U>, StageError> {
        (self.f)(item)
            .map(Some)
            .map_err(|e| StageError::Failed(self.name, e.to_string()))
    }
}

impl<F> fmt::Debug for TryTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TryTransform").field(&self.name).finish()
    }
}
