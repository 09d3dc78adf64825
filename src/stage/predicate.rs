use crate::stage::{Stage, StageError};
use std::fmt::{self, Display};

/// Keeps elements for which `p(&element)` holds. The element type is unchanged.
#[derive(Clone, Copy)]
pub struct Predicate<P> {
    name: &'static str,
    p: P,
}

impl<P> Predicate<P> {
    pub fn new(p: P) -> Self {
        Self::named("predicate", p)
    }

    pub fn named(name: &'static str, p: P) -> Self {
        Self { name, p }
    }
}

impl<T, P> Stage<T> for Predicate<P>
where
    P: Fn(&T) -> bool,
{
    type Out = T;

    fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    fn eval(&self, item: T) -> Result<Option<T>, StageError> {
        Ok((self.p)(&item).then_some(item))
    }
}

impl<P> fmt::Debug for Predicate<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// Fallible predicate. `Err(e)` fails the element instead of rejecting it.
#[derive(Clone, Copy)]
pub struct TryPredicate<P> {
    name: &'static str,
    p: P,
}

impl<P> TryPredicate<P> {
    pub fn new(p: P) -> Self {
        Self::named("try_predicate", p)
    }

    pub fn named(name: &'static str, p: P) -> Self {
        Self { name, p }
    }
}

impl<T, E, P> Stage<T> for TryPredicate<P>
where
    P: Fn(&T) -> Result<bool, E>,
    E: Display,
{
    type Out = T;

    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn eval(&self, item: T) -> Result<Option<T>, StageError> {
        match (self.p)(&item) {
            Ok(keep) => Ok(keep.then_some(item)),
            Err(e) => Err(StageError::Failed(self.name, e.to_string())),
        }
    }
}

impl<P> fmt::Debug for TryPredicate<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TryPredicate").field(&self.name).finish()
    }
}
