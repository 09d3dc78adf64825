//! Process abstraction
//! ChainedProcess is monomorphised – the compiler knows the concrete type of
//! every stage and the element type between each pair of them, so a whole chain
//! inlines into one per-element function.
//! DynProcess is the runtime-assembled fallback: a flat list of same-type stages.
use crate::stage::{DynStage, Stage, StageError};
use smallvec::SmallVec;

/// Threads one element through a sequence of stages.
pub trait Process<In> {
    type Out;

    /// `Ok(None)` when some stage rejected the element.
    fn process(&self, item: In) -> Result<Option<Self::Out>, StageError>;

    /// Number of stages.
    fn depth(&self) -> usize;

    /// Push stage names in application order.
    fn collect_names(&self, names: &mut Vec<&'static str>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyProcess;

impl<T> Process<T> for EmptyProcess {
    type Out = T;

    #[inline(always)]
    fn process(&self, item: T) -> Result<Option<T>, StageError> {
        Ok(Some(item))
    }

    #[inline(always)]
    fn depth(&self) -> usize {
        0
    }

    fn collect_names(&self, _names: &mut Vec<&'static str>) {}
}

/// `previous` runs first, then `stage`.
#[derive(Debug, Clone, Copy)]
pub struct ChainedProcess<S, P> {
    pub stage: S,
    pub previous: P,
}

impl<In, S, P> Process<In> for ChainedProcess<S, P>
where
    P: Process<In>,
    S: Stage<P::Out>,
{
    type Out = S::Out;

    #[inline(always)]
    fn process(&self, item: In) -> Result<Option<S::Out>, StageError> {
        match self.previous.process(item)? {
            Some(current) => self.stage.eval(current),
            None => Ok(None),
        }
    }

    #[inline]
    fn depth(&self) -> usize {
        self.previous.depth() + 1
    }

    fn collect_names(&self, names: &mut Vec<&'static str>) {
        self.previous.collect_names(names);
        names.push(self.stage.name());
    }
}

#[derive(Debug)]
pub struct DynProcess<T> {
    pub(crate) stages: SmallVec<[DynStage<T>; 8]>,
}

impl<T> Clone for DynProcess<T> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<T> Default for DynProcess<T> {
    fn default() -> Self {
        Self {
            stages: SmallVec::new(),
        }
    }
}

impl<T> DynProcess<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn push(mut self, stage: DynStage<T>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[DynStage<T>] {
        &self.stages
    }
}

impl<T> FromIterator<DynStage<T>> for DynProcess<T> {
    fn from_iter<I: IntoIterator<Item = DynStage<T>>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl<T> Process<T> for DynProcess<T> {
    type Out = T;

    #[inline]
    fn process(&self, mut item: T) -> Result<Option<T>, StageError> {
        for stage in &self.stages {
            match stage.eval(item) {
                Some(next) => item = next,
                None => return Ok(None),
            }
        }
        Ok(Some(item))
    }

    fn depth(&self) -> usize {
        self.stages.len()
    }

    fn collect_names(&self, names: &mut Vec<&'static str>) {
        names.extend(self.stages.iter().map(DynStage::name));
    }
}
