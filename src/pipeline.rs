// src/pipeline.rs
use crate::{
    process::{ChainedProcess, DynProcess, EmptyProcess, Process},
    stage::{DynStage, Predicate, Stage, StageError, Transform, TryPredicate, TryTransform},
};
use std::fmt::{self, Display};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("element #{position}: {source}")]
    Evaluation {
        /// 0-based index of the failing element in the input sequence.
        position: usize,
        #[source]
        source: StageError,
    },
}

impl PipelineError {
    pub fn position(&self) -> usize {
        match self {
            PipelineError::Evaluation { position, .. } => *position,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Evaluation { source, .. } => source.stage(),
        }
    }
}

/// An immutable, ordered chain of stages from `In` to `P::Out`.
///
/// Every `with_*` call consumes the pipeline and returns a new one with the
/// stage appended; clone first to keep the shorter pipeline around.
/// `apply` only borrows, so one pipeline serves any number of inputs.
pub struct Pipeline<In, P = EmptyProcess> {
    process: P,
    _input: PhantomData<fn(In)>,
}

impl<In> Pipeline<In, EmptyProcess> {
    /// The identity pipeline.
    pub fn empty() -> Self {
        Self::from_process(EmptyProcess)
    }

    /// Empty pipeline whose stages are pushed at runtime.
    pub fn dynamic() -> Pipeline<In, DynProcess<In>> {
        Pipeline::from_process(DynProcess::new())
    }

    pub fn from_stages<I>(stages: I) -> Pipeline<In, DynProcess<In>>
    where
        I: IntoIterator<Item = DynStage<In>>,
    {
        Pipeline::from_process(stages.into_iter().collect())
    }
}

impl<In> Default for Pipeline<In, EmptyProcess> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Pipeline<T, DynProcess<T>> {
    pub fn push(self, stage: DynStage<T>) -> Self {
        Self::from_process(self.process.push(stage))
    }

    pub fn push_transform<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.push(DynStage::transform(name, f))
    }

    pub fn push_predicate<F>(self, name: &'static str, p: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push(DynStage::predicate(name, p))
    }
}

impl<In, P> Pipeline<In, P> {
    pub fn from_process(process: P) -> Self {
        Self {
            process,
            _input: PhantomData,
        }
    }
}

impl<In, P: Process<In>> Pipeline<In, P> {
    pub fn with_stage<S>(self, stage: S) -> Pipeline<In, ChainedProcess<S, P>>
    where
        S: Stage<P::Out>,
    {
        Pipeline::from_process(ChainedProcess {
            stage,
            previous: self.process,
        })
    }

    pub fn with_transform<U, F>(self, f: F) -> Pipeline<In, ChainedProcess<Transform<F>, P>>
    where
        F: Fn(P::Out) -> U,
    {
        self.with_stage(Transform::new(f))
    }

    pub fn with_predicate<F>(self, p: F) -> Pipeline<In, ChainedProcess<Predicate<F>, P>>
    where
        F: Fn(&P::Out) -> bool,
    {
        self.with_stage(Predicate::new(p))
    }

    pub fn with_try_transform<U, E, F>(
        self,
        f: F,
    ) -> Pipeline<In, ChainedProcess<TryTransform<F>, P>>
    where
        F: Fn(P::Out) -> Result<U, E>,
        E: Display,
    {
        self.with_stage(TryTransform::new(f))
    }

    pub fn with_try_predicate<E, F>(self, p: F) -> Pipeline<In, ChainedProcess<TryPredicate<F>, P>>
    where
        F: Fn(&P::Out) -> Result<bool, E>,
        E: Display,
    {
        self.with_stage(TryPredicate::new(p))
    }

    /// Lazily thread `input` through the stages.
    ///
    /// Nothing is evaluated (not even `input.next()`) until the returned
    /// iterator is polled. The iterator stops after yielding the first error.
    pub fn apply<I>(&self, input: I) -> Apply<'_, In, P, I::IntoIter>
    where
        I: IntoIterator<Item = In>,
    {
        Apply {
            process: &self.process,
            input: input.into_iter(),
            position: 0,
            failed: false,
            _input: PhantomData,
        }
    }

    /// Eager form of `apply`.
    pub fn run<I>(&self, input: I) -> Result<Vec<P::Out>, PipelineError>
    where
        I: IntoIterator<Item = In>,
    {
        self.apply(input).collect()
    }

    pub fn len(&self) -> usize {
        self.process.depth()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.len());
        self.process.collect_names(&mut names);
        names
    }
}

impl<In, P: Clone> Clone for Pipeline<In, P> {
    fn clone(&self) -> Self {
        Self::from_process(self.process.clone())
    }
}

impl<In, P: Process<In>> fmt::Debug for Pipeline<In, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Lazy output of [`Pipeline::apply`].
pub struct Apply<'p, In, P, I> {
    process: &'p P,
    input: I,
    position: usize,
    failed: bool,
    _input: PhantomData<fn(In)>,
}

impl<In, P, I> Iterator for Apply<'_, In, P, I>
where
    P: Process<In>,
    I: Iterator<Item = In>,
{
    type Item = Result<P::Out, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for item in self.input.by_ref() {
            let position = self.position;
            self.position += 1;
            match self.process.process(item) {
                Ok(Some(out)) => return Some(Ok(out)),
                Ok(None) => trace!(position, "element rejected"),
                Err(source) => {
                    debug!(position, stage = source.stage(), error = %source, "stage failed");
                    self.failed = true;
                    return Some(Err(PipelineError::Evaluation { position, source }));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        // Each input element yields at most one item.
        let (_, upper) = self.input.size_hint();
        (0, upper)
    }
}

impl<In, P, I> FusedIterator for Apply<'_, In, P, I>
where
    P: Process<In>,
    I: Iterator<Item = In>,
{
}
