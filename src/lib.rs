pub mod doc;
pub mod pipeline;
pub mod process;
pub mod stage;
#[cfg(test)]
pub mod testing;

pub use doc::{CodeBlock, DocError, extract_code_blocks};
pub use pipeline::{Apply, Pipeline, PipelineError};
pub use process::{ChainedProcess, DynProcess, EmptyProcess, Process};
pub use stage::{DynStage, Predicate, Stage, StageError, Transform, TryPredicate, TryTransform};

#[cfg(test)]
mod tests {
    include!("tests/unit.rs");
    include!("tests/integration.rs");
    include!("tests/proptest.rs");
}
