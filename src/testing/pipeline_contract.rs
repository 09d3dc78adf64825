use crate::{DynStage, Pipeline};
use std::cell::Cell;
use std::fmt::Debug;

/// Assert that a transform/predicate pair satisfies **all pipeline laws** on `input`.
///
/// ### Laws:
/// 1. `identity_law` → the empty pipeline yields the input unchanged
/// 2. `transform_matches_map` → one transform behaves like `Iterator::map`
/// 3. `predicate_matches_filter` → one predicate behaves like `Iterator::filter`
/// 4. `filter_then_map` → predicate followed by transform maps only kept elements
/// 5. `construction_is_deterministic` → two identically built pipelines agree, on repeated passes too
/// 6. `lazy_until_polled` → `apply` touches neither the input nor any stage
///
/// `$predicate` and `$transform` are expanded several times, so pass closures
/// or function paths, not expressions with side effects.
#[macro_export]
macro_rules! assert_pipeline_laws {
    ($input:expr, $transform:expr, $predicate:expr) => {{
        let input = $input;
        $crate::testing::pipeline_contract::identity_law(&input);
        $crate::testing::pipeline_contract::transform_matches_map(&input, $transform);
        $crate::testing::pipeline_contract::predicate_matches_filter(&input, $predicate);
        $crate::testing::pipeline_contract::filter_then_map(&input, $predicate, $transform);
        $crate::testing::pipeline_contract::construction_is_deterministic(
            &input, $predicate, $transform,
        );
        $crate::testing::pipeline_contract::lazy_until_polled(&input, $predicate, $transform);
    }};
}

pub fn identity_law<T>(input: &[T])
where
    T: Clone + PartialEq + Debug,
{
    let out = Pipeline::<T>::empty()
        .run(input.iter().cloned())
        .expect("empty pipeline failed");
    assert_eq!(out, input, "identity pipeline altered its input");
}

pub fn transform_matches_map<T, U, F>(input: &[T], f: F)
where
    T: Clone,
    U: PartialEq + Debug,
    F: Fn(T) -> U + Clone,
{
    let pipeline = Pipeline::<T>::empty().with_transform(f.clone());
    let expected: Vec<U> = input.iter().cloned().map(f).collect();
    let out = pipeline.run(input.iter().cloned()).expect("transform failed");
    assert_eq!(out, expected, "transform stage ≠ Iterator::map");
}

pub fn predicate_matches_filter<T, P>(input: &[T], p: P)
where
    T: Clone + PartialEq + Debug,
    P: Fn(&T) -> bool + Clone,
{
    let pipeline = Pipeline::<T>::empty().with_predicate(p.clone());
    let expected: Vec<T> = input.iter().filter(|x| p(x)).cloned().collect();
    let out = pipeline.run(input.iter().cloned()).expect("predicate failed");
    assert_eq!(out, expected, "predicate stage ≠ Iterator::filter");
}

pub fn filter_then_map<T, U, P, F>(input: &[T], p: P, f: F)
where
    T: Clone,
    U: PartialEq + Debug,
    P: Fn(&T) -> bool + Clone,
    F: Fn(T) -> U + Clone,
{
    let pipeline = Pipeline::<T>::empty()
        .with_predicate(p.clone())
        .with_transform(f.clone());
    let expected: Vec<U> = input.iter().filter(|x| p(x)).cloned().map(f).collect();
    let out = pipeline.run(input.iter().cloned()).expect("pipeline failed");
    assert_eq!(out, expected, "predicate → transform ≠ filter → map");
}

pub fn construction_is_deterministic<T, U, P, F>(input: &[T], p: P, f: F)
where
    T: Clone,
    U: PartialEq + Debug,
    P: Fn(&T) -> bool + Clone,
    F: Fn(T) -> U + Clone,
{
    let build = || {
        Pipeline::<T>::empty()
            .with_predicate(p.clone())
            .with_transform(f.clone())
    };
    let (first, second) = (build(), build());

    let a = first.run(input.iter().cloned()).expect("first pipeline failed");
    let b = second.run(input.iter().cloned()).expect("second pipeline failed");
    let again = first.run(input.iter().cloned()).expect("second pass failed");
    assert_eq!(a, b, "identically built pipelines disagree");
    assert_eq!(a, again, "second pass over the same input disagrees");
    assert_eq!(first.stage_names(), second.stage_names());
}

pub fn lazy_until_polled<T, U, P, F>(input: &[T], p: P, f: F)
where
    T: Clone,
    P: Fn(&T) -> bool,
    F: Fn(T) -> U,
{
    let calls = Cell::new(0usize);
    let pulled = Cell::new(0usize);

    let pipeline = Pipeline::<T>::empty()
        .with_predicate(|x: &T| {
            calls.set(calls.get() + 1);
            p(x)
        })
        .with_transform(|x: T| {
            calls.set(calls.get() + 1);
            f(x)
        });

    let source = input.iter().inspect(|_| pulled.set(pulled.get() + 1)).cloned();
    let out = pipeline.apply(source);
    assert_eq!(calls.get(), 0, "stage evaluated before the output was polled");
    assert_eq!(pulled.get(), 0, "input pulled before the output was polled");

    let yielded = out.count();
    let kept = input.iter().filter(|x| p(x)).count();
    assert_eq!(yielded, kept);
    assert_eq!(pulled.get(), input.len());
    // One predicate call per element plus one transform call per kept element.
    assert_eq!(calls.get(), input.len() + kept);
}

/// A dynamic pipeline and the equivalent static one must agree.
pub fn dynamic_matches_static<T>(input: &[T], stages: &[DynStage<T>])
where
    T: Clone + PartialEq + Debug,
{
    let dynamic = Pipeline::from_stages(stages.iter().cloned());
    let expected: Vec<T> = input
        .iter()
        .cloned()
        .filter_map(|mut item| {
            for stage in stages {
                match stage {
                    DynStage::Transform(_, f) => item = f(item),
                    DynStage::Predicate(_, p) if !p(&item) => return None,
                    DynStage::Predicate(..) => {}
                }
            }
            Some(item)
        })
        .collect();

    let out = dynamic.run(input.iter().cloned()).expect("dynamic pipeline failed");
    assert_eq!(out, expected, "dynamic pipeline ≠ hand-rolled evaluation");
    assert_eq!(
        dynamic.stage_names(),
        stages.iter().map(DynStage::name).collect::<Vec<_>>()
    );
}
