use std::error::Error;

use stagepipe::{DynStage, Pipeline, Predicate, Transform};

fn double(x: i32) -> i32 {
    x + x
}

fn is_odd(x: &i32) -> bool {
    x % 2 == 1
}

fn main() -> Result<(), Box<dyn Error>> {
    let numbers = [1, 2, 3, 4];

    // ────────────────────────────────────────────────────────────────
    // map with a closure, then with a named function
    // ────────────────────────────────────────────────────────────────
    let doubled = Pipeline::<i32>::empty().with_transform(|x| x + x);
    println!("map(lambda)    : {:?}", doubled.run(numbers)?);
    // → [2, 4, 6, 8]

    let doubled = Pipeline::<i32>::empty().with_transform(double);
    println!("map(double)    : {:?}", doubled.run(numbers)?);
    // → [2, 4, 6, 8]

    // ────────────────────────────────────────────────────────────────
    // filter
    // ────────────────────────────────────────────────────────────────
    let odds = Pipeline::<i32>::empty().with_predicate(is_odd);
    println!("filter(is_odd) : {:?}", odds.run(numbers)?);
    // → [1, 3]

    // ────────────────────────────────────────────────────────────────
    // chaining reads left to right instead of inside out
    // ────────────────────────────────────────────────────────────────
    let chain = Pipeline::<i32>::empty()
        .with_stage(Predicate::named("is_odd", is_odd))
        .with_stage(Transform::named("double", double));
    println!("{:?}", chain);
    println!("filter → map   : {:?}", chain.run(numbers)?);
    // → [2, 6]

    // The output is lazy: nothing runs until it is pulled.
    let mut lazy = chain.apply(numbers);
    println!("first          : {:?}", lazy.next().transpose()?);
    // → Some(2)

    // ────────────────────────────────────────────────────────────────
    // functions as values: a stage table assembled at runtime
    // ────────────────────────────────────────────────────────────────
    let table = vec![
        DynStage::predicate("is_odd", is_odd),
        DynStage::transform("double", double),
        DynStage::transform("print", |x: i32| {
            println!("  visiting {x}");
            x
        }),
    ];
    let dynamic = Pipeline::from_stages(table);
    println!("dynamic        : {:?}", dynamic.run(numbers)?);
    // →   visiting 2
    //     visiting 6
    //     [2, 6]

    Ok(())
}
