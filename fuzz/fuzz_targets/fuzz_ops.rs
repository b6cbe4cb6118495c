#![no_main]

use arbitrary::Arbitrary;
use evosym::gp::{MutationConfig, crossover, mutate};
use evosym::{Dataset, Expr, Operator};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Structured input for operator fuzzing.
#[derive(Arbitrary, Debug)]
struct OpsInput {
    /// Operand values fed to every operator.
    x: f64,
    /// Second operand for binary operators.
    y: f64,
    /// Seed for tree generation.
    seed: u64,
    /// Maximum depth (capped to avoid deep recursion).
    max_depth: u8,
    /// Mutation rate numerator out of 255.
    rate: u8,
}

fuzz_target!(|input: OpsInput| {
    for op in Operator::ALL {
        let args = [input.x, input.y];
        let value = op
            .apply(&args[..op.arity()])
            .expect("arity matches by construction");
        assert!(value.is_finite(), "{op} produced {value}");
    }

    let max_depth = usize::from(input.max_depth % 8) + 1;
    let variables = vec!["x".to_string(), "y".to_string()];
    let mut rng = SmallRng::seed_from_u64(input.seed);

    let p1 = Expr::random(&mut rng, max_depth, &variables);
    let p2 = Expr::random(&mut rng, max_depth, &variables);
    let child = crossover(&p1, &p2, &mut rng);
    let config = MutationConfig {
        max_depth,
        rate: f64::from(input.rate) / 255.0,
        variables: &variables,
    };
    let mutated = mutate(&child, &config, 0, &mut rng);
    assert!(mutated.is_well_formed());
    assert!(mutated.depth() <= max_depth);

    let dataset = Dataset::from_pairs(variables.clone(), [(vec![input.x, input.y], input.x)]);
    if dataset.validate().is_ok() {
        let score = evosym::gp::deviation(&mutated, &dataset).expect("well-formed tree");
        assert!(score.is_finite() && score >= 0.0);
    }
});
