//! Mutation operator for genetic programming.
//!
//! Every node gets an independent chance to mutate. Fresh material is always
//! sized by the depth budget left below the node, so a mutated tree never
//! grows past the configured maximum depth.

use rand::Rng;

use crate::gp::expr::Expr;

/// Parameters shared by every step of one mutation pass.
#[derive(Debug, Clone, Copy)]
pub struct MutationConfig<'a> {
    /// Maximum depth of any tree.
    pub max_depth: usize,
    /// Per-node mutation probability, in `[0, 1]`.
    pub rate: f64,
    /// Variables available to regenerated subtrees.
    pub variables: &'a [String],
}

/// Mutate a tree whose root sits at `depth` (0 for a whole individual).
///
/// A node selected for mutation is handled as follows:
/// - an operator node above the depth bound keeps its operator and gets
///   entirely new operands, each a random subtree that is itself run through
///   mutation again one level down;
/// - a leaf, or a node at the bound, is replaced by a random subtree sized to
///   the remaining budget.
///
/// Unselected operator nodes recurse into their operands; unselected leaves
/// are returned unchanged. With `rate == 0` the result equals the input.
#[must_use]
pub fn mutate<R: Rng>(expr: &Expr, config: &MutationConfig<'_>, depth: usize, rng: &mut R) -> Expr {
    if rng.gen_bool(config.rate.clamp(0.0, 1.0)) {
        return match expr {
            Expr::Op { op, .. } if depth < config.max_depth => {
                let budget = config.max_depth - depth - 1;
                let args = (0..op.arity())
                    .map(|_| {
                        let fresh = Expr::random(rng, budget, config.variables);
                        mutate(&fresh, config, depth + 1, rng)
                    })
                    .collect();
                Expr::Op { op: *op, args }
            }
            _ => Expr::random(rng, config.max_depth.saturating_sub(depth), config.variables),
        };
    }

    match expr {
        Expr::Var(_) => expr.clone(),
        Expr::Op { op, args } => Expr::Op {
            op: *op,
            args: args
                .iter()
                .map(|arg| mutate(arg, config, depth + 1, rng))
                .collect(),
        },
    }
}
