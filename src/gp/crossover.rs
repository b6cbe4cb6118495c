//! Crossover operator for genetic programming.
//!
//! This is single-point prefix crossover over the root's operands, not
//! arbitrary-depth subtree exchange: the child keeps parent one's root
//! operator and leading operands and takes parent two's operands from the
//! swap point on. Swap points only fall on direct children of the roots.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::gp::expr::Expr;

/// Perform crossover between two parent expressions.
///
/// - If either parent is a leaf, one parent is returned unchanged at random.
/// - Otherwise the candidate swap points are the operand positions shared by
///   both roots where both hold an operator node. Roots of different arity
///   have no candidates: splicing a binary root's operands under `exp` (or
///   the reverse) yields a node whose child count differs from its arity,
///   which evaluation rejects with [`EvalError::ArityMismatch`].
///
/// [`EvalError::ArityMismatch`]: crate::error::EvalError::ArityMismatch
/// - Without candidates, one parent is returned unchanged at random.
#[must_use]
pub fn crossover<R: Rng>(parent1: &Expr, parent2: &Expr, rng: &mut R) -> Expr {
    let (
        Expr::Op {
            op: op1,
            args: args1,
        },
        Expr::Op { op: op2, args: args2 },
    ) = (parent1, parent2)
    else {
        return pick_parent(parent1, parent2, rng);
    };

    if op1.arity() != op2.arity() {
        return pick_parent(parent1, parent2, rng);
    }

    let points = swap_points(args1, args2);
    let Some(&point) = points.choose(rng) else {
        return pick_parent(parent1, parent2, rng);
    };

    let args = args1[..point]
        .iter()
        .chain(&args2[point..])
        .cloned()
        .collect();

    Expr::Op { op: *op1, args }
}

/// Operand indices where both parents hold an operator node.
///
/// Index 0 is a candidate: in that case every operand comes from parent two.
fn swap_points(args1: &[Expr], args2: &[Expr]) -> Vec<usize> {
    args1
        .iter()
        .zip(args2)
        .enumerate()
        .filter(|(_, (a, b))| !a.is_leaf() && !b.is_leaf())
        .map(|(i, _)| i)
        .collect()
}

fn pick_parent<R: Rng>(parent1: &Expr, parent2: &Expr, rng: &mut R) -> Expr {
    if rng.gen_bool(0.5) {
        parent1.clone()
    } else {
        parent2.clone()
    }
}
