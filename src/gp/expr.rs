//! Expression trees for symbolic regression.
//!
//! A tree is either a variable leaf or an operator node whose children match
//! the operator's arity. Trees are treated as immutable values: the genetic
//! operators always build new trees from their inputs.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, ParseError};
use crate::gp::ops::Operator;

/// Probability of stopping at a leaf while depth budget remains.
const LEAF_PROBABILITY: f64 = 0.5;

/// Deepest nesting the parser accepts before giving up.
pub const MAX_PARSE_DEPTH: usize = 1024;

/// Variable lookup used during evaluation.
pub trait Bindings {
    /// Value bound to `name`, if any.
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> Bindings for HashMap<&str, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// An expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Variable leaf.
    Var(String),
    /// Operator applied to ordered operands.
    Op {
        /// The operator.
        op: Operator,
        /// Operands, `op.arity()` of them in a well-formed tree.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Variable leaf.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Binary node.
    #[must_use]
    pub fn binary(op: Operator, left: Self, right: Self) -> Self {
        Self::Op {
            op,
            args: vec![left, right],
        }
    }

    /// Unary node.
    #[must_use]
    pub fn unary(op: Operator, arg: Self) -> Self {
        Self::Op { op, args: vec![arg] }
    }

    /// Generate a random tree no deeper than `max_depth`.
    ///
    /// A budget of 1 (or 0) always yields a leaf. Otherwise a leaf is chosen
    /// with probability one half, else an operator picked by weight with one
    /// subtree per operand at `max_depth - 1`.
    ///
    /// `variables` is expected to be non-empty; an empty set produces the
    /// unnamed leaf, which evaluates to 0 like any unbound name.
    #[must_use]
    pub fn random<R: Rng>(rng: &mut R, max_depth: usize, variables: &[String]) -> Self {
        if max_depth <= 1 || rng.gen_bool(LEAF_PROBABILITY) {
            return Self::random_leaf(rng, variables);
        }

        let op = Operator::choose_weighted(rng);
        let args = (0..op.arity())
            .map(|_| Self::random(rng, max_depth - 1, variables))
            .collect();
        Self::Op { op, args }
    }

    /// Generate a random variable leaf.
    #[must_use]
    pub fn random_leaf<R: Rng>(rng: &mut R, variables: &[String]) -> Self {
        Self::Var(variables.choose(rng).cloned().unwrap_or_default())
    }

    /// Evaluate the tree.
    ///
    /// Unbound variables evaluate to 0.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ArityMismatch`] if any operator node has the wrong
    /// number of children.
    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<f64, EvalError> {
        match self {
            Self::Var(name) => Ok(bindings.value_of(name).unwrap_or(0.0)),
            Self::Op { op, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(bindings))
                    .collect::<Result<Vec<f64>, EvalError>>()?;

                op.apply(&values).ok_or(EvalError::ArityMismatch {
                    symbol: op.symbol(),
                    expected: op.arity(),
                    found: values.len(),
                })
            }
        }
    }

    /// Whether this is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Var(_))
    }

    /// Depth of the tree; a single leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Var(_) => 1,
            Self::Op { args, .. } => 1 + args.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Count the number of nodes in this expression tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Var(_) => 1,
            Self::Op { args, .. } => 1 + args.iter().map(Self::node_count).sum::<usize>(),
        }
    }

    /// Whether every operator node has exactly `arity` children.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::Var(_) => true,
            Self::Op { op, args } => {
                args.len() == op.arity() && args.iter().all(Self::is_well_formed)
            }
        }
    }
}

/// Renders `op(arg)` for unary and `(left op right)` for binary nodes.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => f.write_str(name),
            Self::Op { op, args } => match args.as_slice() {
                [arg] => write!(f, "{op}({arg})"),
                [left, right] => write!(f, "({left} {op} {right})"),
                _ => {
                    // Malformed node: keep every child visible
                    write!(f, "{op}[")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str("]")
                }
            },
        }
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    /// Parse the rendered form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input: s,
            pos: 0,
            depth: 0,
        };
        let expr = parser.expr()?;
        parser.skip_whitespace();
        if parser.pos < s.len() {
            return Err(ParseError::Trailing(parser.pos));
        }
        Ok(expr)
    }
}

/// Recursive-descent parser over the rendered grammar:
///
/// ```text
/// expr  := ident | ident '(' expr ')' | '(' expr binop expr ')'
/// binop := '+' | '-' | '*' | '/'
/// ```
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(ParseError::Unexpected {
                found,
                offset: self.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep(MAX_PARSE_DEPTH));
        }
        self.depth += 1;
        let result = self.node();
        self.depth -= 1;
        result
    }

    fn node(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('(') => {
                self.pos += 1;
                let left = self.expr()?;
                let op = self.binary_operator()?;
                let right = self.expr()?;
                self.expect(')')?;
                Ok(Expr::binary(op, left, right))
            }
            Some(c) if is_ident_char(c) => {
                let name = self.ident();
                self.skip_whitespace();
                if self.peek() != Some('(') {
                    return Ok(Expr::Var(name.to_string()));
                }
                let op = Operator::from_symbol(name)
                    .filter(|op| op.arity() == 1)
                    .ok_or_else(|| ParseError::UnknownOperator(name.to_string()))?;
                self.pos += 1;
                let arg = self.expr()?;
                self.expect(')')?;
                Ok(Expr::unary(op, arg))
            }
            Some(found) => Err(ParseError::Unexpected {
                found,
                offset: self.pos,
            }),
        }
    }

    fn ident(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &input[start..self.pos]
    }

    fn binary_operator(&mut self) -> Result<Operator, ParseError> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Err(ParseError::UnexpectedEnd);
        };
        let mut buf = [0u8; 4];
        let symbol = c.encode_utf8(&mut buf);
        match Operator::from_symbol(symbol) {
            Some(op) if op.arity() == 2 => {
                self.pos += c.len_utf8();
                Ok(op)
            }
            _ => Err(ParseError::UnknownOperator(symbol.to_string())),
        }
    }
}

/// Whether `name` renders as a variable leaf that parses back unchanged.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_ident_char)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_random_respects_depth_and_arity() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let variables = vars(&["x", "y"]);

        for max_depth in 1..=6 {
            for _ in 0..200 {
                let expr = Expr::random(&mut rng, max_depth, &variables);
                assert!(expr.depth() <= max_depth);
                assert!(expr.is_well_formed());
            }
        }
    }

    #[test]
    fn test_depth_one_is_leaf() {
        let mut rng = SmallRng::seed_from_u64(7);
        let variables = vars(&["x"]);
        for _ in 0..50 {
            assert_eq!(Expr::random(&mut rng, 1, &variables), Expr::var("x"));
        }
    }

    #[test]
    fn test_evaluate_binds_and_defaults() {
        let expr = Expr::binary(Operator::Add, Expr::var("x"), Expr::var("missing"));
        let bindings: HashMap<&str, f64> = HashMap::from([("x", 3.5)]);
        assert_eq!(expr.evaluate(&bindings), Ok(3.5));
    }

    #[test]
    fn test_evaluate_exp_of_product() {
        let expr = Expr::unary(
            Operator::Exp,
            Expr::binary(Operator::Mul, Expr::var("x"), Expr::var("y")),
        );
        let bindings: HashMap<String, f64> =
            HashMap::from([("x".to_string(), 0.5), ("y".to_string(), 2.0)]);
        let value = expr.evaluate(&bindings).unwrap();
        assert!((value - std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn test_arity_mismatch_is_an_error() {
        let broken = Expr::Op {
            op: Operator::Exp,
            args: vec![Expr::var("x"), Expr::var("x")],
        };
        let bindings: HashMap<&str, f64> = HashMap::new();
        assert_eq!(
            broken.evaluate(&bindings),
            Err(EvalError::ArityMismatch {
                symbol: "exp",
                expected: 1,
                found: 2,
            })
        );
        assert!(!broken.is_well_formed());
    }

    #[test]
    fn test_nested_arity_mismatch_propagates() {
        let broken = Expr::binary(
            Operator::Sub,
            Expr::var("x"),
            Expr::Op {
                op: Operator::Div,
                args: vec![Expr::var("x")],
            },
        );
        let bindings: HashMap<&str, f64> = HashMap::new();
        assert!(broken.evaluate(&bindings).is_err());
    }

    #[test]
    fn test_display() {
        let expr = Expr::binary(
            Operator::Mul,
            Expr::unary(Operator::Exp, Expr::var("x")),
            Expr::binary(Operator::Sub, Expr::var("y"), Expr::var("x")),
        );
        assert_eq!(expr.to_string(), "(exp(x) * (y - x))");
        assert_eq!(expr.node_count(), 6);
        assert_eq!(expr.depth(), 3);
    }

    #[test]
    fn test_parse_rendered_form() {
        let parsed: Expr = "( exp(x)*(y / z_1) )".parse().unwrap();
        assert_eq!(parsed.to_string(), "(exp(x) * (y / z_1))");

        let leaf: Expr = "wind_speed".parse().unwrap();
        assert_eq!(leaf, Expr::var("wind_speed"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Expr>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("(x + y".parse::<Expr>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("(x ^ y)".parse::<Expr>(), Err(ParseError::UnknownOperator("^".into())));
        assert_eq!("sin(x)".parse::<Expr>(), Err(ParseError::UnknownOperator("sin".into())));
        assert_eq!("x y".parse::<Expr>(), Err(ParseError::Trailing(2)));
    }

    #[test]
    fn test_parse_deep_nesting_is_rejected() {
        let nested = format!("{}x{}", "exp(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(
            nested.parse::<Expr>(),
            Err(ParseError::TooDeep(MAX_PARSE_DEPTH))
        );

        let binary = format!("{}x{}", "(x + ".repeat(5000), ")".repeat(5000));
        assert!(binary.parse::<Expr>().is_err());

        // Right at the bound still parses
        let depth = MAX_PARSE_DEPTH;
        let limit = format!("{}x{}", "exp(".repeat(depth - 1), ")".repeat(depth - 1));
        assert_eq!(limit.parse::<Expr>().unwrap().depth(), depth);
    }
}
