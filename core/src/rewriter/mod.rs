//! Boolean rewriting for rule matching.
//!
//! Two transformations over validated trees:
//!
//! - [`push_down_not`] moves negations to the leaves using De Morgan's laws
//!   and the registry's negation pairs (`<` and `>=`, `==` and `!=`, ...).
//! - [`disjunctive_normal_form`] then distributes `&&` over `||`, producing an
//!   OR of AND clauses.
//!
//! Rewritten trees share every untouched subtree with the input.
//!
//! ## Design Principles
//!
//! - **Equivalence**: the rewritten tree evaluates to the same boolean as the
//!   input for every memory.
//! - **Bounded**: distribution is exponential in the worst case, so the clause
//!   count is capped by [`RewriteOptions::max_clauses`].

use crate::api::RewriteOptions;
use crate::evaluator::{ExpressionError, Registry};
use crate::expression::{Expression, expression_type as ty};
use crate::values::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(test)]
mod rewriter_test;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("Disjunctive normal form needs more than {limit} clauses.")]
    TooManyClauses { limit: usize },
}

/// Push every negation down to the leaves.
///
/// `&&`/`||` swap under a negation, `!` flips it. A leaf under a negation is
/// replaced by its negation partner when the registry pairs it with another
/// evaluator, passes the negation into its children when it is paired with
/// itself (markers like `optional`), and is wrapped in `!` otherwise.
pub fn push_down_not(
    expr: &Expression,
    registry: &Registry,
) -> Result<Expression, ExpressionError> {
    push(expr, registry, false)
}

fn push(
    expr: &Expression,
    registry: &Registry,
    in_not: bool,
) -> Result<Expression, ExpressionError> {
    expr.ensure_valid()?;
    let kind = expr.expr_type();

    if kind == ty::AND || kind == ty::OR {
        let children = expr
            .children()
            .iter()
            .map(|child| push(child, registry, in_not))
            .collect::<Result<Vec<_>, _>>()?;
        return if (kind == ty::AND) != in_not {
            Expression::and(registry, children)
        } else {
            Expression::or(registry, children)
        };
    }

    if kind == ty::NOT {
        return push(&expr.children()[0], registry, !in_not);
    }

    if kind == ty::EXISTS {
        let op = if in_not { ty::EQUAL } else { ty::NOT_EQUAL };
        return Expression::make(
            registry,
            op,
            vec![expr.children()[0].clone(), Expression::constant(Value::Null)],
        );
    }

    if in_not {
        if let Some(Value::Bool(b)) = expr.value() {
            return Ok(Expression::constant(!*b));
        }
    }

    match registry.negation(kind) {
        Some(partner) if partner.name() == kind => {
            let children = expr
                .children()
                .iter()
                .map(|child| push(child, registry, in_not))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::from_evaluator(Arc::clone(expr.evaluator()), children))
        }
        Some(partner) if in_not => {
            Ok(Expression::from_evaluator(partner, expr.children().to_vec()))
        }
        None if in_not => Expression::not(registry, expr.clone()),
        _ => Ok(expr.clone()),
    }
}

type Clause = Vec<Expression>;

/// Rewrite into an OR of AND clauses.
///
/// A `false` constant removes the clauses of the branch it appears in and a
/// `true` constant contributes an empty clause. No clauses yield `false`, a
/// single clause is returned without the enclosing `||`.
pub fn disjunctive_normal_form(
    expr: &Expression,
    registry: &Registry,
    options: &RewriteOptions,
) -> Result<Expression, RewriteError> {
    let normal = push_down_not(expr, registry)?;
    let clauses = generate_clauses(&normal, options.max_clauses)?;
    trace!(clauses = clauses.len(), "Generated disjunctive normal form");

    let mut rendered = clauses
        .into_iter()
        .map(|clause| render_clause(clause, registry))
        .collect::<Result<Vec<_>, _>>()?;
    match rendered.len() {
        0 => Ok(Expression::constant(false)),
        1 => Ok(rendered.remove(0)),
        _ => Ok(Expression::or(registry, rendered)?),
    }
}

fn render_clause(mut clause: Clause, registry: &Registry) -> Result<Expression, ExpressionError> {
    match clause.len() {
        0 => Ok(Expression::constant(true)),
        1 => Ok(clause.remove(0)),
        _ => Expression::and(registry, clause),
    }
}

fn check_limit(count: usize, limit: Option<usize>) -> Result<(), RewriteError> {
    match limit {
        Some(limit) if count > limit => {
            debug!(count, limit, "Disjunctive normal form exceeds the clause limit");
            Err(RewriteError::TooManyClauses { limit })
        }
        _ => Ok(()),
    }
}

fn generate_clauses(expr: &Expression, limit: Option<usize>) -> Result<Vec<Clause>, RewriteError> {
    let kind = expr.expr_type();

    if kind == ty::AND {
        let mut so_far: Vec<Clause> = vec![Vec::new()];
        for child in expr.children() {
            let clauses = generate_clauses(child, limit)?;
            if clauses.is_empty() {
                return Ok(Vec::new());
            }
            check_limit(so_far.len().saturating_mul(clauses.len()), limit)?;
            so_far = so_far
                .iter()
                .flat_map(|old| {
                    clauses.iter().map(move |clause| {
                        let mut combined = Vec::with_capacity(old.len() + clause.len());
                        combined.extend(old.iter().cloned());
                        combined.extend(clause.iter().cloned());
                        combined
                    })
                })
                .collect();
        }
        return Ok(so_far);
    }

    if kind == ty::OR {
        let mut all = Vec::new();
        for child in expr.children() {
            all.extend(generate_clauses(child, limit)?);
            check_limit(all.len(), limit)?;
        }
        return Ok(all);
    }

    Ok(match expr.value() {
        Some(Value::Bool(true)) => vec![Vec::new()],
        Some(Value::Bool(false)) => Vec::new(),
        _ => vec![vec![expr.clone()]],
    })
}
