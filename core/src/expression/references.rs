//! Static extraction of the memory paths a tree reads.

use super::{Expression, ReturnType, expression_type};
use hashbrown::HashSet;

impl Expression {
    /// Memory paths this tree reads, e.g. `bag.list` and `bag.index` for
    /// `bag.list[bag.index - 2]`.
    ///
    /// Paths rooted at an iteration variable of `foreach`/`select`/`where`/
    /// `any`/`all` are local and left out. Order is unspecified.
    pub fn references(&self) -> Vec<String> {
        let (path, mut refs) = reference_walk(self);
        if let Some(path) = path {
            refs.insert(path);
        }
        refs.into_iter().collect()
    }
}

/// Returns the path being accumulated at `expr` (if it is still a pure
/// path) together with every completed reference beneath it.
fn reference_walk(expr: &Expression) -> (Option<String>, HashSet<String>) {
    let children = expr.children();
    let ty = expr.expr_type();

    if ty == expression_type::ACCESSOR {
        let prop = children.first().and_then(Expression::constant_text).unwrap_or_default();
        return match children.get(1) {
            None => (Some(prop.to_string()), HashSet::new()),
            Some(instance) => {
                let (path, refs) = reference_walk(instance);
                // `first(items).x` keeps `items` but never invents `x`.
                (path.map(|p| format!("{}.{}", p, prop)), refs)
            }
        };
    }

    if ty == expression_type::ELEMENT && children.len() == 2 {
        let (mut path, mut refs) = reference_walk(&children[0]);
        if let Some(p) = path.take() {
            match children[1].value() {
                Some(index) if children[1].return_type() == ReturnType::STRING => {
                    path = Some(format!("{}.{}", p, index));
                }
                Some(index) => path = Some(format!("{}[{}]", p, index)),
                None => {
                    refs.insert(p);
                }
            }
        }
        let (index_path, index_refs) = reference_walk(&children[1]);
        refs.extend(index_refs);
        refs.extend(index_path);
        return (path, refs);
    }

    if is_binding(ty) && children.len() == 3 {
        let mut refs = HashSet::new();
        let (source_path, source_refs) = reference_walk(&children[0]);
        refs.extend(source_refs);
        refs.extend(source_path);

        let iterator = children[1]
            .children()
            .first()
            .and_then(Expression::constant_text)
            .unwrap_or_default();
        let (body_path, mut body_refs) = reference_walk(&children[2]);
        body_refs.extend(body_path);
        refs.extend(body_refs.into_iter().filter(|r| !is_local(r, iterator)));
        return (None, refs);
    }

    let mut refs = HashSet::new();
    for child in children {
        let (path, child_refs) = reference_walk(child);
        refs.extend(child_refs);
        refs.extend(path);
    }
    (None, refs)
}

fn is_binding(ty: &str) -> bool {
    [
        expression_type::FOREACH,
        expression_type::SELECT,
        expression_type::WHERE,
        expression_type::ANY,
        expression_type::ALL,
    ]
    .contains(&ty)
}

fn is_local(reference: &str, iterator: &str) -> bool {
    reference == iterator
        || reference
            .strip_prefix(iterator)
            .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
}
