//! Builtin function library.
//!
//! Builtins are grouped into packages that each register their evaluators
//! with a [`RegistryBuilder`]:
//! - Math: arithmetic, aggregation, rounding
//! - Logic: comparison, boolean operators, `if`, `coalesce`, markers
//! - String: text manipulation
//! - Collection: list operations and the iteration builtins
//! - DateTime: timestamps, time zones and .NET style formats
//! - Conversion: casts, encodings and URI parts
//! - Object: memory access, property manipulation and JSON paths
//! - Predicates: runtime type checks and `isMatch`
//!
//! Aliases and negation pairs are declared here, after every package is in
//! place.

use crate::api::Options;
use crate::evaluator::{EvalError, RegistryBuilder};
use crate::expression::{constant_evaluator, expression_type as ty};
use crate::locale::{Culture, lookup_culture};
use crate::values::Value;
use tracing::warn;

pub mod collection;
pub mod conversion;
pub mod datetime;
pub mod logic;
pub mod math;
pub mod object;
pub mod predicates;
pub mod string;

pub use collection::register_collection_package;
pub use conversion::register_conversion_package;
pub use datetime::register_datetime_package;
pub use logic::register_logic_package;
pub use math::register_math_package;
pub use object::register_object_package;
pub use predicates::register_predicates_package;
pub use string::register_string_package;

const ALIASES: &[(&str, &str)] = &[
    ("add", ty::ADD),
    ("sub", ty::SUBTRACT),
    ("mul", ty::MULTIPLY),
    ("div", ty::DIVIDE),
    ("exp", ty::POWER),
    ("mod", ty::MOD),
    ("and", ty::AND),
    ("or", ty::OR),
    ("not", ty::NOT),
    ("equals", ty::EQUAL),
    ("greater", ty::GREATER_THAN),
    ("greaterOrEquals", ty::GREATER_THAN_OR_EQUAL),
    ("less", ty::LESS_THAN),
    ("lessOrEquals", ty::LESS_THAN_OR_EQUAL),
    ("&", ty::CONCAT),
    ("??", ty::COALESCE),
];

const NEGATIONS: &[(&str, &str)] = &[
    (ty::LESS_THAN, ty::GREATER_THAN_OR_EQUAL),
    (ty::LESS_THAN_OR_EQUAL, ty::GREATER_THAN),
    (ty::EQUAL, ty::NOT_EQUAL),
    (ty::OPTIONAL, ty::OPTIONAL),
    (ty::IGNORE, ty::IGNORE),
];

/// Register every builtin package, alias and negation pair.
pub fn register_builtins(builder: &mut RegistryBuilder) {
    builder.add(constant_evaluator());

    register_math_package(builder);
    register_logic_package(builder);
    register_string_package(builder);
    register_collection_package(builder);
    register_datetime_package(builder);
    register_conversion_package(builder);
    register_object_package(builder);
    register_predicates_package(builder);

    for (alias, target) in ALIASES {
        if let Err(err) = builder.alias(alias, target) {
            warn!(alias = *alias, error = %err, "Skipping builtin alias");
        }
    }
    for (a, b) in NEGATIONS {
        builder.pair_negations(a, b);
    }
}

/// Culture for a builtin: the explicit locale argument, else the options'
/// locale, else the default culture.
pub(crate) fn resolve_culture(
    explicit: Option<&Value>,
    options: &Options,
) -> Result<&'static Culture, EvalError> {
    match explicit {
        Some(Value::Text(name)) => Ok(lookup_culture(name)?),
        Some(other) => Err(EvalError::new(format!("{} should be a locale string.", other))),
        None => match &options.locale {
            Some(name) => Ok(lookup_culture(name)?),
            None => Ok(Culture::default_culture()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Registry;

    #[test]
    fn test_every_alias_resolves() {
        let registry = Registry::new();
        for (alias, target) in ALIASES {
            let evaluator = registry
                .lookup(alias)
                .unwrap_or_else(|| panic!("missing alias {}", alias));
            assert_eq!(evaluator.name(), *target);
        }
    }

    #[test]
    fn test_catalogue_is_registered() {
        let registry = Registry::new();
        for name in [
            "+", "average", "range", "rand", "exists", "coalesce", "ignore", "concat", "EOL",
            "titleCase", "foreach", "indicesAndValues", "createArray", "addToTime", "formatTicks",
            "convertToUTC", "base64ToString", "stringOrValue", "uriPathAndQuery", "Accessor",
            "Element", "setPathToValue", "jPath", "isMatch", "isDateTime", "Constant",
        ] {
            assert!(registry.is_builtin(name), "{} is not registered", name);
        }
    }
}
