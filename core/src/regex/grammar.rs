//! Conformance gate for `isMatch` patterns.

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "regex/common_regex.pest"]
pub struct CommonRegexParser;

/// Whether `pattern` stays within the portable regex dialect.
pub fn is_common_regex(pattern: &str) -> bool {
    CommonRegexParser::parse(Rule::main, pattern).is_ok()
}
