//! Restricted evaluator for macro-expansion residue
//!
//! Kernel syscall macros expand to either a bare literal or a parenthesized
//! sum such as `(__NR_SYSCALL_BASE+ 5)` once the base has been substituted,
//! e.g. `((0x900000)+ 5)`. Only that additive shape is accepted: every
//! integer literal in the string is summed and the parentheses and `+`
//! tokens are ignored. Anything outside `()+0-9a-fx` and whitespace is
//! rejected rather than guessed at.

use crate::error::{NrError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static SIMPLE_SUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[()+0-9a-fx\s]*$").expect("SIMPLE_SUM is a valid regex"));

static LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9a-fx]+").expect("LITERAL is a valid regex"));

/// Parse a decimal or `0x`-prefixed hexadecimal integer literal
///
/// Returns `None` for anything else, including overflow of `u64`. A
/// multi-digit literal with a leading zero is C octal and is not accepted.
pub fn parse_literal(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return u64::from_str_radix(hex, 16).ok();
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// Collapse an additive literal expression into a single integer
///
/// # Example
/// ```
/// use nrgen::expr::eval_expr;
///
/// assert_eq!(eval_expr("((0x900000)+ 5)").unwrap(), 0x900005);
/// assert!(eval_expr("1<<2").is_err());
/// ```
pub fn eval_expr(expr: &str) -> Result<u64> {
    let unsupported = || NrError::UnsupportedExpression(expr.to_string());

    if !SIMPLE_SUM.is_match(expr) {
        return Err(unsupported());
    }

    LITERAL.find_iter(expr).try_fold(0u64, |acc, m| {
        let value = parse_literal(m.as_str()).ok_or_else(unsupported)?;
        acc.checked_add(value).ok_or_else(unsupported)
    })
}
