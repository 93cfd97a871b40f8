//! Text form of license expressions.
//!
//! Tokenizing and precedence are left to the `spdx` crate in lax mode, so
//! operators may be lower case and `WITH` exceptions are understood.
//! Terms missing from the license list, the `NOASSERTION` and `NONE`
//! sentinels among them, stand in as placeholder `LicenseRef-` terms while
//! the crate parses and are turned back into leaves afterwards.

use super::{ExtractedLicense, LicenseExpression, LICENSE_REF_PREFIX, NOASSERTION, NONE};
use spdx::error::Reason;
use spdx::expression::{ExprNode, Operator};
use spdx::{Expression, ParseMode};
use thiserror::Error;

const PLACEHOLDER_PREFIX: &str = "LicenseRef-spdx-tools-term-";

/// Why a license expression failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The text held no terms at all.
    #[error("empty license expression")]
    Empty,
    /// The terms did not form an expression.
    #[error("{0}")]
    Syntax(String),
    /// A `LicenseRef-` term with no extracted license behind it.
    #[error("license '{0}' is not declared")]
    Undeclared(String),
}

pub(super) fn parse<F>(text: &str, mut resolve: F) -> Result<LicenseExpression, ExpressionError>
where
    F: FnMut(&str) -> Option<ExtractedLicense>,
{
    if text.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }

    let (expression, terms) = parse_lax(text)?;

    // Nodes arrive in postfix order.
    let mut stack = vec![];
    for node in expression.iter() {
        match node {
            ExprNode::Req(req) => stack.push(requirement(&req.req.to_string(), &terms, &mut resolve)?),
            ExprNode::Op(Operator::And) => combine(&mut stack, true)?,
            ExprNode::Op(Operator::Or) => combine(&mut stack, false)?,
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(ExpressionError::Syntax(format!("malformed expression '{}'", text))),
    }
}

/// Parse `text`, swapping each unknown term for a placeholder until the
/// crate accepts it.
///
/// Returns the parsed expression and the swapped terms, indexed by the
/// number in their placeholder.
fn parse_lax(text: &str) -> Result<(Expression, Vec<String>), ExpressionError> {
    let mut source = text.to_string();
    let mut terms = vec![];

    loop {
        match Expression::parse_mode(&source, ParseMode::LAX) {
            Ok(expression) => return Ok((expression, terms)),
            Err(e) if matches!(e.reason, Reason::UnknownTerm) && !follows_with(&source[..e.span.start]) => {
                let span = e.span.clone();
                let placeholder = format!("{}{}", PLACEHOLDER_PREFIX, terms.len());
                terms.push(source[span.clone()].to_string());
                source.replace_range(span, &placeholder);
            }
            Err(e) => return Err(ExpressionError::Syntax(e.to_string())),
        }
    }
}

/// Whether the term after `before` is an exception name.
fn follows_with(before: &str) -> bool {
    before
        .split_whitespace()
        .last()
        .map_or(false, |word| word.eq_ignore_ascii_case("WITH"))
}

/// Turn the text of one requirement, `license [WITH exception]`, into a leaf.
fn requirement<F>(text: &str, terms: &[String], resolve: &mut F) -> Result<LicenseExpression, ExpressionError>
where
    F: FnMut(&str) -> Option<ExtractedLicense>,
{
    let (license, exception) = match text.split_once(" WITH ") {
        Some((license, exception)) => (license, Some(exception)),
        None => (text, None),
    };

    let leaf = match license.strip_prefix(PLACEHOLDER_PREFIX) {
        Some(index) => {
            let term = index
                .parse::<usize>()
                .ok()
                .and_then(|i| terms.get(i))
                .ok_or_else(|| ExpressionError::Syntax(format!("unknown term '{}'", license)))?;
            term_leaf(term)
        }
        None if license.starts_with(LICENSE_REF_PREFIX) => resolve(license)
            .map(LicenseExpression::Extracted)
            .ok_or_else(|| ExpressionError::Undeclared(license.to_string()))?,
        None => term_leaf(license),
    };

    Ok(match exception {
        Some(exception) => LicenseExpression::With {
            license: Box::new(leaf),
            exception: exception.to_string(),
        },
        None => leaf,
    })
}

fn term_leaf(term: &str) -> LicenseExpression {
    if term.eq_ignore_ascii_case(NOASSERTION) {
        LicenseExpression::NoAssertion
    } else if term.eq_ignore_ascii_case(NONE) {
        LicenseExpression::None
    } else {
        LicenseExpression::simple(term)
    }
}

/// Pop two operands and push them joined by an operator, flattening
/// operands that already use the same operator.
fn combine(stack: &mut Vec<LicenseExpression>, and: bool) -> Result<(), ExpressionError> {
    let (right, left) = match (stack.pop(), stack.pop()) {
        (Some(right), Some(left)) => (right, left),
        _ => return Err(ExpressionError::Syntax("operator is missing an operand".to_string())),
    };

    let mut members = vec![];
    for side in [left, right] {
        match side {
            LicenseExpression::Conjunction(inner) if and => members.extend(inner),
            LicenseExpression::Disjunction(inner) if !and => members.extend(inner),
            other => members.push(other),
        }
    }

    stack.push(if and {
        LicenseExpression::Conjunction(members)
    } else {
        LicenseExpression::Disjunction(members)
    });
    Ok(())
}
