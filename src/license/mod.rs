//! License expressions and document-local extracted licenses.

use derive_builder::Builder;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

mod expression;
mod mapper;

pub use expression::ExpressionError;
pub use mapper::{LicenseMapper, SourceId};

/// Prefix of every document-local license identifier.
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";
/// The value stating that no claim is made.
pub const NOASSERTION: &str = "NOASSERTION";
/// The value stating that no license applies.
pub const NONE: &str = "NONE";

/// A license expression tree.
///
/// Trees are plain values: cloning copies the whole tree, and nothing in
/// this crate mutates a tree in place once it has been attached to an
/// element. Compound nodes are sets, so their equality ignores member order.
#[derive(Debug, Clone)]
pub enum LicenseExpression {
    /// A license from the SPDX license list, by its short identifier.
    Simple {
        /// The identifier as written, `+` suffix included.
        id: String,
    },
    /// A license local to the document, see [`ExtractedLicense`].
    Extracted(ExtractedLicense),
    /// A license granted with an exception, `license WITH exception`.
    With {
        /// The license the exception applies to.
        license: Box<LicenseExpression>,
        /// The exception's identifier.
        exception: String,
    },
    /// Every member applies.
    Conjunction(Vec<LicenseExpression>),
    /// Any one member applies.
    Disjunction(Vec<LicenseExpression>),
    /// `NOASSERTION`
    NoAssertion,
    /// `NONE`
    None,
}

impl LicenseExpression {
    /// A listed license leaf.
    pub fn simple(id: impl Into<String>) -> Self {
        LicenseExpression::Simple { id: id.into() }
    }

    /// Parse the text form of an expression.
    ///
    /// `resolve` is asked for the extracted license behind every
    /// `LicenseRef-` identifier; returning `None` fails the parse.
    pub fn parse<F>(text: &str, resolve: F) -> Result<Self, ExpressionError>
    where
        F: FnMut(&str) -> Option<ExtractedLicense>,
    {
        expression::parse(text, resolve)
    }

    /// Parse against a pool of extracted licenses.
    pub fn parse_with_pool(text: &str, pool: &[ExtractedLicense]) -> Result<Self, ExpressionError> {
        Self::parse(text, |id| pool.iter().find(|lic| lic.id == id).cloned())
    }

    /// Every leaf of the tree, left to right.
    ///
    /// A `WITH` node counts as one leaf.
    pub fn leaves(&self) -> Vec<&LicenseExpression> {
        let mut out = vec![];
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LicenseExpression>) {
        match self {
            LicenseExpression::Conjunction(members) | LicenseExpression::Disjunction(members) => {
                for member in members {
                    member.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    /// The extracted licenses referenced anywhere in the tree.
    pub fn extracted_licenses(&self) -> Vec<&ExtractedLicense> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                LicenseExpression::Extracted(lic) => Some(lic),
                LicenseExpression::With { license, .. } => match license.as_ref() {
                    LicenseExpression::Extracted(lic) => Some(lic),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }
}

impl PartialEq for LicenseExpression {
    fn eq(&self, other: &Self) -> bool {
        use LicenseExpression as L;

        match (self, other) {
            (L::Simple { id: a }, L::Simple { id: b }) => a.eq_ignore_ascii_case(b),
            (L::Extracted(a), L::Extracted(b)) => a == b,
            (
                L::With {
                    license: a,
                    exception: x,
                },
                L::With {
                    license: b,
                    exception: y,
                },
            ) => a == b && x.eq_ignore_ascii_case(y),
            (L::Conjunction(a), L::Conjunction(b)) | (L::Disjunction(a), L::Disjunction(b)) => {
                same_members(a, b)
            }
            (L::NoAssertion, L::NoAssertion) | (L::None, L::None) => true,
            _ => false,
        }
    }
}

impl Eq for LicenseExpression {}

/// Order-insensitive comparison of two member lists.
fn same_members(a: &[LicenseExpression], b: &[LicenseExpression]) -> bool {
    a.len() == b.len() && a.iter().all(|m| b.contains(m)) && b.iter().all(|m| a.contains(m))
}

impl Default for LicenseExpression {
    fn default() -> Self {
        LicenseExpression::NoAssertion
    }
}

impl Display for LicenseExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn members(f: &mut Formatter<'_>, items: &[LicenseExpression], op: &str) -> std::fmt::Result {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, ")")
        }

        match self {
            LicenseExpression::Simple { id } => write!(f, "{}", id),
            LicenseExpression::Extracted(lic) => write!(f, "{}", lic.id),
            LicenseExpression::With { license, exception } => write!(f, "{} WITH {}", license, exception),
            LicenseExpression::Conjunction(items) => members(f, items, "AND"),
            LicenseExpression::Disjunction(items) => members(f, items, "OR"),
            LicenseExpression::NoAssertion => write!(f, "{}", NOASSERTION),
            LicenseExpression::None => write!(f, "{}", NONE),
        }
    }
}

impl Serialize for LicenseExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A license whose text was extracted from the package itself.
///
/// The `id` is only unique within one document. Two extracted licenses are
/// equal when their texts are equal after whitespace normalization, whatever
/// their ids.
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[builder(setter(into), derive(Debug))]
pub struct ExtractedLicense {
    /// `LicenseRef-` identifier, unique within its document.
    #[serde(rename = "licenseId")]
    pub id: String,
    /// The license text.
    #[serde(rename = "extractedText")]
    pub text: String,
    /// Common name of the license.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form comment.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Where the license can be read.
    #[builder(default)]
    #[serde(rename = "seeAlsos", skip_serializing_if = "Vec::is_empty")]
    pub source_urls: Vec<String>,
}

impl ExtractedLicense {
    /// An extracted license with only its id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        ExtractedLicense {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// The text used for equality.
    pub fn normalized_text(&self) -> String {
        normalize_text(&self.text)
    }

    /// Copy the license under another identifier.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        ExtractedLicense {
            id: id.into(),
            ..self.clone()
        }
    }
}

impl PartialEq for ExtractedLicense {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_text() == other.normalized_text()
    }
}

impl Eq for ExtractedLicense {}

/// Collapse runs of whitespace, line endings included, to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The numeric suffix of a `LicenseRef-<n>` identifier.
pub fn license_ref_number(id: &str) -> Option<u64> {
    id.strip_prefix(LICENSE_REF_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_equality_ignores_id_and_whitespace() {
        let a = ExtractedLicense::new("LicenseRef-1", "Some license\r\n  text.");
        let b = ExtractedLicense::new("LicenseRef-7", "Some license text.\n");
        let c = ExtractedLicense::new("LicenseRef-1", "Other text");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn compound_equality_ignores_order() {
        let a = LicenseExpression::Conjunction(vec![
            LicenseExpression::simple("MIT"),
            LicenseExpression::simple("Apache-2.0"),
        ]);
        let b = LicenseExpression::Conjunction(vec![
            LicenseExpression::simple("Apache-2.0"),
            LicenseExpression::simple("MIT"),
        ]);
        let c = LicenseExpression::Disjunction(vec![
            LicenseExpression::simple("Apache-2.0"),
            LicenseExpression::simple("MIT"),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_renders_text_form() {
        let expr = LicenseExpression::Disjunction(vec![
            LicenseExpression::Conjunction(vec![
                LicenseExpression::simple("MIT"),
                LicenseExpression::Extracted(ExtractedLicense::new("LicenseRef-2", "x")),
            ]),
            LicenseExpression::NoAssertion,
        ]);
        assert_eq!(expr.to_string(), "((MIT AND LicenseRef-2) OR NOASSERTION)");
    }

    #[test]
    fn exceptions_are_part_of_a_leaf() {
        let lic = ExtractedLicense::new("LicenseRef-4", "Custom");
        let expr = LicenseExpression::Conjunction(vec![
            LicenseExpression::simple("MIT"),
            LicenseExpression::With {
                license: Box::new(LicenseExpression::Extracted(lic.clone())),
                exception: "Classpath-exception-2.0".to_string(),
            },
        ]);
        assert_eq!(expr.leaves().len(), 2);
        assert_eq!(expr.extracted_licenses(), vec![&lic]);
        assert_eq!(expr.to_string(), "(MIT AND LicenseRef-4 WITH Classpath-exception-2.0)");
    }

    #[test]
    fn license_ref_numbers() {
        assert_eq!(license_ref_number("LicenseRef-12"), Some(12));
        assert_eq!(license_ref_number("LicenseRef-abc"), None);
        assert_eq!(license_ref_number("MIT"), None);
    }

    #[test]
    fn builder_fills_optional_fields() {
        let lic = ExtractedLicenseBuilder::default()
            .id("LicenseRef-3")
            .text("text")
            .name("Custom")
            .build()
            .unwrap();
        assert_eq!(lic.name.as_deref(), Some("Custom"));
        assert!(lic.comment.is_none());
        assert!(lic.source_urls.is_empty());
    }
}
