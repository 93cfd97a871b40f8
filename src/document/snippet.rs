//! Snippets: licensed parts of a file.

use super::NOASSERTION;
use crate::license::LicenseExpression;
use crate::pointer::{PointerKind, StartEndPointer};
use serde::Serialize;

/// A part of a file with its own licensing.
#[derive(Debug, Clone, Serialize)]
pub struct SpdxSnippet {
    /// `SPDXRef-` identifier of the snippet.
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,

    /// Name of the snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// SPDX id of the file the snippet comes from.
    #[serde(rename = "snippetFromFile", skip_serializing_if = "Option::is_none")]
    pub from_file: Option<String>,

    /// Where the snippet starts and ends, in bytes.
    #[serde(rename = "byteRange", skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<StartEndPointer>,

    /// Where the snippet starts and ends, in lines.
    #[serde(rename = "lineRange", skip_serializing_if = "Option::is_none")]
    pub line_range: Option<StartEndPointer>,

    /// The license the document's author concluded.
    #[serde(rename = "licenseConcluded")]
    pub license_concluded: LicenseExpression,

    /// Licenses seen in the snippet itself.
    #[serde(rename = "licenseInfoInSnippets", skip_serializing_if = "Vec::is_empty")]
    pub license_info_in_snippet: Vec<LicenseExpression>,

    /// How the concluded license was arrived at.
    #[serde(rename = "licenseComments", skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,

    /// Copyright notices in the snippet, or a sentinel.
    #[serde(rename = "copyrightText")]
    pub copyright_text: String,

    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SpdxSnippet {
    /// A snippet with only its identifier.
    pub fn new(spdx_id: impl Into<String>) -> Self {
        SpdxSnippet {
            spdx_id: spdx_id.into(),
            name: None,
            from_file: None,
            byte_range: None,
            line_range: None,
            license_concluded: LicenseExpression::NoAssertion,
            license_info_in_snippet: vec![],
            license_comments: None,
            copyright_text: NOASSERTION.to_string(),
            comment: None,
        }
    }

    /// Problems with the snippet's ranges.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = vec![];

        match &self.byte_range {
            Some(range) => self.verify_range("byte range", range, PointerKind::ByteOffset, &mut problems),
            None => problems.push("missing byte range".to_string()),
        }
        if let Some(range) = &self.line_range {
            self.verify_range("line range", range, PointerKind::LineChar, &mut problems);
        }
        if self.from_file.is_none() {
            problems.push("missing snippet-from-file".to_string());
        }

        problems
            .into_iter()
            .map(|p| format!("snippet {}: {}", self.spdx_id, p))
            .collect()
    }

    fn verify_range(
        &self,
        label: &str,
        range: &StartEndPointer,
        expected: PointerKind,
        problems: &mut Vec<String>,
    ) {
        let range_problems = range.verify();
        if !range_problems.is_empty() {
            problems.extend(range_problems.into_iter().map(|p| format!("{}: {}", label, p)));
            return;
        }
        if range.kind() != Some(expected) {
            problems.push(format!("{} uses the wrong pointer type", label));
        }
        let reference = range.start.as_ref().and_then(|p| p.reference());
        if reference != self.from_file.as_deref() {
            problems.push(format!("{} does not point into the snippet's file", label));
        }
    }
}
