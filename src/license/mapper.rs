//! Moving extracted licenses from one document's namespace into another's.

use super::{license_ref_number, ExtractedLicense, LicenseExpression, LICENSE_REF_PREFIX};
use crate::document::SpdxDocument;
use crate::error::{Error, Result};
use derive_more::Display;
use std::collections::HashMap;

/// Identifies one source document within a merge.
///
/// Namespaces are not trusted to tell documents apart, so callers number
/// their sources instead, usually by position in the merge.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "source {}", _0)]
pub struct SourceId(pub usize);

/// Remaps `LicenseRef-N` identifiers of source documents into a target.
///
/// The remap table is keyed by [`SourceId`] and the original identifier. It
/// belongs to one merge: build a fresh mapper (or call
/// [`LicenseMapper::clear_remap_table`]) before the next one.
#[derive(Debug, Default)]
pub struct LicenseMapper {
    remap: HashMap<SourceId, HashMap<String, ExtractedLicense>>,
}

impl LicenseMapper {
    /// A mapper with an empty remap table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring `license` from `source` into the pool of `target`.
    ///
    /// An entry of the target with the same normalized text is reused as
    /// is. Otherwise the license is copied under the next free
    /// `LicenseRef-N` id and appended to the target's pool. Either way the
    /// result is recorded against `(source, license.id)`.
    pub fn map_new_extracted_license(
        &mut self,
        target: &mut SpdxDocument,
        source: SourceId,
        license: &ExtractedLicense,
    ) -> ExtractedLicense {
        if let Some(mapped) = self.lookup(source, &license.id) {
            return mapped.clone();
        }

        let mapped = match target.extracted_licenses.iter().find(|l| *l == license) {
            Some(existing) => {
                log::debug!(
                    target: "spdx_tools",
                    "{} from {} has the same text as {}",
                    license.id,
                    source,
                    existing.id
                );
                existing.clone()
            }
            None => {
                let clone = license.with_id(next_license_ref(target));
                log::debug!(
                    target: "spdx_tools",
                    "{} from {} becomes {}",
                    license.id,
                    source,
                    clone.id
                );
                target.extracted_licenses.push(clone.clone());
                clone
            }
        };

        self.remap
            .entry(source)
            .or_default()
            .insert(license.id.clone(), mapped.clone());
        mapped
    }

    /// Map every extracted license of `doc`, known as `source`, into `target`.
    ///
    /// Fails if `doc` declares one id with two different texts.
    pub fn map_document_licenses(
        &mut self,
        target: &mut SpdxDocument,
        source: SourceId,
        doc: &SpdxDocument,
    ) -> Result<()> {
        let mut seen: HashMap<&str, &ExtractedLicense> = HashMap::new();
        for license in &doc.extracted_licenses {
            if let Some(previous) = seen.insert(&license.id, license) {
                if previous != license {
                    return Err(Error::AmbiguousLicenseId {
                        id: license.id.clone(),
                        document: doc.label().to_string(),
                    });
                }
            }
        }

        log::debug!(target: "spdx_tools", "{} is {}", doc.label(), source);
        for license in &doc.extracted_licenses {
            self.map_new_extracted_license(target, source, license);
        }
        Ok(())
    }

    /// Rewrite the extracted leaves of `expression` that came from `source`.
    ///
    /// Leaves with no entry in the remap table, and all other leaf kinds,
    /// are returned unchanged. The input is not modified.
    pub fn map_license_info(&self, source: SourceId, expression: &LicenseExpression) -> LicenseExpression {
        match expression {
            LicenseExpression::Conjunction(members) => LicenseExpression::Conjunction(
                members.iter().map(|m| self.map_license_info(source, m)).collect(),
            ),
            LicenseExpression::Disjunction(members) => LicenseExpression::Disjunction(
                members.iter().map(|m| self.map_license_info(source, m)).collect(),
            ),
            LicenseExpression::With { license, exception } => LicenseExpression::With {
                license: Box::new(self.map_license_info(source, license)),
                exception: exception.clone(),
            },
            LicenseExpression::Extracted(license) => match self.lookup(source, &license.id) {
                Some(mapped) => LicenseExpression::Extracted(mapped.clone()),
                None => expression.clone(),
            },
            leaf => leaf.clone(),
        }
    }

    /// Whether any license of `source` has been mapped.
    pub fn doc_in_remap_table(&self, source: SourceId) -> bool {
        self.remap
            .get(&source)
            .map_or(false, |entries| !entries.is_empty())
    }

    /// Whether nothing has been mapped yet.
    pub fn is_remap_table_empty(&self) -> bool {
        self.remap.values().all(HashMap::is_empty)
    }

    /// Forget every mapping, ready for another merge.
    pub fn clear_remap_table(&mut self) {
        self.remap.clear();
    }

    fn lookup(&self, source: SourceId, id: &str) -> Option<&ExtractedLicense> {
        self.remap.get(&source)?.get(id)
    }
}

/// The next `LicenseRef-N` not used in `doc`.
fn next_license_ref(doc: &SpdxDocument) -> String {
    let highest = doc
        .extracted_licenses
        .iter()
        .filter_map(|l| license_ref_number(&l.id))
        .max()
        .unwrap_or(0);
    format!("{}{}", LICENSE_REF_PREFIX, highest + 1)
}
