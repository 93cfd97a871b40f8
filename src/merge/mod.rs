//! Combining several SPDX documents into one.
//!
//! The first document is the master: its package, license pool and
//! identifiers are kept, and the other documents are mapped into them.

use crate::document::{CreationInfo, Review, SpdxDocument};
use crate::error::Result;
use crate::license::{LicenseMapper, SourceId};

pub mod file;
pub mod package;

/// What the merged document says about itself.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Namespace of the merged document.
    pub namespace: String,
    /// Name of the merged document, defaulting to the master's.
    pub name: Option<String>,
    /// Creators and creation time of the merged document.
    pub creation_info: CreationInfo,
}

/// The result of a merge.
#[derive(Debug, Clone)]
pub struct Merged {
    /// The merged document.
    pub document: SpdxDocument,
    /// Files left out of the merged verification code.
    pub skipped_files: Vec<String>,
}

/// Merge `others` into a copy of `master`.
///
/// Fails if any document declares one license id with two different texts.
pub fn merge_documents(
    master: &SpdxDocument,
    others: &[SpdxDocument],
    options: MergeOptions,
) -> Result<Merged> {
    log::info!(
        target: "spdx_tools",
        "merging {} document(s) into '{}'",
        others.len(),
        master.label()
    );

    let mut target = SpdxDocument {
        spdx_version: master.spdx_version.clone(),
        data_license: master.data_license.clone(),
        spdx_id: master.spdx_id.clone(),
        name: options.name.or_else(|| master.name.clone()),
        namespace: options.namespace,
        comment: master.comment.clone(),
        creation_info: options.creation_info,
        reviewers: merge_reviewers(master, others),
        extracted_licenses: master.extracted_licenses.clone(),
        snippets: master.snippets.clone(),
        relationships: master.relationships.clone(),
        annotations: master.annotations.clone(),
        ..Default::default()
    };

    // The master is source 0, the others follow in order.
    let docs: Vec<&SpdxDocument> = std::iter::once(master).chain(others).collect();

    let mut mapper = LicenseMapper::new();
    for (i, doc) in docs.iter().enumerate() {
        mapper.map_document_licenses(&mut target, SourceId(i), doc)?;
    }

    target.files = file::merge_file_info(&mapper, &docs);

    let excluded = master
        .package
        .as_ref()
        .and_then(|pkg| pkg.verification_code.as_ref())
        .map(|code| code.excluded_file_names.clone())
        .unwrap_or_default();
    let skipped_files = file::collect_skipped_files(&target.files, &excluded);

    target.package = package::merge_package(&mapper, &docs, &target.files, &skipped_files);

    log::info!(
        target: "spdx_tools",
        "merged {} file(s) and {} extracted license(s), skipped {} file(s)",
        target.files.len(),
        target.extracted_licenses.len(),
        skipped_files.len()
    );

    Ok(Merged {
        document: target,
        skipped_files,
    })
}

fn merge_reviewers(master: &SpdxDocument, others: &[SpdxDocument]) -> Vec<Review> {
    let mut reviewers: Vec<Review> = vec![];
    for review in std::iter::once(master).chain(others).flat_map(|d| &d.reviewers) {
        if !reviewers.contains(review) {
            reviewers.push(review.clone());
        }
    }
    reviewers
}
