//! Merging the files of several documents.

use crate::document::{DoapProject, FileId, SpdxDocument, SpdxFile};
use crate::license::{LicenseExpression, LicenseMapper, SourceId};
use std::collections::BTreeSet;

/// Copy `file` out of `source`, with its licenses mapped into the target.
///
/// Dependencies are dropped from the copy; they are indices into the
/// source document and have to be rebuilt against the merged file list.
pub fn remap_file(mapper: &LicenseMapper, source: SourceId, file: &SpdxFile) -> SpdxFile {
    let mut copy = SpdxFile {
        license_concluded: mapper.map_license_info(source, &file.license_concluded),
        license_info_in_file: vec![],
        dependencies: vec![],
        ..file.clone()
    };
    for license in &file.license_info_in_file {
        copy.add_seen_license(mapper.map_license_info(source, license));
    }
    copy
}

/// Merge the files of every document in `docs`, in order.
///
/// Each document is known to `mapper` by its position in `docs`. Files
/// equivalent to one already merged are dropped, after their projects and
/// dependencies are folded into the kept file. A dependency resolves to
/// wherever the file it named in its own document ended up.
pub fn merge_file_info(mapper: &LicenseMapper, docs: &[&SpdxDocument]) -> Vec<SpdxFile> {
    let mut merged: Vec<SpdxFile> = vec![];
    // For each document, the merged index of each of its files.
    let mut placements: Vec<Vec<usize>> = vec![];
    // For each merged file, its dependencies as (document, file in that document).
    let mut dependencies: Vec<Vec<(usize, FileId)>> = vec![];

    for (source, doc) in docs.iter().enumerate() {
        let mut placed = vec![];
        for file in &doc.files {
            let copy = remap_file(mapper, SourceId(source), file);

            let idx = match merged.iter().position(|kept| kept.equivalent(&copy)) {
                Some(idx) => {
                    log::debug!(
                        target: "spdx_tools",
                        "{} from {} is already merged",
                        file.name,
                        doc.label()
                    );
                    merge_doap_info(&mut merged[idx], &copy.artifact_of);
                    idx
                }
                None => {
                    merged.push(copy);
                    dependencies.push(vec![]);
                    merged.len() - 1
                }
            };

            for dep in file.dependencies.iter().map(|id| (source, *id)) {
                if !dependencies[idx].contains(&dep) {
                    dependencies[idx].push(dep);
                }
            }
            placed.push(idx);
        }
        placements.push(placed);
    }

    for (file, deps) in merged.iter_mut().zip(dependencies) {
        let mut resolved: Vec<FileId> = vec![];
        for (source, id) in deps {
            let target = placements.get(source).and_then(|placed| placed.get(id.0));
            match target {
                Some(&idx) if !resolved.contains(&FileId(idx)) => resolved.push(FileId(idx)),
                Some(_) => {}
                None => log::debug!(
                    target: "spdx_tools",
                    "dropping dangling dependency of {}",
                    file.name
                ),
            }
        }
        file.dependencies = resolved;
    }

    merged
}

/// Add the projects `file` does not list yet, comparing by name and home page.
pub fn merge_doap_info(file: &mut SpdxFile, projects: &[DoapProject]) {
    for project in projects {
        if !file.artifact_of.iter().any(|p| p.key() == project.key()) {
            file.artifact_of.push(project.clone());
        }
    }
}

/// The distinct licenses found in `files`, for the package summary.
///
/// Compound expressions contribute their leaves. Sentinels are left out
/// unless nothing else is found.
pub fn collect_lics_in_files(files: &[SpdxFile]) -> Vec<LicenseExpression> {
    let mut found: Vec<LicenseExpression> = vec![];

    let expressions = files
        .iter()
        .flat_map(|f| std::iter::once(&f.license_concluded).chain(&f.license_info_in_file));
    for leaf in expressions.flat_map(LicenseExpression::leaves) {
        if matches!(leaf, LicenseExpression::NoAssertion | LicenseExpression::None) {
            continue;
        }
        if !found.contains(leaf) {
            found.push(leaf.clone());
        }
    }

    if found.is_empty() {
        found.push(LicenseExpression::NoAssertion);
    }
    found
}

/// Names to leave out of the merged verification code.
///
/// These are files whose SHA-1 is missing or malformed, plus the names the
/// master document already excluded.
pub fn collect_skipped_files(files: &[SpdxFile], excluded: &BTreeSet<String>) -> Vec<String> {
    let mut skipped = excluded.clone();
    for file in files.iter().filter(|f| !f.has_valid_sha1()) {
        log::debug!(target: "spdx_tools", "skipping {} in the verification code", file.name);
        skipped.insert(file.name.clone());
    }
    skipped.into_iter().collect()
}
