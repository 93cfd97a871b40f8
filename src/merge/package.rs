//! Merging the package-level summary of several documents.

use super::file::collect_lics_in_files;
use crate::document::{FileId, SpdxDocument, SpdxFile, SpdxPackage, NOASSERTION};
use crate::license::{LicenseMapper, SourceId, NONE};
use crate::verification;

/// Build the merged package from the first document in `docs` that has one.
///
/// Each document is known to `mapper` by its position in `docs`. The package owns every file in `files`. Its license summary and
/// verification code are recomputed from them, leaving `skipped` out of
/// the code.
pub fn merge_package(
    mapper: &LicenseMapper,
    docs: &[&SpdxDocument],
    files: &[SpdxFile],
    skipped: &[String],
) -> Option<SpdxPackage> {
    let (base_source, base) = docs
        .iter()
        .enumerate()
        .find_map(|(i, doc)| doc.package.as_ref().map(|pkg| (SourceId(i), pkg)))?;

    let mut package = SpdxPackage {
        sha1: None,
        license_declared: mapper.map_license_info(base_source, &base.license_declared),
        license_concluded: mapper.map_license_info(base_source, &base.license_concluded),
        license_info_from_files: collect_lics_in_files(files),
        copyright_text: merge_copyright(docs),
        verification_code: Some(verification::generate(files, skipped)),
        files: (0..files.len()).map(FileId).collect(),
        ..base.clone()
    };
    translate_sub_declared_lics_into_comments(mapper, &mut package, base_source, docs);

    Some(package)
}

/// Record the declared licenses of the other packages as license comments.
///
/// Only licenses that differ from the merged package's declared license
/// are recorded, each naming the document it came from.
pub fn translate_sub_declared_lics_into_comments(
    mapper: &LicenseMapper,
    package: &mut SpdxPackage,
    base: SourceId,
    docs: &[&SpdxDocument],
) {
    for (source, doc) in docs.iter().enumerate().map(|(i, doc)| (SourceId(i), doc)) {
        if source == base {
            continue;
        }
        let sub = match &doc.package {
            Some(sub) => sub,
            None => continue,
        };

        let declared = mapper.map_license_info(source, &sub.license_declared);
        if declared == package.license_declared {
            continue;
        }
        package.append_license_comment(&format!(
            "Package {} from document {} ({}) declares the license {}.",
            sub.name,
            doc.name.as_deref().unwrap_or(NOASSERTION),
            doc.namespace,
            declared
        ));
    }
}

/// Join the distinct package copyright texts of `docs`.
///
/// `NOASSERTION` and `NONE` are not copyright texts; if no document has
/// anything else the result is `NOASSERTION`.
pub fn merge_copyright(docs: &[&SpdxDocument]) -> String {
    let mut texts: Vec<&str> = vec![];
    for package in docs.iter().filter_map(|doc| doc.package.as_ref()) {
        let text = package.copyright_text.trim();
        if text.is_empty() || text == NOASSERTION || text == NONE {
            continue;
        }
        if !texts.contains(&text) {
            texts.push(text);
        }
    }

    if texts.is_empty() {
        NOASSERTION.to_string()
    } else {
        texts.join("\n")
    }
}
