//! Semantic checks over a complete document.
//!
//! Nothing here fails: every problem becomes a [`Warning`] and the caller
//! decides what to do with them.

use super::{SpdxDocument, SpdxFile, DATA_LICENSE, TIMESTAMP_FORMAT};
use crate::error::{Warning, WarningKind};
use crate::license::{LicenseExpression, LICENSE_REF_PREFIX};
use crate::verification;
use std::collections::BTreeSet;
use time::PrimitiveDateTime;
use url::Url;

/// Check `doc` and return every problem found, in document order.
pub fn verify_document(doc: &SpdxDocument) -> Vec<Warning> {
    let mut problems = vec![];

    verify_header(doc, &mut problems);
    verify_creation_info(doc, &mut problems);
    for review in &doc.reviewers {
        match &review.date {
            Some(date) if !is_timestamp(date) => problems.push(format!(
                "review by {}: invalid date '{}'",
                review.reviewer, date
            )),
            Some(_) => {}
            None => problems.push(format!("review by {}: missing date", review.reviewer)),
        }
    }
    for license in &doc.extracted_licenses {
        if !license.id.starts_with(LICENSE_REF_PREFIX) {
            problems.push(format!(
                "extracted license '{}' does not start with '{}'",
                license.id, LICENSE_REF_PREFIX
            ));
        }
        if license.text.trim().is_empty() {
            problems.push(format!("extracted license {}: missing text", license.id));
        }
    }
    verify_package(doc, &mut problems);
    for file in &doc.files {
        verify_file(file, &mut problems);
    }
    for snippet in &doc.snippets {
        problems.extend(snippet.verify());
    }
    for relationship in &doc.relationships {
        if relationship.element_id.is_empty() || relationship.related_element.is_empty() {
            problems.push(format!("relationship '{}' is incomplete", relationship));
        }
    }
    for annotation in &doc.annotations {
        let who = &annotation.annotator;
        match &annotation.date {
            Some(date) if !is_timestamp(date) => {
                problems.push(format!("annotation by {}: invalid date '{}'", who, date))
            }
            Some(_) => {}
            None => problems.push(format!("annotation by {}: missing date", who)),
        }
        if annotation.annotation_type.is_none() {
            problems.push(format!("annotation by {}: missing type", who));
        }
        if annotation.element_id.is_none() {
            problems.push(format!("annotation by {}: missing SPDX element id", who));
        }
        if annotation.comment.is_none() {
            problems.push(format!("annotation by {}: missing comment", who));
        }
    }

    let mut warnings: Vec<Warning> = problems.into_iter().map(Warning::verification).collect();
    warnings.extend(
        unknown_license_ids(doc)
            .into_iter()
            .map(|id| {
                Warning::new(
                    WarningKind::UnknownLicense,
                    format!("'{}' is not on the SPDX license list", id),
                )
            }),
    );
    warnings
}

fn verify_header(doc: &SpdxDocument, problems: &mut Vec<String>) {
    if doc.spdx_version.is_empty() {
        problems.push("missing SPDX version".to_string());
    } else if !doc.spdx_version.starts_with("SPDX-") {
        problems.push(format!(
            "SPDX version '{}' does not start with 'SPDX-'",
            doc.spdx_version
        ));
    }
    if doc.data_license != DATA_LICENSE {
        problems.push(format!(
            "data license is '{}' instead of {}",
            doc.data_license, DATA_LICENSE
        ));
    }
    if doc.namespace.is_empty() {
        problems.push("missing document namespace".to_string());
    } else if let Err(e) = Url::parse(&doc.namespace) {
        problems.push(format!("document namespace '{}' is not a URL: {}", doc.namespace, e));
    }
}

fn verify_creation_info(doc: &SpdxDocument, problems: &mut Vec<String>) {
    let info = &doc.creation_info;
    if info.creators.is_empty() {
        problems.push("missing creator".to_string());
    }
    if info.created.is_empty() {
        problems.push("missing creation date".to_string());
    } else if !is_timestamp(&info.created) {
        problems.push(format!(
            "creation date '{}' is not of the form YYYY-MM-DDThh:mm:ssZ",
            info.created
        ));
    }
}

fn verify_package(doc: &SpdxDocument, problems: &mut Vec<String>) {
    let package = match &doc.package {
        Some(package) => package,
        None => {
            problems.push("missing package".to_string());
            return;
        }
    };

    if package.name.trim().is_empty() {
        problems.push("package: missing name".to_string());
    }
    if package.download_location.trim().is_empty() {
        problems.push(format!("package {}: missing download location", package.name));
    }
    if let Some(sha1) = &package.sha1 {
        if !super::is_sha1_hex(sha1) {
            problems.push(format!("package {}: invalid SHA1 '{}'", package.name, sha1));
        }
    }

    let code = match &package.verification_code {
        Some(code) => code,
        None => {
            problems.push(format!("package {}: missing verification code", package.name));
            return;
        }
    };
    if !code.is_well_formed() {
        problems.push(format!(
            "package {}: malformed verification code '{}'",
            package.name, code.value
        ));
        return;
    }

    let files = doc.package_files();
    if !files.is_empty() && files.iter().all(|f| f.has_valid_sha1()) {
        let excluded: Vec<&str> = code.excluded_file_names.iter().map(String::as_str).collect();
        let expected = verification::generate(files, &excluded);
        if expected.value != code.value {
            problems.push(format!(
                "package {}: verification code {} does not match the files, expected {}",
                package.name, code.value, expected.value
            ));
        }
    }
}

fn verify_file(file: &SpdxFile, problems: &mut Vec<String>) {
    match &file.sha1 {
        None => problems.push(format!("file {}: missing SHA1", file.name)),
        Some(sha1) if !file.has_valid_sha1() => {
            problems.push(format!("file {}: invalid SHA1 '{}'", file.name, sha1))
        }
        Some(_) => {}
    }
    if file.copyright_text.trim().is_empty() {
        problems.push(format!("file {}: missing copyright text", file.name));
    }
    for project in &file.artifact_of {
        if let Some(uri) = &project.uri {
            if Url::parse(uri).is_err() {
                problems.push(format!(
                    "file {}: project {} has an invalid URI '{}'",
                    file.name, project.name, uri
                ));
            }
        }
    }
}

/// Whether `s` is an SPDX timestamp.
pub fn is_timestamp(s: &str) -> bool {
    PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT).is_ok()
}

/// Listed-license ids used in `doc` that the license list does not know.
fn unknown_license_ids(doc: &SpdxDocument) -> BTreeSet<String> {
    let mut expressions: Vec<&LicenseExpression> = vec![];
    if let Some(package) = &doc.package {
        expressions.push(&package.license_declared);
        expressions.push(&package.license_concluded);
        expressions.extend(&package.license_info_from_files);
    }
    for file in &doc.files {
        expressions.push(&file.license_concluded);
        expressions.extend(&file.license_info_in_file);
    }
    for snippet in &doc.snippets {
        expressions.push(&snippet.license_concluded);
        expressions.extend(&snippet.license_info_in_snippet);
    }

    expressions
        .into_iter()
        .flat_map(LicenseExpression::leaves)
        .filter_map(|leaf| match leaf {
            LicenseExpression::Simple { id } => Some(id),
            LicenseExpression::With { license, .. } => match license.as_ref() {
                LicenseExpression::Simple { id } => Some(id),
                _ => None,
            },
            _ => None,
        })
        .filter(|id| spdx::license_id(id.trim_end_matches('+')).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Creator, FileId, SpdxPackage};
    use crate::license::ExtractedLicense;
    use crate::verification::VerificationCode;

    const SHA_A: &str = "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12";
    const SHA_B: &str = "de9f2c7fd25e1b3afad3e85a0bd17d9b100db4b3";

    fn valid_doc() -> SpdxDocument {
        let mut doc = SpdxDocument {
            spdx_version: "SPDX-1.2".to_string(),
            namespace: "http://spdx.org/spdxdocs/demo".to_string(),
            ..Default::default()
        };
        doc.creation_info.creators.push(Creator::tool("spdx-tools"));
        doc.creation_info.created = "2024-03-01T12:30:05Z".to_string();

        let mut a = SpdxFile::new("./a.c");
        a.sha1 = Some(SHA_A.to_string());
        let mut b = SpdxFile::new("./b.c");
        b.sha1 = Some(SHA_B.to_string());
        let ids: Vec<FileId> = vec![doc.push_file(a), doc.push_file(b)];

        let mut package = SpdxPackage::new("demo");
        package.files = ids;
        package.license_declared = LicenseExpression::simple("MIT");
        package.verification_code = Some(verification::generate(&doc.files, &[] as &[&str]));
        doc.package = Some(package);
        doc
    }

    #[test]
    fn a_complete_document_is_clean() {
        assert_eq!(verify_document(&valid_doc()), vec![]);
    }

    #[test]
    fn header_problems_are_reported() {
        let mut doc = valid_doc();
        doc.spdx_version = "1.2".to_string();
        doc.data_license = "MIT".to_string();
        doc.namespace = "not a url".to_string();
        doc.creation_info.created = "yesterday".to_string();
        assert_eq!(verify_document(&doc).len(), 4);
    }

    #[test]
    fn stale_verification_codes_are_reported() {
        let mut doc = valid_doc();
        doc.package.as_mut().unwrap().verification_code = Some(VerificationCode {
            value: SHA_A.to_string(),
            excluded_file_names: Default::default(),
        });
        let warnings = verify_document(&doc);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("does not match"));
    }

    #[test]
    fn excluded_files_are_left_out_of_the_check() {
        let mut doc = valid_doc();
        let code = verification::generate(&doc.files[..1], &["./b.c"]);
        doc.package.as_mut().unwrap().verification_code = Some(code);
        assert_eq!(verify_document(&doc), vec![]);
    }

    #[test]
    fn file_checksums_are_checked() {
        let mut doc = valid_doc();
        doc.files[0].sha1 = None;
        doc.files[1].sha1 = Some("xyz".to_string());
        let messages: Vec<String> = verify_document(&doc).into_iter().map(|w| w.message).collect();
        assert_eq!(
            messages,
            vec![
                "file ./a.c: missing SHA1".to_string(),
                "file ./b.c: invalid SHA1 'xyz'".to_string(),
            ]
        );
    }

    #[test]
    fn unlisted_ids_are_unknown_licenses() {
        let mut doc = valid_doc();
        doc.files[0].license_concluded = LicenseExpression::Disjunction(vec![
            LicenseExpression::simple("Apache-2.0"),
            LicenseExpression::With {
                license: Box::new(LicenseExpression::simple("Not-A-License")),
                exception: "Classpath-exception-2.0".to_string(),
            },
        ]);
        doc.extracted_licenses.push(ExtractedLicense::new("LicenseRef-1", "text"));
        let warnings = verify_document(&doc);
        assert_eq!(
            warnings,
            vec![Warning::new(
                WarningKind::UnknownLicense,
                "'Not-A-License' is not on the SPDX license list"
            )]
        );
    }

    #[test]
    fn timestamps() {
        assert!(is_timestamp("2010-02-03T00:00:00Z"));
        assert!(!is_timestamp("2010-02-03"));
        assert!(!is_timestamp("2010-02-03T00:00:00"));
    }
}
