use spdx_tools::document::{CreationInfo, Creator};
use spdx_tools::{format, merge_documents, parse_document, Format, MergeOptions, SpdxDocument, TagTable};
use std::fs::File;
use std::path::Path;

fn load(name: &str) -> SpdxDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    parse_document(File::open(path).unwrap(), &TagTable::default())
        .unwrap()
        .document
}

fn options() -> MergeOptions {
    MergeOptions {
        namespace: "http://spdx.org/spdxdocs/merged".to_string(),
        name: None,
        creation_info: CreationInfo {
            creators: vec![Creator::tool("spdx-tools")],
            created: "2024-04-01T00:00:00Z".to_string(),
            ..Default::default()
        },
    }
}

#[test]
fn conflicting_license_ids_are_renumbered() {
    let merged = merge_documents(&load("package.spdx"), &[load("source.spdx")], options())
        .unwrap()
        .document;

    let licenses: Vec<(&str, &str)> = merged
        .extracted_licenses
        .iter()
        .map(|l| (l.id.as_str(), l.text.as_str()))
        .collect();
    assert_eq!(
        licenses,
        vec![
            ("LicenseRef-1", "Permission is granted to use this file\n# for any purpose."),
            ("LicenseRef-2", "A different license that happens to share an id."),
        ]
    );

    let names: Vec<&str> = merged.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["./src/a.c", "./src/b.c", "./src/c.c"]);
    assert_eq!(merged.files[1].license_concluded.to_string(), "LicenseRef-1");
    assert_eq!(merged.files[2].license_concluded.to_string(), "LicenseRef-2");
    assert_eq!(merged.name.as_deref(), Some("package"));
}

#[test]
fn the_merged_package_is_recomputed() {
    let merged = merge_documents(&load("package.spdx"), &[load("source.spdx")], options()).unwrap();
    assert!(merged.skipped_files.is_empty());

    let package = merged.document.package.unwrap();
    assert_eq!(package.name, "package");
    assert_eq!(package.files.len(), 3);
    assert_eq!(
        package.verification_code.unwrap().value,
        "f37c1dcbc4cfd31dc1759d13ae2a4ca895a914e6"
    );
    assert_eq!(
        package.copyright_text,
        "Copyright 2024 Jane Doe\nCopyright 2023 Source Authors"
    );
    assert_eq!(
        package.license_comments.as_deref(),
        Some(
            "Package source from document source (http://spdx.org/spdxdocs/source-2.0) \
             declares the license Apache-2.0."
        )
    );
    assert_eq!(merged.document.reviewers.len(), 1);
}

#[test]
fn merged_output_is_a_clean_document() {
    let merged = merge_documents(&load("package.spdx"), &[load("source.spdx")], options())
        .unwrap()
        .document;

    let mut written = vec![];
    format::write(&mut written, &merged, Format::KeyValue).unwrap();
    let reread = parse_document(written.as_slice(), &TagTable::default()).unwrap();

    assert_eq!(reread.warnings, vec![]);
    assert_eq!(reread.document.files.len(), 3);
    assert_eq!(reread.document.namespace, "http://spdx.org/spdxdocs/merged");
}

#[test]
fn merging_a_document_with_itself_keeps_one_copy() {
    let package = load("package.spdx");
    let copy = package.clone();

    let merged = merge_documents(&package, &[copy], options()).unwrap().document;
    assert_eq!(merged.extracted_licenses.len(), 1);
    assert_eq!(merged.files.len(), 2);
    assert_eq!(merged.files[0].dependencies.len(), 1);
}

#[test]
fn sources_without_namespaces_keep_their_own_licenses() {
    use spdx_tools::document::SpdxFile;
    use spdx_tools::{ExtractedLicense, LicenseExpression};

    fn source(file: &str, text: &str) -> SpdxDocument {
        let lic = ExtractedLicense::new("LicenseRef-1", text);
        let mut doc = SpdxDocument {
            extracted_licenses: vec![lic.clone()],
            ..Default::default()
        };
        let mut file = SpdxFile::new(file);
        file.license_concluded = LicenseExpression::Extracted(lic);
        doc.push_file(file);
        doc
    }

    let master = SpdxDocument::default();
    let a = source("./a.c", "alpha terms");
    let b = source("./b.c", "beta terms");
    assert_eq!(a.namespace, b.namespace);

    let merged = merge_documents(&master, &[a, b], options()).unwrap().document;
    let pool: Vec<&str> = merged.extracted_licenses.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(pool, vec!["alpha terms", "beta terms"]);

    for (name, text) in [("./a.c", "alpha terms"), ("./b.c", "beta terms")] {
        let file = merged.file(merged.find_file_by_name(name).unwrap()).unwrap();
        let lic = &file.license_concluded.extracted_licenses()[0];
        assert_eq!(lic.text, text);
        assert_eq!(merged.extracted_license(&lic.id).unwrap().text, text);
    }
}
