use spdx_tools::error::Error;
use spdx_tools::license::LicenseExpression;
use spdx_tools::{format, parse_document, Format, Parsed, TagTable, WarningKind};
use std::fs::File;
use std::path::Path;

fn fixture(name: &str) -> File {
    File::open(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)).unwrap()
}

fn parse_fixture(name: &str) -> Parsed {
    parse_document(fixture(name), &TagTable::default()).unwrap()
}

#[test]
fn a_complete_document_has_no_warnings() {
    let parsed = parse_fixture("package.spdx");
    assert_eq!(parsed.warnings, vec![]);

    let doc = parsed.document;
    assert_eq!(doc.name.as_deref(), Some("package"));
    assert_eq!(doc.creation_info.creators.len(), 2);
    assert_eq!(doc.extracted_licenses.len(), 1);
    assert_eq!(doc.files.len(), 2);
    assert_eq!(doc.relationships.len(), 1);

    let package = doc.package.as_ref().unwrap();
    assert_eq!(package.name, "package");
    assert_eq!(package.files.len(), 2);
    assert_eq!(package.license_concluded.to_string(), "(MIT AND LicenseRef-1)");

    let a = &doc.files[0];
    assert_eq!(a.spdx_id.as_deref(), Some("SPDXRef-File1"));
    assert_eq!(a.dependencies.len(), 1);
    assert_eq!(doc.file(a.dependencies[0]).unwrap().name, "./src/b.c");
}

#[test]
fn comment_lines_inside_text_are_data() {
    let doc = parse_fixture("package.spdx").document;
    assert_eq!(
        doc.extracted_licenses[0].text,
        "Permission is granted to use this file\n# for any purpose."
    );
}

#[test]
fn extracted_licenses_are_shared_with_expressions() {
    let doc = parse_fixture("package.spdx").document;
    match &doc.files[1].license_concluded {
        LicenseExpression::Extracted(lic) => assert_eq!(lic, &doc.extracted_licenses[0]),
        other => panic!("expected an extracted license, got {:?}", other),
    }
}

#[test]
fn a_missing_dependency_is_one_warning() {
    let parsed = parse_fixture("dangling.spdx");
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].kind, WarningKind::UnresolvedDependency);
    assert!(parsed.warnings[0].message.contains("./src/missing.c"));
    assert!(parsed.document.files[0].dependencies.is_empty());
}

#[test]
fn undeclared_license_refs_are_fatal() {
    let err = parse_document(fixture("broken.spdx"), &TagTable::default()).unwrap_err();
    match err {
        Error::UndeclaredLicense { id, line } => {
            assert_eq!(id, "LicenseRef-9");
            assert_eq!(line, 7);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn aliases_extend_the_default_tags() {
    let text = "\
SPDXVersion: SPDX-1.2
DataLicense: CC0-1.0
DocumentNamespace: http://spdx.org/spdxdocs/alias
FileName: ./a.c
FileSHA1: 2fd4e1c67a2d28fced849ee1bb76e7391b93eb12
";
    assert!(parse_document(text.as_bytes(), &TagTable::default()).is_err());

    let table = TagTable::default().with_alias("FileSHA1", spdx_tools::tagvalue::Tag::FileChecksum);
    let doc = parse_document(text.as_bytes(), &table).unwrap().document;
    assert_eq!(
        doc.files[0].sha1.as_deref(),
        Some("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
    );
}

#[test]
fn written_documents_read_back_the_same() {
    let original = parse_fixture("package.spdx").document;

    let mut written = vec![];
    format::write(&mut written, &original, Format::KeyValue).unwrap();
    let reread = parse_document(written.as_slice(), &TagTable::default()).unwrap();

    assert_eq!(reread.warnings, vec![]);
    assert_eq!(
        serde_json::to_value(&reread.document).unwrap(),
        serde_json::to_value(&original).unwrap()
    );
}

#[test]
fn json_output_names_fields_like_spdx() {
    let doc = parse_fixture("source.spdx").document;

    let mut written = vec![];
    format::write(&mut written, &doc, Format::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&written).unwrap();

    assert_eq!(value["spdxVersion"], "SPDX-1.2");
    assert_eq!(value["documentNamespace"], "http://spdx.org/spdxdocs/source-2.0");
}
