use proptest::prelude::*;
use spdx_tools::license::{ExtractedLicense, LicenseExpression, LicenseMapper, SourceId};
use spdx_tools::SpdxDocument;

fn document(namespace: &str) -> SpdxDocument {
    SpdxDocument {
        namespace: namespace.to_string(),
        ..Default::default()
    }
}

fn expression() -> impl Strategy<Value = LicenseExpression> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["MIT", "Apache-2.0", "GPL-2.0-or-later", "BSD-3-Clause"])
            .prop_map(LicenseExpression::simple),
        (1u32..5, "[a-z ]{1,12}").prop_map(|(n, text)| {
            LicenseExpression::Extracted(ExtractedLicense::new(format!("LicenseRef-{}", n), text))
        }),
        Just(LicenseExpression::NoAssertion),
        Just(LicenseExpression::None),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|license| LicenseExpression::With {
                license: Box::new(license),
                exception: "Classpath-exception-2.0".to_string(),
            }),
            prop::collection::vec(inner.clone(), 2..4).prop_map(LicenseExpression::Conjunction),
            prop::collection::vec(inner, 2..4).prop_map(LicenseExpression::Disjunction),
        ]
    })
}

proptest! {
    #[test]
    fn unmapped_expressions_are_unchanged(expr in expression()) {
        let mapper = LicenseMapper::new();
        prop_assert_eq!(mapper.map_license_info(SourceId(1), &expr), expr);
    }

    #[test]
    fn equal_texts_share_one_id(text in "[a-zA-Z]{1,10}( [a-zA-Z]{1,10}){0,4}") {
        let mut mapper = LicenseMapper::new();
        let mut target = document("http://example.com/target");
        target.extracted_licenses.push(ExtractedLicense::new("LicenseRef-1", "Unrelated terms 1"));

        let spaced = text.replace(' ', "\n  ");

        let first = mapper.map_new_extracted_license(
            &mut target,
            SourceId(1),
            &ExtractedLicense::new("LicenseRef-1", text.clone()),
        );
        let second = mapper.map_new_extracted_license(
            &mut target,
            SourceId(2),
            &ExtractedLicense::new("LicenseRef-9", spaced),
        );

        prop_assert_eq!(&first.id, &second.id);
        prop_assert_eq!(target.extracted_licenses.len(), 2);
    }
}

#[test]
fn remap_table_lifecycle() {
    let mut mapper = LicenseMapper::new();
    let mut target = document("http://example.com/target");
    let mut source = document("http://example.com/source");
    let license = ExtractedLicense::new("LicenseRef-1", "terms");
    source.extracted_licenses.push(license.clone());

    assert!(mapper.is_remap_table_empty());
    mapper.map_document_licenses(&mut target, SourceId(1), &source).unwrap();
    assert!(mapper.doc_in_remap_table(SourceId(1)));
    assert!(!mapper.doc_in_remap_table(SourceId(0)));

    let mapped = mapper.map_license_info(SourceId(1), &LicenseExpression::Extracted(license));
    assert_eq!(mapped.to_string(), "LicenseRef-1");

    mapper.clear_remap_table();
    assert!(mapper.is_remap_table_empty());
    assert!(!mapper.doc_in_remap_table(SourceId(1)));
}
