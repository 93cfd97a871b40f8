//! Writes the tag-value format out.

use crate::document::SpdxDocument;
use crate::error::Result;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Convenience macro to provide uniform field-writing syntax.
///
/// It provides a uniform calling construct to write out regular, optional,
/// iterable and free-text fields, so the body of `write` reads like the
/// file it produces.
macro_rules! write_field {
    // Write out a single field.
    ( $f:ident, $fmt:literal, $field:expr ) => {
        writeln!($f, $fmt, $field)?
    };

    // Write out an optional field.
    ( @opt, $f:ident, $fmt:literal, $field:expr ) => {
        if let Some(field) = &$field {
            write_field!($f, $fmt, field);
        }
    };

    // Write out an iterable field.
    ( @all, $f:ident, $fmt:literal, $field:expr ) => {
        for item in &$field {
            write_field!($f, $fmt, item);
        }
    };

    // Write out a free-text field, wrapped in `<text>` when needed.
    ( @text, $f:ident, $fmt:literal, $field:expr ) => {
        write_field!($f, $fmt, Text(&$field))
    };

    // Write out an optional free-text field.
    ( @opt_text, $f:ident, $fmt:literal, $field:expr ) => {
        if let Some(field) = &$field {
            write_field!(@text, $f, $fmt, field);
        }
    };
}

/// A value that is written inside `<text>` markers if it would not survive
/// being read back as a plain single-line value.
struct Text<'a>(&'a str);

impl Display for Text<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        let plain = !s.contains(|c: char| c == '\n' || c == '\r')
            && !s.contains("<text>")
            && !s.contains("</text>")
            && !s.starts_with("SHA1: ")
            && s.trim() == s;

        if plain {
            write!(f, "{}", s)
        } else {
            write!(f, "<text>{}</text>", s)
        }
    }
}

/// Write `doc` as tag-value text.
pub fn write<W: Write>(mut w: W, doc: &SpdxDocument) -> Result<()> {
    write_field!(w, "SPDXVersion: {}", doc.spdx_version);
    write_field!(w, "DataLicense: {}", doc.data_license);
    write_field!(w, "SPDXID: {}", doc.spdx_id);
    write_field!(@opt, w, "DocumentName: {}", doc.name);
    write_field!(w, "DocumentNamespace: {}", doc.namespace);
    write_field!(@opt_text, w, "DocumentComment: {}", doc.comment);

    let info = &doc.creation_info;
    writeln!(w, "\n## Creation Information")?;
    write_field!(@opt, w, "LicenseListVersion: {}", info.license_list_version);
    write_field!(@all, w, "Creator: {}", info.creators);
    write_field!(w, "Created: {}", info.created);
    write_field!(@opt_text, w, "CreatorComment: {}", info.comment);

    if !doc.reviewers.is_empty() {
        writeln!(w, "\n## Review Information")?;
    }
    for review in &doc.reviewers {
        write_field!(w, "Reviewer: {}", review.reviewer);
        write_field!(@opt, w, "ReviewDate: {}", review.date);
        write_field!(@opt_text, w, "ReviewComment: {}", review.comment);
    }

    if !doc.extracted_licenses.is_empty() {
        writeln!(w, "\n## License Information")?;
    }
    for license in &doc.extracted_licenses {
        write_field!(w, "LicenseID: {}", license.id);
        write_field!(@text, w, "ExtractedText: {}", license.text);
        write_field!(@opt, w, "LicenseName: {}", license.name);
        if !license.source_urls.is_empty() {
            write_field!(w, "LicenseCrossReference: {}", license.source_urls.join(", "));
        }
        write_field!(@opt_text, w, "LicenseComment: {}", license.comment);
    }

    if let Some(pkg) = &doc.package {
        writeln!(w, "\n## Package Information")?;
        write_field!(w, "PackageName: {}", pkg.name);
        write_field!(@opt, w, "SPDXID: {}", pkg.spdx_id);
        write_field!(@opt, w, "PackageVersion: {}", pkg.version);
        write_field!(@opt, w, "PackageFileName: {}", pkg.file_name);
        write_field!(@opt, w, "PackageSupplier: {}", pkg.supplier);
        write_field!(@opt, w, "PackageOriginator: {}", pkg.originator);
        write_field!(w, "PackageDownloadLocation: {}", pkg.download_location);
        write_field!(@opt, w, "PackageVerificationCode: {}", pkg.verification_code);
        write_field!(@opt, w, "PackageChecksum: SHA1: {}", pkg.sha1);
        write_field!(@opt, w, "PackageHomePage: {}", pkg.home_page);
        write_field!(@opt_text, w, "PackageSourceInfo: {}", pkg.source_info);
        write_field!(w, "PackageLicenseConcluded: {}", pkg.license_concluded);
        write_field!(@all, w, "PackageLicenseInfoFromFiles: {}", pkg.license_info_from_files);
        write_field!(w, "PackageLicenseDeclared: {}", pkg.license_declared);
        write_field!(@opt_text, w, "PackageLicenseComments: {}", pkg.license_comments);
        write_field!(@text, w, "PackageCopyrightText: {}", pkg.copyright_text);
        write_field!(@opt_text, w, "PackageSummary: {}", pkg.summary);
        write_field!(@opt_text, w, "PackageDescription: {}", pkg.description);
    }

    for file in &doc.files {
        writeln!(w, "\n## File Information")?;
        write_field!(w, "FileName: {}", file.name);
        write_field!(@opt, w, "SPDXID: {}", file.spdx_id);
        write_field!(@all, w, "FileType: {}", file.file_types);
        write_field!(@opt, w, "FileChecksum: SHA1: {}", file.sha1);
        for (algorithm, digest) in &file.checksums {
            writeln!(w, "FileChecksum: {}: {}", algorithm, digest)?;
        }
        write_field!(w, "LicenseConcluded: {}", file.license_concluded);
        write_field!(@all, w, "LicenseInfoInFile: {}", file.license_info_in_file);
        write_field!(@opt_text, w, "LicenseComments: {}", file.license_comments);
        write_field!(@text, w, "FileCopyrightText: {}", file.copyright_text);
        write_field!(@opt_text, w, "FileComment: {}", file.comment);
        write_field!(@opt_text, w, "FileNotice: {}", file.notice);
        for contributor in &file.contributors {
            write_field!(@text, w, "FileContributor: {}", contributor);
        }
        for dependency in file.dependencies.iter().filter_map(|id| doc.file(*id)) {
            write_field!(w, "FileDependency: {}", dependency.name);
        }
        for project in &file.artifact_of {
            write_field!(w, "ArtifactOfProjectName: {}", project.name);
            write_field!(@opt, w, "ArtifactOfProjectHomePage: {}", project.home_page);
            write_field!(@opt, w, "ArtifactOfProjectURI: {}", project.uri);
        }
    }

    for snippet in &doc.snippets {
        writeln!(w, "\n## Snippet Information")?;
        write_field!(w, "SnippetSPDXID: {}", snippet.spdx_id);
        write_field!(@opt, w, "SnippetName: {}", snippet.name);
        write_field!(@opt, w, "SnippetFromFileSPDXID: {}", snippet.from_file);
        write_field!(@opt, w, "SnippetByteRange: {}", snippet.byte_range);
        write_field!(@opt, w, "SnippetLineRange: {}", snippet.line_range);
        write_field!(w, "SnippetLicenseConcluded: {}", snippet.license_concluded);
        write_field!(@all, w, "LicenseInfoInSnippet: {}", snippet.license_info_in_snippet);
        write_field!(@opt_text, w, "SnippetLicenseComments: {}", snippet.license_comments);
        write_field!(@text, w, "SnippetCopyrightText: {}", snippet.copyright_text);
        write_field!(@opt_text, w, "SnippetComment: {}", snippet.comment);
    }

    if !doc.relationships.is_empty() {
        writeln!(w, "\n## Relationships")?;
    }
    for relationship in &doc.relationships {
        write_field!(w, "Relationship: {}", relationship);
        write_field!(@opt_text, w, "RelationshipComment: {}", relationship.comment);
    }

    if !doc.annotations.is_empty() {
        writeln!(w, "\n## Annotations")?;
    }
    for annotation in &doc.annotations {
        write_field!(w, "Annotator: {}", annotation.annotator);
        write_field!(@opt, w, "AnnotationDate: {}", annotation.date);
        write_field!(@opt, w, "AnnotationType: {}", annotation.annotation_type);
        write_field!(@opt, w, "SPDXREF: {}", annotation.element_id);
        write_field!(@opt_text, w, "AnnotationComment: {}", annotation.comment);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagvalue::parse_str;

    const DOC: &str = "\
SPDXVersion: SPDX-1.2
DataLicense: CC0-1.0
DocumentNamespace: http://spdx.org/spdxdocs/round-trip
DocumentComment: <text>A comment
# that looks like a comment
  and keeps its indentation</text>
Creator: Person: Jane Doe (jane@example.com)
Creator: Tool: spdx-tools
Created: 2024-03-01T12:30:05Z
Reviewer: Person: Joe Reviewer
ReviewDate: 2024-03-02T00:00:00Z
ReviewComment: looks fine
LicenseID: LicenseRef-1
ExtractedText: <text>Custom license text.
Second line.</text>
LicenseName: Custom
LicenseCrossReference: http://example.com/custom
PackageName: demo
SPDXID: SPDXRef-Package
PackageVersion: 1.0
PackageDownloadLocation: http://example.com/demo-1.0.tar.gz
PackageVerificationCode: d6a770ba38583ed4bb4525bd96e50461655d2758 (excludes: ./demo.spdx)
PackageLicenseConcluded: (MIT AND LicenseRef-1)
PackageLicenseInfoFromFiles: MIT
PackageLicenseInfoFromFiles: LicenseRef-1
PackageLicenseDeclared: MIT
PackageCopyrightText: <text>Copyright 2024 Jane Doe</text>
FileName: ./src/a.c
SPDXID: SPDXRef-File1
FileType: SOURCE
FileChecksum: SHA1: 2fd4e1c67a2d28fced849ee1bb76e7391b93eb12
FileChecksum: SHA256: 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08
LicenseConcluded: MIT
LicenseInfoInFile: MIT
FileCopyrightText: <text>  padded  </text>
FileDependency: ./src/b.c
ArtifactOfProjectName: upstream
ArtifactOfProjectHomePage: http://example.com/upstream
FileName: ./src/b.c
FileChecksum: SHA1: de9f2c7fd25e1b3afad3e85a0bd17d9b100db4b3
LicenseConcluded: LicenseRef-1
LicenseInfoInFile: LicenseRef-1
FileCopyrightText: NOASSERTION
FileContributor: Jane Doe
SnippetSPDXID: SPDXRef-Snippet1
SnippetFromFileSPDXID: SPDXRef-File1
SnippetByteRange: 10:200
SnippetLineRange: 2:9
SnippetLicenseConcluded: MIT
SnippetCopyrightText: NOASSERTION
Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package
Annotator: Person: Jane Doe
AnnotationDate: 2024-03-03T00:00:00Z
AnnotationType: OTHER
SPDXREF: SPDXRef-File1
AnnotationComment: checked by hand
";

    fn write_string(doc: &SpdxDocument) -> String {
        let mut out = vec![];
        write(&mut out, doc).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_write_parse_reproduces_the_document() {
        let first = parse_str(DOC).unwrap().document;
        let written = write_string(&first);
        let second = parse_str(&written).unwrap().document;

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(written, write_string(&second));
    }

    #[test]
    fn fields_survive_the_round_trip() {
        let doc = parse_str(&write_string(&parse_str(DOC).unwrap().document))
            .unwrap()
            .document;

        assert_eq!(
            doc.comment.as_deref(),
            Some("A comment\n# that looks like a comment\n  and keeps its indentation")
        );
        assert_eq!(doc.extracted_licenses[0].text, "Custom license text.\nSecond line.");
        assert_eq!(doc.files[0].copyright_text, "  padded  ");
        assert_eq!(
            doc.files[0].checksums.get("SHA256").map(String::as_str),
            Some("9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")
        );
        assert_eq!(doc.files[0].dependencies.len(), 1);
        assert_eq!(doc.files[1].contributors, vec!["Jane Doe"]);
        assert_eq!(doc.snippets[0].line_range.as_ref().unwrap().to_string(), "2:9");
        assert_eq!(doc.relationships[0].relationship_type, "DESCRIBES");
        assert_eq!(doc.annotations[0].element_id.as_deref(), Some("SPDXRef-File1"));
    }

    #[test]
    fn text_markers_only_when_needed() {
        assert_eq!(Text("plain value").to_string(), "plain value");
        assert_eq!(Text("two\nlines").to_string(), "<text>two\nlines</text>");
        assert_eq!(Text(" padded").to_string(), "<text> padded</text>");
        assert_eq!(Text("SHA1: abc").to_string(), "<text>SHA1: abc</text>");
    }
}
