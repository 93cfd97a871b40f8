//! Assembles an [`SpdxDocument`] from tag-value entries.

use super::{Parsed, Tag, TagHandler, TagTable, TagValue};
use crate::document::{
    verify, Annotation, DoapProject, FileId, Relationship, Review, SpdxDocument, SpdxFile,
    SpdxPackage, SpdxSnippet,
};
use crate::error::{Context, Error, Result, Warning, WarningKind};
use crate::license::{ExpressionError, ExtractedLicense, LicenseExpression};
use crate::pointer::{PointerKind, StartEndPointer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// The block the builder is in, i.e. the kind of the last opened entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Document,
    Creator,
    Review,
    ExtractedLicense,
    Package,
    File,
    Project,
    Snippet,
    Relationship,
    Annotation,
}

/// A [`TagHandler`] that builds one document.
///
/// Scoped tags apply to the most recently opened entity of their kind. The
/// cursors are indices into the document under construction, and a new
/// `Reviewer`, `LicenseID`, `FileName`, `ArtifactOfProjectName`, ... moves
/// the matching cursor. File dependencies are collected by name and
/// resolved in [`TagHandler::exit`], which also runs the verification pass.
#[derive(Debug)]
pub struct DocumentBuilder<'t> {
    table: &'t TagTable,
    doc: SpdxDocument,
    state: State,
    review: Option<usize>,
    license: Option<usize>,
    file: Option<FileId>,
    project: Option<usize>,
    snippet: Option<usize>,
    relationship: Option<usize>,
    annotation: Option<usize>,
    /// Dependency file name to the files that depend on it.
    pending_dependencies: BTreeMap<String, Vec<FileId>>,
    warnings: Vec<Warning>,
}

impl<'t> DocumentBuilder<'t> {
    /// A builder that reads tags through `table`.
    pub fn new(table: &'t TagTable) -> Self {
        DocumentBuilder {
            table,
            doc: SpdxDocument::default(),
            state: State::Document,
            review: None,
            license: None,
            file: None,
            project: None,
            snippet: None,
            relationship: None,
            annotation: None,
            pending_dependencies: BTreeMap::new(),
            warnings: vec![],
        }
    }

    /// The document and warnings gathered so far.
    pub fn into_parsed(self) -> Parsed {
        Parsed {
            document: self.doc,
            warnings: self.warnings,
        }
    }

    fn has_context(&self, context: Context) -> bool {
        match context {
            Context::Document => true,
            Context::Review => self.review.is_some(),
            Context::ExtractedLicense => self.license.is_some(),
            Context::Package => self.doc.package.is_some(),
            Context::File => self.file.is_some(),
            Context::Project => self.file.is_some() && self.project.is_some(),
            Context::Snippet => self.snippet.is_some(),
            Context::Relationship => self.relationship.is_some(),
            Context::Annotation => self.annotation.is_some(),
        }
    }

    fn enter_state(&mut self, state: State) {
        if self.state != state {
            log::debug!(target: "spdx_tools", "{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn warn(&mut self, warning: Warning) {
        log::warn!(target: "spdx_tools", "{}", warning);
        self.warnings.push(warning);
    }

    fn review_mut(&mut self, tv: &TagValue) -> Result<&mut Review> {
        let idx = self.review.ok_or_else(|| missing(tv, Context::Review))?;
        self.doc
            .reviewers
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::Review))
    }

    fn license_mut(&mut self, tv: &TagValue) -> Result<&mut ExtractedLicense> {
        let idx = self.license.ok_or_else(|| missing(tv, Context::ExtractedLicense))?;
        self.doc
            .extracted_licenses
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::ExtractedLicense))
    }

    fn package_mut(&mut self, tv: &TagValue) -> Result<&mut SpdxPackage> {
        self.doc
            .package
            .as_mut()
            .ok_or_else(|| missing(tv, Context::Package))
    }

    fn file_mut(&mut self, tv: &TagValue) -> Result<&mut SpdxFile> {
        let id = self.file.ok_or_else(|| missing(tv, Context::File))?;
        self.doc
            .files
            .get_mut(id.0)
            .ok_or_else(|| missing(tv, Context::File))
    }

    fn project_mut(&mut self, tv: &TagValue) -> Result<&mut DoapProject> {
        let idx = self.project.ok_or_else(|| missing(tv, Context::Project))?;
        self.file_mut(tv)?
            .artifact_of
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::Project))
    }

    fn snippet_mut(&mut self, tv: &TagValue) -> Result<&mut SpdxSnippet> {
        let idx = self.snippet.ok_or_else(|| missing(tv, Context::Snippet))?;
        self.doc
            .snippets
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::Snippet))
    }

    fn relationship_mut(&mut self, tv: &TagValue) -> Result<&mut Relationship> {
        let idx = self.relationship.ok_or_else(|| missing(tv, Context::Relationship))?;
        self.doc
            .relationships
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::Relationship))
    }

    fn annotation_mut(&mut self, tv: &TagValue) -> Result<&mut Annotation> {
        let idx = self.annotation.ok_or_else(|| missing(tv, Context::Annotation))?;
        self.doc
            .annotations
            .get_mut(idx)
            .ok_or_else(|| missing(tv, Context::Annotation))
    }

    /// Parse a license expression against the licenses declared so far.
    fn expression(&self, tv: &TagValue) -> Result<LicenseExpression> {
        LicenseExpression::parse_with_pool(&tv.value, &self.doc.extracted_licenses).map_err(|e| {
            match e {
                ExpressionError::Undeclared(id) => Error::UndeclaredLicense { id, line: tv.line },
                other => Error::LicenseExpression {
                    expression: tv.value.clone(),
                    line: tv.line,
                    reason: other.to_string(),
                },
            }
        })
    }

    fn range(&mut self, tv: &TagValue, kind: PointerKind) -> Result<StartEndPointer> {
        let reference = self.snippet_mut(tv)?.from_file.clone();
        StartEndPointer::parse(&tv.value, reference.as_deref(), kind)
            .map_err(|reason| invalid(tv, reason))
    }

    fn apply(&mut self, tag: Tag, tv: &TagValue) -> Result<()> {
        let value = || tv.value.clone();

        match tag {
            Tag::SpdxVersion => {
                self.enter_state(State::Document);
                self.doc.spdx_version = value();
            }
            Tag::DataLicense => self.doc.data_license = value(),
            Tag::DocumentNamespace => self.doc.namespace = value(),
            Tag::DocumentName => self.doc.name = Some(value()),
            Tag::DocumentComment => self.doc.comment = Some(value()),
            Tag::SpdxId => match self.state {
                State::File | State::Project => self.file_mut(tv)?.spdx_id = Some(value()),
                State::Package => self.package_mut(tv)?.spdx_id = Some(value()),
                _ => self.doc.spdx_id = value(),
            },

            Tag::Creator => {
                let creator = parse_value(tv)?;
                self.enter_state(State::Creator);
                self.doc.creation_info.creators.push(creator);
            }
            Tag::Created => self.doc.creation_info.created = value(),
            Tag::CreatorComment => self.doc.creation_info.comment = Some(value()),
            Tag::LicenseListVersion => self.doc.creation_info.license_list_version = Some(value()),

            Tag::Reviewer => {
                self.enter_state(State::Review);
                self.doc.reviewers.push(Review::new(value()));
                self.review = Some(self.doc.reviewers.len() - 1);
            }
            Tag::ReviewDate => self.review_mut(tv)?.date = Some(value()),
            Tag::ReviewComment => self.review_mut(tv)?.comment = Some(value()),

            Tag::LicenseId => {
                if self.doc.extracted_license(&tv.value).is_some() {
                    return Err(invalid(tv, "license id is declared twice"));
                }
                self.enter_state(State::ExtractedLicense);
                self.doc
                    .extracted_licenses
                    .push(ExtractedLicense::new(value(), ""));
                self.license = Some(self.doc.extracted_licenses.len() - 1);
            }
            Tag::ExtractedText => self.license_mut(tv)?.text = value(),
            Tag::LicenseName => self.license_mut(tv)?.name = Some(value()),
            Tag::LicenseCrossReference => {
                let urls = tv
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(ToOwned::to_owned);
                self.license_mut(tv)?.source_urls.extend(urls);
            }
            Tag::LicenseComment => self.license_mut(tv)?.comment = Some(value()),

            Tag::PackageName => {
                if self.doc.package.is_some() {
                    return Err(Error::DuplicatePackage {
                        name: value(),
                        line: tv.line,
                    });
                }
                self.enter_state(State::Package);
                self.doc.package = Some(SpdxPackage::new(value()));
            }
            Tag::PackageVersion => self.package_mut(tv)?.version = Some(value()),
            Tag::PackageFileName => self.package_mut(tv)?.file_name = Some(value()),
            Tag::PackageSupplier => self.package_mut(tv)?.supplier = Some(value()),
            Tag::PackageOriginator => self.package_mut(tv)?.originator = Some(value()),
            Tag::PackageDownloadLocation => self.package_mut(tv)?.download_location = value(),
            Tag::PackageVerificationCode => {
                let code = parse_value(tv)?;
                self.package_mut(tv)?.verification_code = Some(code);
            }
            Tag::PackageChecksum => match tv.value.split_once(':') {
                Some((algorithm, _)) if !algorithm.trim().eq_ignore_ascii_case("SHA1") => {
                    let warning = Warning::verification(format!(
                        "line {}: package checksum algorithm '{}' is not supported",
                        tv.line,
                        algorithm.trim()
                    ));
                    self.warn(warning);
                }
                Some((_, sha1)) => self.package_mut(tv)?.sha1 = Some(sha1.trim().to_string()),
                None => self.package_mut(tv)?.sha1 = Some(value()),
            },
            Tag::PackageHomePage => self.package_mut(tv)?.home_page = Some(value()),
            Tag::PackageSourceInfo => self.package_mut(tv)?.source_info = Some(value()),
            Tag::PackageLicenseConcluded => {
                let license = self.expression(tv)?;
                self.package_mut(tv)?.license_concluded = license;
            }
            Tag::PackageLicenseInfoFromFiles => {
                let license = self.expression(tv)?;
                self.package_mut(tv)?.add_license_info_from_files(license);
            }
            Tag::PackageLicenseDeclared => {
                let license = self.expression(tv)?;
                self.package_mut(tv)?.license_declared = license;
            }
            Tag::PackageLicenseComments => self.package_mut(tv)?.license_comments = Some(value()),
            Tag::PackageCopyrightText => self.package_mut(tv)?.copyright_text = value(),
            Tag::PackageSummary => self.package_mut(tv)?.summary = Some(value()),
            Tag::PackageDescription => self.package_mut(tv)?.description = Some(value()),

            Tag::FileName => {
                self.enter_state(State::File);
                let id = self.doc.push_file(SpdxFile::new(value()));
                if let Some(package) = self.doc.package.as_mut() {
                    package.files.push(id);
                }
                self.file = Some(id);
                self.project = None;
            }
            Tag::FileType => {
                let file_type = parse_value(tv)?;
                self.file_mut(tv)?.file_types.push(file_type);
            }
            Tag::FileChecksum => {
                let file = self.file_mut(tv)?;
                match tv.value.split_once(':') {
                    Some((algorithm, digest)) => {
                        let algorithm = algorithm.trim().to_uppercase();
                        let digest = digest.trim().to_string();
                        if algorithm == "SHA1" {
                            file.sha1 = Some(digest);
                        } else {
                            file.checksums.insert(algorithm, digest);
                        }
                    }
                    None => file.sha1 = Some(value()),
                }
            }
            Tag::FileLicenseConcluded => {
                let license = self.expression(tv)?;
                self.file_mut(tv)?.license_concluded = license;
            }
            Tag::FileLicenseInfo => {
                let license = self.expression(tv)?;
                self.file_mut(tv)?.add_seen_license(license);
            }
            Tag::FileLicenseComments => self.file_mut(tv)?.license_comments = Some(value()),
            Tag::FileCopyrightText => self.file_mut(tv)?.copyright_text = value(),
            Tag::FileComment => self.file_mut(tv)?.comment = Some(value()),
            Tag::FileNotice => self.file_mut(tv)?.notice = Some(value()),
            Tag::FileContributor => self.file_mut(tv)?.contributors.push(value()),
            Tag::FileDependency => {
                let id = self.file.ok_or_else(|| missing(tv, Context::File))?;
                self.pending_dependencies.entry(value()).or_default().push(id);
            }

            Tag::ProjectName => {
                let file = self.file_mut(tv)?;
                file.artifact_of.push(DoapProject::new(value()));
                let idx = file.artifact_of.len() - 1;
                self.project = Some(idx);
                self.enter_state(State::Project);
            }
            Tag::ProjectHomePage => self.project_mut(tv)?.home_page = Some(value()),
            Tag::ProjectUri => self.project_mut(tv)?.uri = Some(value()),

            Tag::SnippetSpdxId => {
                self.enter_state(State::Snippet);
                self.doc.snippets.push(SpdxSnippet::new(value()));
                self.snippet = Some(self.doc.snippets.len() - 1);
            }
            Tag::SnippetName => self.snippet_mut(tv)?.name = Some(value()),
            Tag::SnippetFromFile => self.snippet_mut(tv)?.from_file = Some(value()),
            Tag::SnippetByteRange => {
                let range = self.range(tv, PointerKind::ByteOffset)?;
                self.snippet_mut(tv)?.byte_range = Some(range);
            }
            Tag::SnippetLineRange => {
                let range = self.range(tv, PointerKind::LineChar)?;
                self.snippet_mut(tv)?.line_range = Some(range);
            }
            Tag::SnippetLicenseConcluded => {
                let license = self.expression(tv)?;
                self.snippet_mut(tv)?.license_concluded = license;
            }
            Tag::SnippetLicenseInfo => {
                let license = self.expression(tv)?;
                let snippet = self.snippet_mut(tv)?;
                if !snippet.license_info_in_snippet.contains(&license) {
                    snippet.license_info_in_snippet.push(license);
                }
            }
            Tag::SnippetLicenseComments => self.snippet_mut(tv)?.license_comments = Some(value()),
            Tag::SnippetCopyrightText => self.snippet_mut(tv)?.copyright_text = value(),
            Tag::SnippetComment => self.snippet_mut(tv)?.comment = Some(value()),

            Tag::Relationship => {
                let relationship = parse_value(tv)?;
                self.enter_state(State::Relationship);
                self.doc.relationships.push(relationship);
                self.relationship = Some(self.doc.relationships.len() - 1);
            }
            Tag::RelationshipComment => self.relationship_mut(tv)?.comment = Some(value()),

            Tag::Annotator => {
                self.enter_state(State::Annotation);
                self.doc.annotations.push(Annotation::new(value()));
                self.annotation = Some(self.doc.annotations.len() - 1);
            }
            Tag::AnnotationDate => self.annotation_mut(tv)?.date = Some(value()),
            Tag::AnnotationType => {
                let annotation_type = parse_value(tv)?;
                self.annotation_mut(tv)?.annotation_type = Some(annotation_type);
            }
            Tag::AnnotationSpdxRef => self.annotation_mut(tv)?.element_id = Some(value()),
            Tag::AnnotationComment => self.annotation_mut(tv)?.comment = Some(value()),
        }

        Ok(())
    }

    /// Link every recorded dependency to the file of that name.
    fn resolve_dependencies(&mut self) {
        let pending = std::mem::take(&mut self.pending_dependencies);

        for (name, dependents) in pending {
            let target = match self.doc.find_file_by_name(&name) {
                Some(target) => target,
                None => {
                    let names: Vec<&str> = dependents
                        .iter()
                        .filter_map(|id| self.doc.file(*id))
                        .map(|f| f.name.as_str())
                        .collect();
                    let warning = Warning::new(
                        WarningKind::UnresolvedDependency,
                        format!(
                            "file '{}' is a dependency of {} but is not in the document",
                            name,
                            names.join(", ")
                        ),
                    );
                    self.warn(warning);
                    continue;
                }
            };

            for dependent in dependents {
                if let Some(file) = self.doc.files.get_mut(dependent.0) {
                    if !file.dependencies.contains(&target) {
                        file.dependencies.push(target);
                    }
                }
            }
        }
    }

    /// Point snippet ranges at the snippet's file and check that file exists.
    fn resolve_snippets(&mut self) {
        for snippet in &mut self.doc.snippets {
            let from_file = match snippet.from_file.clone() {
                Some(from_file) => from_file,
                None => continue,
            };
            for range in [&mut snippet.byte_range, &mut snippet.line_range]
                .into_iter()
                .flatten()
            {
                range.fill_reference(&from_file);
            }
        }

        let unresolved: Vec<String> = self
            .doc
            .snippets
            .iter()
            .filter_map(|snippet| {
                let from_file = snippet.from_file.as_deref()?;
                self.doc.find_file_by_spdx_id(from_file).is_none().then(|| {
                    format!(
                        "snippet {} refers to file {} which is not in the document",
                        snippet.spdx_id, from_file
                    )
                })
            })
            .collect();

        for message in unresolved {
            self.warn(Warning::new(WarningKind::UnresolvedSnippetFile, message));
        }
    }

    /// Swap every extracted license leaf for the final pool entry of that id.
    ///
    /// A license can be referenced once its id is declared, before the rest
    /// of its block has been read.
    fn refresh_extracted_licenses(&mut self) {
        let pool = &self.doc.extracted_licenses;
        let refresh = |expr: &LicenseExpression| with_pool_entries(expr, pool);

        if let Some(package) = self.doc.package.as_mut() {
            package.license_declared = refresh(&package.license_declared);
            package.license_concluded = refresh(&package.license_concluded);
            package.license_info_from_files =
                package.license_info_from_files.iter().map(refresh).collect();
        }
        for file in &mut self.doc.files {
            file.license_concluded = refresh(&file.license_concluded);
            file.license_info_in_file = file.license_info_in_file.iter().map(refresh).collect();
        }
        for snippet in &mut self.doc.snippets {
            snippet.license_concluded = refresh(&snippet.license_concluded);
            snippet.license_info_in_snippet =
                snippet.license_info_in_snippet.iter().map(refresh).collect();
        }
    }
}

impl<'t> TagHandler for DocumentBuilder<'t> {
    fn enter(&mut self) -> Result<()> {
        log::debug!(target: "spdx_tools", "starting a new document");
        Ok(())
    }

    fn build_tag(&mut self, tv: &TagValue) -> Result<()> {
        let tag = self
            .table
            .lookup(&tv.tag)
            .ok_or_else(|| Error::UnrecognizedTag {
                tag: tv.tag.clone(),
                line: tv.line,
            })?;

        if let Some(context) = tag.required_context() {
            if !self.has_context(context) {
                return Err(missing(tv, context));
            }
        }

        log::debug!(target: "spdx_tools", "line {}: {}", tv.line, tag.name());
        self.apply(tag, tv)
    }

    fn exit(&mut self) -> Result<()> {
        self.refresh_extracted_licenses();
        self.resolve_dependencies();
        self.resolve_snippets();

        for warning in verify::verify_document(&self.doc) {
            self.warn(warning);
        }
        Ok(())
    }
}

fn missing(tv: &TagValue, context: Context) -> Error {
    Error::MissingContext {
        tag: tv.tag.clone(),
        line: tv.line,
        context,
    }
}

fn invalid(tv: &TagValue, reason: impl Into<String>) -> Error {
    Error::InvalidValue {
        tag: tv.tag.clone(),
        line: tv.line,
        reason: reason.into(),
    }
}

fn parse_value<T>(tv: &TagValue) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    tv.value.parse().map_err(|e: T::Err| invalid(tv, e.to_string()))
}

fn with_pool_entries(expr: &LicenseExpression, pool: &[ExtractedLicense]) -> LicenseExpression {
    match expr {
        LicenseExpression::Conjunction(members) => LicenseExpression::Conjunction(
            members.iter().map(|m| with_pool_entries(m, pool)).collect(),
        ),
        LicenseExpression::Disjunction(members) => LicenseExpression::Disjunction(
            members.iter().map(|m| with_pool_entries(m, pool)).collect(),
        ),
        LicenseExpression::With { license, exception } => LicenseExpression::With {
            license: Box::new(with_pool_entries(license, pool)),
            exception: exception.clone(),
        },
        LicenseExpression::Extracted(license) => pool
            .iter()
            .find(|entry| entry.id == license.id)
            .map_or_else(|| expr.clone(), |entry| LicenseExpression::Extracted(entry.clone())),
        leaf => leaf.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagvalue::parse_str;

    const HEADER: &str = "\
SPDXVersion: SPDX-1.2
DataLicense: CC0-1.0
DocumentNamespace: http://spdx.org/spdxdocs/demo-1
Creator: Tool: spdx-tools
Created: 2024-03-01T12:30:05Z
";

    fn with_header(body: &str) -> String {
        format!("{}{}", HEADER, body)
    }

    #[test]
    fn review_date_without_reviewer_is_a_context_error() {
        let err = parse_str(&with_header("ReviewDate: 2024-03-02T00:00:00Z\n")).unwrap_err();
        match err {
            Error::MissingContext { tag, line, context } => {
                assert_eq!(tag, "ReviewDate");
                assert_eq!(line, 6);
                assert_eq!(context, Context::Review);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let err = parse_str(&with_header("Frobnicate: yes\n")).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedTag { tag, line: 6 } if tag == "Frobnicate"));
    }

    #[test]
    fn aliases_from_the_table_are_honoured() {
        let table = TagTable::default().with_alias("FileSHA1", Tag::FileChecksum);
        let input = with_header(
            "PackageName: p\nFileName: a.c\nFileSHA1: 2fd4e1c67a2d28fced849ee1bb76e7391b93eb12\n",
        );
        let parsed = crate::tagvalue::parse_document(input.as_bytes(), &table).unwrap();
        assert_eq!(
            parsed.document.files[0].sha1.as_deref(),
            Some("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
        );
    }

    #[test]
    fn missing_dependency_is_one_warning() {
        let parsed = parse_str(&with_header(
            "PackageName: p\n\
             FileName: a.c\n\
             FileChecksum: SHA1: 2fd4e1c67a2d28fced849ee1bb76e7391b93eb12\n\
             FileDependency: missing.c\n",
        ))
        .unwrap();

        let dependency_warnings: Vec<&Warning> = parsed
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::UnresolvedDependency)
            .collect();
        assert_eq!(dependency_warnings.len(), 1);
        assert!(dependency_warnings[0].message.contains("missing.c"));
        assert!(parsed.document.files[0].dependencies.is_empty());
    }

    #[test]
    fn dependencies_resolve_forward_references() {
        let parsed = parse_str(&with_header(
            "PackageName: p\n\
             FileName: a.c\n\
             FileDependency: b.c\n\
             FileName: b.c\n",
        ))
        .unwrap();

        assert_eq!(parsed.document.files[0].dependencies, vec![FileId(1)]);
        assert!(parsed
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::UnresolvedDependency));
    }

    #[test]
    fn file_tags_apply_to_the_current_file() {
        let parsed = parse_str(&with_header(
            "PackageName: p\n\
             FileName: a.c\n\
             FileType: SOURCE\n\
             LicenseConcluded: MIT\n\
             FileName: b.c\n\
             LicenseConcluded: (Apache-2.0 OR MIT)\n\
             LicenseInfoInFile: Apache-2.0\n\
             LicenseInfoInFile: Apache-2.0\n\
             ArtifactOfProjectName: upstream\n\
             ArtifactOfProjectHomePage: http://example.com\n",
        ))
        .unwrap();

        let doc = &parsed.document;
        assert_eq!(doc.package.as_ref().unwrap().files, vec![FileId(0), FileId(1)]);
        assert_eq!(doc.files[0].license_concluded, LicenseExpression::simple("MIT"));
        assert_eq!(doc.files[1].license_concluded.to_string(), "(Apache-2.0 OR MIT)");
        assert_eq!(doc.files[1].license_info_in_file.len(), 1);
        assert_eq!(doc.files[1].artifact_of.len(), 1);
        assert_eq!(
            doc.files[1].artifact_of[0].home_page.as_deref(),
            Some("http://example.com")
        );
        assert!(doc.files[0].artifact_of.is_empty());
    }

    #[test]
    fn project_tags_need_a_project() {
        let err = parse_str(&with_header(
            "PackageName: p\nFileName: a.c\nArtifactOfProjectHomePage: http://example.com\n",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::MissingContext { context: Context::Project, .. }));
    }

    #[test]
    fn license_refs_must_be_declared_first() {
        let err = parse_str(&with_header(
            "PackageName: p\nPackageLicenseDeclared: LicenseRef-1\n",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::UndeclaredLicense { id, .. } if id == "LicenseRef-1"));
    }

    #[test]
    fn extracted_licenses_resolve_to_their_final_text() {
        let parsed = parse_str(&with_header(
            "LicenseID: LicenseRef-1\n\
             PackageName: p\n\
             PackageLicenseDeclared: LicenseRef-1 AND MIT\n\
             LicenseID: LicenseRef-2\n\
             ExtractedText: <text>Second\nlicense</text>\n\
             LicenseName: Two\n\
             LicenseCrossReference: http://a.example, http://b.example\n",
        ))
        .unwrap();

        let doc = &parsed.document;
        let second = doc.extracted_license("LicenseRef-2").unwrap();
        assert_eq!(second.text, "Second\nlicense");
        assert_eq!(second.source_urls, vec!["http://a.example", "http://b.example"]);

        let declared = &doc.package.as_ref().unwrap().license_declared;
        assert_eq!(declared.extracted_licenses()[0].id, "LicenseRef-1");
    }

    #[test]
    fn license_exceptions_and_or_later_are_read() {
        let parsed = parse_str(&with_header(
            "PackageName: p
             PackageLicenseDeclared: GPL-2.0-only WITH Classpath-exception-2.0
             FileName: a.c
             LicenseConcluded: GPL-2.0+
             FileName: b.c
             LicenseConcluded: MIT OR (GPL-2.0-or-later WITH Classpath-exception-2.0)
",
        ))
        .unwrap();

        let doc = &parsed.document;
        let declared = &doc.package.as_ref().unwrap().license_declared;
        assert_eq!(declared.to_string(), "GPL-2.0-only WITH Classpath-exception-2.0");
        assert!(doc.files[0].license_concluded.to_string().starts_with("GPL-2.0"));
        assert_eq!(
            doc.files[1].license_concluded.to_string(),
            "(MIT OR GPL-2.0-or-later WITH Classpath-exception-2.0)"
        );
    }

    #[test]
    fn a_second_package_is_fatal() {
        let err = parse_str(&with_header("PackageName: a\nPackageName: b\n")).unwrap_err();
        assert!(matches!(err, Error::DuplicatePackage { name, line: 7 } if name == "b"));
    }

    #[test]
    fn spdx_ids_go_to_the_open_element() {
        let parsed = parse_str(&with_header(
            "SPDXID: SPDXRef-DOCUMENT\n\
             PackageName: p\n\
             SPDXID: SPDXRef-Package\n\
             FileName: a.c\n\
             SPDXID: SPDXRef-File1\n",
        ))
        .unwrap();

        let doc = &parsed.document;
        assert_eq!(doc.spdx_id, "SPDXRef-DOCUMENT");
        assert_eq!(
            doc.package.as_ref().unwrap().spdx_id.as_deref(),
            Some("SPDXRef-Package")
        );
        assert_eq!(doc.files[0].spdx_id.as_deref(), Some("SPDXRef-File1"));
    }

    #[test]
    fn snippets_take_their_file_reference() {
        let parsed = parse_str(&with_header(
            "PackageName: p\n\
             FileName: a.c\n\
             SPDXID: SPDXRef-File1\n\
             SnippetSPDXID: SPDXRef-Snippet1\n\
             SnippetByteRange: 10:20\n\
             SnippetFromFileSPDXID: SPDXRef-File1\n\
             SnippetSPDXID: SPDXRef-Snippet2\n\
             SnippetFromFileSPDXID: SPDXRef-Nowhere\n\
             SnippetByteRange: 1:2\n",
        ))
        .unwrap();

        let first = &parsed.document.snippets[0];
        let range = first.byte_range.as_ref().unwrap();
        assert_eq!(range.start.as_ref().unwrap().reference(), Some("SPDXRef-File1"));
        assert!(first.verify().is_empty());

        let unresolved: Vec<&Warning> = parsed
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::UnresolvedSnippetFile)
            .collect();
        assert_eq!(unresolved.len(), 1);
        assert!(unresolved[0].message.contains("SPDXRef-Snippet2"));
    }

    #[test]
    fn malformed_values_name_the_tag() {
        let err = parse_str(&with_header("PackageName: p\nFileName: a\nFileType: SCRIPT\n"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { tag, line: 8, .. } if tag == "FileType"));
    }

    #[test]
    fn other_package_checksums_are_reported() {
        let parsed = parse_str(&with_header(
            "PackageName: p\nPackageChecksum: SHA256: abcd\n",
        ))
        .unwrap();
        assert!(parsed
            .warnings
            .iter()
            .any(|w| w.message.contains("'SHA256' is not supported")));
        assert!(parsed.document.package.unwrap().sha1.is_none());
    }
}
