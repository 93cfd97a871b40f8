//! The tags the document builder understands.

use crate::error::Context;
use std::collections::HashMap;

/// A document property addressed by a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `SPDXVersion`
    SpdxVersion,
    /// `DataLicense`
    DataLicense,
    /// `DocumentNamespace`
    DocumentNamespace,
    /// `DocumentName`
    DocumentName,
    /// `SPDXID`, applied to whichever element is open.
    SpdxId,
    /// `DocumentComment`
    DocumentComment,

    /// `Creator`
    Creator,
    /// `Created`
    Created,
    /// `CreatorComment`
    CreatorComment,
    /// `LicenseListVersion`
    LicenseListVersion,

    /// `Reviewer`, opens a review.
    Reviewer,
    /// `ReviewDate`
    ReviewDate,
    /// `ReviewComment`
    ReviewComment,

    /// `LicenseID`, opens an extracted license.
    LicenseId,
    /// `ExtractedText`
    ExtractedText,
    /// `LicenseName`
    LicenseName,
    /// `LicenseCrossReference`
    LicenseCrossReference,
    /// `LicenseComment`
    LicenseComment,

    /// `PackageName`, opens the package.
    PackageName,
    /// `PackageVersion`
    PackageVersion,
    /// `PackageFileName`
    PackageFileName,
    /// `PackageSupplier`
    PackageSupplier,
    /// `PackageOriginator`
    PackageOriginator,
    /// `PackageDownloadLocation`
    PackageDownloadLocation,
    /// `PackageVerificationCode`
    PackageVerificationCode,
    /// `PackageChecksum`
    PackageChecksum,
    /// `PackageHomePage`
    PackageHomePage,
    /// `PackageSourceInfo`
    PackageSourceInfo,
    /// `PackageLicenseConcluded`
    PackageLicenseConcluded,
    /// `PackageLicenseInfoFromFiles`
    PackageLicenseInfoFromFiles,
    /// `PackageLicenseDeclared`
    PackageLicenseDeclared,
    /// `PackageLicenseComments`
    PackageLicenseComments,
    /// `PackageCopyrightText`
    PackageCopyrightText,
    /// `PackageSummary`
    PackageSummary,
    /// `PackageDescription`
    PackageDescription,

    /// `FileName`, opens a file.
    FileName,
    /// `FileType`
    FileType,
    /// `FileSHA1`
    FileChecksum,
    /// `LicenseConcluded`
    FileLicenseConcluded,
    /// `LicenseInfoInFile`
    FileLicenseInfo,
    /// `LicenseComments`
    FileLicenseComments,
    /// `FileCopyrightText`
    FileCopyrightText,
    /// `FileComment`
    FileComment,
    /// `FileNotice`
    FileNotice,
    /// `FileContributor`
    FileContributor,
    /// `FileDependency`
    FileDependency,

    /// `ArtifactOfProjectName`, opens a project of the current file.
    ProjectName,
    /// `ArtifactOfProjectHomePage`
    ProjectHomePage,
    /// `ArtifactOfProjectURI`
    ProjectUri,

    /// `SnippetSPDXID`, opens a snippet.
    SnippetSpdxId,
    /// `SnippetName`
    SnippetName,
    /// `SnippetFromFileSPDXID`
    SnippetFromFile,
    /// `SnippetByteRange`
    SnippetByteRange,
    /// `SnippetLineRange`
    SnippetLineRange,
    /// `SnippetLicenseConcluded`
    SnippetLicenseConcluded,
    /// `LicenseInfoInSnippet`
    SnippetLicenseInfo,
    /// `SnippetLicenseComments`
    SnippetLicenseComments,
    /// `SnippetCopyrightText`
    SnippetCopyrightText,
    /// `SnippetComment`
    SnippetComment,

    /// `Relationship`, opens a relationship.
    Relationship,
    /// `RelationshipComment`
    RelationshipComment,

    /// `Annotator`, opens an annotation.
    Annotator,
    /// `AnnotationDate`
    AnnotationDate,
    /// `AnnotationType`
    AnnotationType,
    /// `SPDXREF`, the annotated element.
    AnnotationSpdxRef,
    /// `AnnotationComment`
    AnnotationComment,
}

/// Canonical spelling of every tag.
const CANONICAL: &[(&str, Tag)] = &[
    ("SPDXVersion", Tag::SpdxVersion),
    ("DataLicense", Tag::DataLicense),
    ("DocumentNamespace", Tag::DocumentNamespace),
    ("DocumentName", Tag::DocumentName),
    ("SPDXID", Tag::SpdxId),
    ("DocumentComment", Tag::DocumentComment),
    ("Creator", Tag::Creator),
    ("Created", Tag::Created),
    ("CreatorComment", Tag::CreatorComment),
    ("LicenseListVersion", Tag::LicenseListVersion),
    ("Reviewer", Tag::Reviewer),
    ("ReviewDate", Tag::ReviewDate),
    ("ReviewComment", Tag::ReviewComment),
    ("LicenseID", Tag::LicenseId),
    ("ExtractedText", Tag::ExtractedText),
    ("LicenseName", Tag::LicenseName),
    ("LicenseCrossReference", Tag::LicenseCrossReference),
    ("LicenseComment", Tag::LicenseComment),
    ("PackageName", Tag::PackageName),
    ("PackageVersion", Tag::PackageVersion),
    ("PackageFileName", Tag::PackageFileName),
    ("PackageSupplier", Tag::PackageSupplier),
    ("PackageOriginator", Tag::PackageOriginator),
    ("PackageDownloadLocation", Tag::PackageDownloadLocation),
    ("PackageVerificationCode", Tag::PackageVerificationCode),
    ("PackageChecksum", Tag::PackageChecksum),
    ("PackageHomePage", Tag::PackageHomePage),
    ("PackageSourceInfo", Tag::PackageSourceInfo),
    ("PackageLicenseConcluded", Tag::PackageLicenseConcluded),
    ("PackageLicenseInfoFromFiles", Tag::PackageLicenseInfoFromFiles),
    ("PackageLicenseDeclared", Tag::PackageLicenseDeclared),
    ("PackageLicenseComments", Tag::PackageLicenseComments),
    ("PackageCopyrightText", Tag::PackageCopyrightText),
    ("PackageSummary", Tag::PackageSummary),
    ("PackageDescription", Tag::PackageDescription),
    ("FileName", Tag::FileName),
    ("FileType", Tag::FileType),
    ("FileChecksum", Tag::FileChecksum),
    ("LicenseConcluded", Tag::FileLicenseConcluded),
    ("LicenseInfoInFile", Tag::FileLicenseInfo),
    ("LicenseComments", Tag::FileLicenseComments),
    ("FileCopyrightText", Tag::FileCopyrightText),
    ("FileComment", Tag::FileComment),
    ("FileNotice", Tag::FileNotice),
    ("FileContributor", Tag::FileContributor),
    ("FileDependency", Tag::FileDependency),
    ("ArtifactOfProjectName", Tag::ProjectName),
    ("ArtifactOfProjectHomePage", Tag::ProjectHomePage),
    ("ArtifactOfProjectURI", Tag::ProjectUri),
    ("SnippetSPDXID", Tag::SnippetSpdxId),
    ("SnippetName", Tag::SnippetName),
    ("SnippetFromFileSPDXID", Tag::SnippetFromFile),
    ("SnippetByteRange", Tag::SnippetByteRange),
    ("SnippetLineRange", Tag::SnippetLineRange),
    ("SnippetLicenseConcluded", Tag::SnippetLicenseConcluded),
    ("LicenseInfoInSnippet", Tag::SnippetLicenseInfo),
    ("SnippetLicenseComments", Tag::SnippetLicenseComments),
    ("SnippetCopyrightText", Tag::SnippetCopyrightText),
    ("SnippetComment", Tag::SnippetComment),
    ("Relationship", Tag::Relationship),
    ("RelationshipComment", Tag::RelationshipComment),
    ("Annotator", Tag::Annotator),
    ("AnnotationDate", Tag::AnnotationDate),
    ("AnnotationType", Tag::AnnotationType),
    ("SPDXREF", Tag::AnnotationSpdxRef),
    ("AnnotationComment", Tag::AnnotationComment),
];

impl Tag {
    /// The entity that must already be open for this tag to apply.
    ///
    /// Tags that open a new entity, and document-level tags, need nothing.
    pub fn required_context(self) -> Option<Context> {
        use Tag::*;

        match self {
            ReviewDate | ReviewComment => Some(Context::Review),
            ExtractedText | LicenseName | LicenseCrossReference | LicenseComment => {
                Some(Context::ExtractedLicense)
            }
            PackageVersion
            | PackageFileName
            | PackageSupplier
            | PackageOriginator
            | PackageDownloadLocation
            | PackageVerificationCode
            | PackageChecksum
            | PackageHomePage
            | PackageSourceInfo
            | PackageLicenseConcluded
            | PackageLicenseInfoFromFiles
            | PackageLicenseDeclared
            | PackageLicenseComments
            | PackageCopyrightText
            | PackageSummary
            | PackageDescription => Some(Context::Package),
            FileType | FileChecksum | FileLicenseConcluded | FileLicenseInfo
            | FileLicenseComments | FileCopyrightText | FileComment | FileNotice
            | FileContributor | FileDependency | ProjectName => Some(Context::File),
            ProjectHomePage | ProjectUri => Some(Context::Project),
            SnippetName | SnippetFromFile | SnippetByteRange | SnippetLineRange
            | SnippetLicenseConcluded | SnippetLicenseInfo | SnippetLicenseComments
            | SnippetCopyrightText | SnippetComment => Some(Context::Snippet),
            RelationshipComment => Some(Context::Relationship),
            AnnotationDate | AnnotationType | AnnotationSpdxRef | AnnotationComment => {
                Some(Context::Annotation)
            }
            _ => None,
        }
    }

    /// The canonical tag name.
    pub fn name(self) -> &'static str {
        // PANIC SAFETY: Every variant has an entry in `CANONICAL`.
        CANONICAL.iter().find(|(_, t)| *t == self).unwrap().0
    }
}

/// Maps tag names to the properties they set.
///
/// The default table holds the canonical SPDX spellings. The table is a
/// plain value handed to the builder; extra spellings are added with
/// [`TagTable::with_alias`].
#[derive(Debug, Clone)]
pub struct TagTable {
    tags: HashMap<String, Tag>,
}

impl TagTable {
    /// The tag spelled `name`, if the table knows it.
    pub fn lookup(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).copied()
    }

    /// A copy of this table where `name` also means `tag`.
    pub fn with_alias(mut self, name: impl Into<String>, tag: Tag) -> Self {
        self.tags.insert(name.into(), tag);
        self
    }

    /// Number of spellings in the table.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the table knows no spellings at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagTable {
    fn default() -> Self {
        TagTable {
            tags: CANONICAL
                .iter()
                .map(|(name, tag)| (name.to_string(), *tag))
                .collect(),
        }
    }
}
