//! The SPDX document object graph.
//!
//! A document owns every element it describes. Files live in a single arena
//! (`SpdxDocument::files`) and everything else refers to them by [`FileId`],
//! so the graph can be built incrementally and cloned without aliasing.

use crate::license::ExtractedLicense;
use derive_builder::Builder;
use derive_more::{Display, From};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

mod file;
mod package;
mod snippet;
pub mod verify;

pub(crate) use file::is_sha1_hex;
pub use file::{DoapProject, FileType, SpdxFile};
pub use package::SpdxPackage;
pub use snippet::SpdxSnippet;

/// Value of a text field that makes no claim.
pub const NOASSERTION: &str = "NOASSERTION";
/// The only license an SPDX document may carry.
pub const DATA_LICENSE: &str = "CC0-1.0";
/// Identifier of the document element itself.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

/// Layout of every SPDX timestamp.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Format a point in time the way SPDX expects it.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    // PANIC SAFETY: The format description is static and only uses
    // components every `OffsetDateTime` has.
    at.format(TIMESTAMP_FORMAT).unwrap()
}

/// Index of a file in its document's file arena.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Serialize)]
pub struct FileId(pub usize);

/// An SPDX document.
#[derive(Debug, Clone, Serialize)]
pub struct SpdxDocument {
    /// The version of the SPDX standard, e.g. `SPDX-1.2`.
    #[serde(rename = "spdxVersion")]
    pub spdx_version: String,

    /// The license of the SPDX file itself.
    #[serde(rename = "dataLicense")]
    pub data_license: String,

    /// Identifier of the document, always `SPDXRef-DOCUMENT`.
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,

    /// The name of the SPDX file itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A document-specific namespace URI.
    #[serde(rename = "documentNamespace")]
    pub namespace: String,

    /// Freeform comments about the SPDX file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Who made the document, and when.
    #[serde(rename = "creationInfo")]
    pub creation_info: CreationInfo,

    /// Reviews of the document, in the order they were given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<Review>,

    /// The document-local license pool.
    #[serde(rename = "hasExtractedLicensingInfos", skip_serializing_if = "Vec::is_empty")]
    pub extracted_licenses: Vec<ExtractedLicense>,

    /// The package the document describes, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<SpdxPackage>,

    /// The file arena, indexed by [`FileId`].
    pub files: Vec<SpdxFile>,

    /// Snippets of files, each pointing at its file by `SPDXRef-` id.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<SpdxSnippet>,

    /// Relationships between elements, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Annotations on any element.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Default for SpdxDocument {
    fn default() -> Self {
        SpdxDocument {
            spdx_version: String::new(),
            data_license: DATA_LICENSE.to_string(),
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: None,
            namespace: String::new(),
            comment: None,
            creation_info: CreationInfo::default(),
            reviewers: vec![],
            extracted_licenses: vec![],
            package: None,
            files: vec![],
            snippets: vec![],
            relationships: vec![],
            annotations: vec![],
        }
    }
}

impl SpdxDocument {
    /// The file behind `id`, if it is in the arena.
    pub fn file(&self, id: FileId) -> Option<&SpdxFile> {
        self.files.get(id.0)
    }

    /// Add a file to the arena, returning its id.
    pub fn push_file(&mut self, file: SpdxFile) -> FileId {
        self.files.push(file);
        FileId(self.files.len() - 1)
    }

    /// The first file called `name`.
    pub fn find_file_by_name(&self, name: &str) -> Option<FileId> {
        self.files.iter().position(|f| f.name == name).map(FileId)
    }

    /// The file with the given `SPDXRef-` identifier.
    pub fn find_file_by_spdx_id(&self, spdx_id: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.spdx_id.as_deref() == Some(spdx_id))
            .map(FileId)
    }

    /// The files owned by the package, in declaration order.
    pub fn package_files(&self) -> Vec<&SpdxFile> {
        match &self.package {
            Some(pkg) => pkg.files.iter().filter_map(|id| self.file(*id)).collect(),
            None => vec![],
        }
    }

    /// The pool entry declared under `id`.
    pub fn extracted_license(&self, id: &str) -> Option<&ExtractedLicense> {
        self.extracted_licenses.iter().find(|lic| lic.id == id)
    }

    /// A short label for log and diagnostic messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.namespace)
    }
}

/// One instance is required for each SPDX file produced. It provides the necessary
/// information for forward and backward compatibility for processing tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize)]
#[builder(setter(into), derive(Debug))]
pub struct CreationInfo {
    /// Identify who (or what, in the case of a tool) created the SPDX file.
    #[builder(default)]
    pub creators: Vec<Creator>,
    /// When the SPDX file was originally created, as `YYYY-MM-DDThh:mm:ssZ`.
    #[builder(default)]
    pub created: String,
    /// Freeform comments about the creator of the SPDX file.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// The version of the SPDX License List used when the SPDX file was created.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "licenseListVersion", skip_serializing_if = "Option::is_none")]
    pub license_list_version: Option<String>,
}

/// The creator of the SPDX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creator {
    /// A person, with an optional email.
    Person {
        /// The person's name.
        name: String,
        /// The person's email.
        email: Option<String>,
    },
    /// An organization, with an optional email.
    Organization {
        /// The organization's name.
        name: String,
        /// The organization's contact email.
        email: Option<String>,
    },
    /// A tool.
    Tool {
        /// The name and version of the tool.
        name: String,
    },
}

impl Creator {
    /// Construct a new `Creator::Person`.
    pub fn person(name: String, email: Option<String>) -> Self {
        Creator::Person { name, email }
    }

    /// Construct a new `Creator::Tool`.
    pub fn tool(s: &str) -> Self {
        Creator::Tool {
            name: String::from(s),
        }
    }
}

impl Display for Creator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Creator::Person {
                name,
                email: Some(email),
            } => write!(f, "Person: {} ({})", name, email),
            Creator::Person { name, email: None } => write!(f, "Person: {}", name),
            Creator::Organization {
                name,
                email: Some(email),
            } => write!(f, "Organization: {} ({})", name, email),
            Creator::Organization { name, email: None } => write!(f, "Organization: {}", name),
            Creator::Tool { name } => write!(f, "Tool: {}", name),
        }
    }
}

impl FromStr for Creator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Splits "Jane Doe (jane@example.com)" into its name and email.
        fn name_and_email(s: &str) -> (String, Option<String>) {
            let s = s.trim();
            match (s.rfind('('), s.ends_with(')')) {
                (Some(open), true) => {
                    let email = s[open + 1..s.len() - 1].trim();
                    let email = (!email.is_empty()).then(|| email.to_string());
                    (s[..open].trim().to_string(), email)
                }
                _ => (s.to_string(), None),
            }
        }

        let s = s.trim();
        if let Some(rest) = s.strip_prefix("Person:") {
            let (name, email) = name_and_email(rest);
            Ok(Creator::Person { name, email })
        } else if let Some(rest) = s.strip_prefix("Organization:") {
            let (name, email) = name_and_email(rest);
            Ok(Creator::Organization { name, email })
        } else if let Some(rest) = s.strip_prefix("Tool:") {
            Ok(Creator::tool(rest.trim()))
        } else {
            Err(format!(
                "creator '{}' must start with 'Person:', 'Organization:' or 'Tool:'",
                s
            ))
        }
    }
}

/// A review of the document, by a person or tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    /// Who reviewed, as `Person: name` or `Tool: name`.
    pub reviewer: String,
    /// When, as an SPDX timestamp.
    #[serde(rename = "reviewDate", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// What the reviewer had to say.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Review {
    /// A review with no date or comment yet.
    pub fn new(reviewer: impl Into<String>) -> Self {
        Review {
            reviewer: reviewer.into(),
            date: None,
            comment: None,
        }
    }
}

/// A typed link between two SPDX elements, e.g. `SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// The element the relationship is stated for.
    #[serde(rename = "spdxElementId")]
    pub element_id: String,
    /// The kind of link, upper case, e.g. `DESCRIBES`.
    #[serde(rename = "relationshipType")]
    pub relationship_type: String,
    /// The element on the other end.
    #[serde(rename = "relatedSpdxElement")]
    pub related_element: String,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [element, kind, related] => Ok(Relationship {
                element_id: element.to_string(),
                relationship_type: kind.to_uppercase(),
                related_element: related.to_string(),
                comment: None,
            }),
            _ => Err(format!(
                "expected '<element> <TYPE> <related element>', found '{}'",
                s
            )),
        }
    }
}

impl Display for Relationship {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.element_id, self.relationship_type, self.related_element
        )
    }
}

/// The kind of an annotation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationType {
    /// The annotation is a review.
    #[display(fmt = "REVIEW")]
    Review,
    /// Any other annotation.
    #[display(fmt = "OTHER")]
    Other,
}

impl FromStr for AnnotationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REVIEW" => Ok(AnnotationType::Review),
            "OTHER" => Ok(AnnotationType::Other),
            s => Err(format!("unknown annotation type '{}'", s)),
        }
    }
}

/// A comment attached to an element by a person or tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Who annotated, as a creator string.
    pub annotator: String,
    /// When, as an SPDX timestamp.
    #[serde(rename = "annotationDate", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// What kind of annotation this is.
    #[serde(rename = "annotationType", skip_serializing_if = "Option::is_none")]
    pub annotation_type: Option<AnnotationType>,
    /// The annotated element.
    #[serde(rename = "spdxElementId", skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    /// The annotation itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Annotation {
    /// An annotation with only its annotator.
    pub fn new(annotator: impl Into<String>) -> Self {
        Annotation {
            annotator: annotator.into(),
            date: None,
            annotation_type: None,
            element_id: None,
            comment: None,
        }
    }
}

// Make serde use the Display implementation for types with a custom
// display implementation
macro_rules! string_serialize {
    ($($ty:ty),*) => {
        $(impl Serialize for $ty { fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer { serializer.collect_str(&self) }})*
    };
}

string_serialize! {
  Creator, AnnotationType, FileType
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creators_parse_and_display() {
        let person: Creator = "Person: Jane Doe (jane@example.com)".parse().unwrap();
        assert_eq!(
            person,
            Creator::person("Jane Doe".to_string(), Some("jane@example.com".to_string()))
        );
        assert_eq!(person.to_string(), "Person: Jane Doe (jane@example.com)");

        let org: Creator = "Organization: Acme".parse().unwrap();
        assert_eq!(org.to_string(), "Organization: Acme");

        let tool: Creator = "Tool: spdx-tools 0.1.0".parse().unwrap();
        assert_eq!(tool, Creator::tool("spdx-tools 0.1.0"));

        assert!("Robot: R2".parse::<Creator>().is_err());
    }

    #[test]
    fn relationships_parse() {
        let rel: Relationship = "SPDXRef-DOCUMENT describes SPDXRef-Package".parse().unwrap();
        assert_eq!(rel.relationship_type, "DESCRIBES");
        assert_eq!(rel.to_string(), "SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package");
        assert!("SPDXRef-DOCUMENT DESCRIBES".parse::<Relationship>().is_err());
    }

    #[test]
    fn timestamps_use_spdx_layout() {
        let at = time::macros::datetime!(2024-03-01 12:30:05 UTC);
        assert_eq!(format_timestamp(at), "2024-03-01T12:30:05Z");
    }

    #[test]
    fn creation_info_builder_defaults() {
        let info = CreationInfoBuilder::default()
            .creators(vec![Creator::tool("spdx-tools")])
            .created("2024-03-01T12:30:05Z")
            .build()
            .unwrap();
        assert!(info.comment.is_none());
        assert_eq!(info.creators.len(), 1);
    }
}
