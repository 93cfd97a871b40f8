//! Files and the upstream projects they came from.

use super::{FileId, NOASSERTION};
use crate::license::LicenseExpression;
use derive_more::Display;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// The kind of content a file holds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Human-readable source code.
    #[display(fmt = "SOURCE")]
    Source,
    /// Compiled object code.
    #[display(fmt = "BINARY")]
    Binary,
    /// An archive of other files, such as a tarball.
    #[display(fmt = "ARCHIVE")]
    Archive,
    /// A file with an application MIME type.
    #[display(fmt = "APPLICATION")]
    Application,
    /// Audio content.
    #[display(fmt = "AUDIO")]
    Audio,
    /// Image content.
    #[display(fmt = "IMAGE")]
    Image,
    /// Human-readable text that is not source code.
    #[display(fmt = "TEXT")]
    Text,
    /// Video content.
    #[display(fmt = "VIDEO")]
    Video,
    /// Documentation.
    #[display(fmt = "DOCUMENTATION")]
    Documentation,
    /// An SPDX document.
    #[display(fmt = "SPDX")]
    Spdx,
    /// Anything else.
    #[display(fmt = "OTHER")]
    Other,
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOURCE" => Ok(FileType::Source),
            "BINARY" => Ok(FileType::Binary),
            "ARCHIVE" => Ok(FileType::Archive),
            "APPLICATION" => Ok(FileType::Application),
            "AUDIO" => Ok(FileType::Audio),
            "IMAGE" => Ok(FileType::Image),
            "TEXT" => Ok(FileType::Text),
            "VIDEO" => Ok(FileType::Video),
            "DOCUMENTATION" => Ok(FileType::Documentation),
            "SPDX" => Ok(FileType::Spdx),
            "OTHER" => Ok(FileType::Other),
            other => Err(format!("unknown file type '{}'", other)),
        }
    }
}

/// Description of an upstream project a file was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoapProject {
    /// Name of the project.
    pub name: String,
    /// Home page of the project.
    #[serde(rename = "homePage", skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
    /// URI of a DOAP description of the project.
    #[serde(rename = "projectUri", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl DoapProject {
    /// A project known only by name.
    pub fn new(name: impl Into<String>) -> Self {
        DoapProject {
            name: name.into(),
            home_page: None,
            uri: None,
        }
    }

    /// Two projects with the same key describe the same upstream.
    pub fn key(&self) -> (&str, Option<&str>) {
        (&self.name, self.home_page.as_deref())
    }
}

/// A file in the package.
#[derive(Debug, Clone, Serialize)]
pub struct SpdxFile {
    /// Path of the file relative to the package root, as `./path`.
    #[serde(rename = "fileName")]
    pub name: String,

    /// `SPDXRef-` identifier of the file.
    #[serde(rename = "SPDXID", skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,

    /// What the file holds; usually a single entry.
    #[serde(rename = "fileTypes", skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<FileType>,

    /// Lower-case hex SHA-1 of the file content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// Checksums in other algorithms, keyed by algorithm name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub checksums: BTreeMap<String, String>,

    /// The license the document's author concluded for the file.
    #[serde(rename = "licenseConcluded")]
    pub license_concluded: LicenseExpression,

    /// Licenses seen in the file itself.
    #[serde(rename = "licenseInfoInFiles", skip_serializing_if = "Vec::is_empty")]
    pub license_info_in_file: Vec<LicenseExpression>,

    /// How the concluded license was arrived at.
    #[serde(rename = "licenseComments", skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,

    /// Copyright notices found in the file, or a sentinel.
    #[serde(rename = "copyrightText")]
    pub copyright_text: String,

    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Text of any notice in the file.
    #[serde(rename = "noticeText", skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    /// People and organizations that contributed to the file.
    #[serde(rename = "fileContributors", skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<String>,

    /// Projects the file is an artifact of.
    #[serde(rename = "artifactOf", skip_serializing_if = "Vec::is_empty")]
    pub artifact_of: Vec<DoapProject>,

    /// Files this file depends on, resolved after the whole document is read.
    #[serde(rename = "fileDependencies", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<FileId>,
}

impl SpdxFile {
    /// A file with only a name, its licenses unasserted.
    pub fn new(name: impl Into<String>) -> Self {
        SpdxFile {
            name: name.into(),
            spdx_id: None,
            file_types: vec![],
            sha1: None,
            checksums: BTreeMap::new(),
            license_concluded: LicenseExpression::NoAssertion,
            license_info_in_file: vec![],
            license_comments: None,
            copyright_text: NOASSERTION.to_string(),
            comment: None,
            notice: None,
            contributors: vec![],
            artifact_of: vec![],
            dependencies: vec![],
        }
    }

    /// Record a license seen in the file, ignoring repeats.
    pub fn add_seen_license(&mut self, license: LicenseExpression) {
        if !self.license_info_in_file.contains(&license) {
            self.license_info_in_file.push(license);
        }
    }

    /// Whether `sha1` is 40 lower- or upper-case hex digits.
    pub fn has_valid_sha1(&self) -> bool {
        self.sha1.as_deref().map_or(false, is_sha1_hex)
    }

    /// Whether two files describe the same content under the same terms.
    ///
    /// Projects and dependencies are not compared; those are merged
    /// separately when two equivalent files meet.
    pub fn equivalent(&self, other: &SpdxFile) -> bool {
        fn same_set(a: &[LicenseExpression], b: &[LicenseExpression]) -> bool {
            a.iter().all(|l| b.contains(l)) && b.iter().all(|l| a.contains(l))
        }

        self.name == other.name
            && normalize_sha1(&self.sha1) == normalize_sha1(&other.sha1)
            && self.license_concluded == other.license_concluded
            && same_set(&self.license_info_in_file, &other.license_info_in_file)
            && self.copyright_text.trim() == other.copyright_text.trim()
    }
}

fn normalize_sha1(sha1: &Option<String>) -> Option<String> {
    sha1.as_deref().map(|s| s.trim().to_ascii_lowercase())
}

pub(crate) fn is_sha1_hex(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
