//! The package a document describes.

use super::{FileId, NOASSERTION};
use crate::license::LicenseExpression;
use crate::verification::VerificationCode;
use serde::Serialize;

/// The package the document describes.
#[derive(Debug, Clone, Serialize)]
pub struct SpdxPackage {
    /// Name of the package.
    pub name: String,

    /// `SPDXRef-` identifier of the package.
    #[serde(rename = "SPDXID", skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,

    /// Version of the package.
    #[serde(rename = "versionInfo", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// File name of the package archive.
    #[serde(rename = "packageFileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Who distributes the package, as a creator string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Who first made the package, as a creator string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator: Option<String>,

    /// Where the package can be downloaded, or a sentinel.
    #[serde(rename = "downloadLocation")]
    pub download_location: String,

    /// Home page of the package.
    #[serde(rename = "homepage", skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,

    /// Background on where the package came from.
    #[serde(rename = "sourceInfo", skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,

    /// SHA-1 of the package archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    /// Verification code over the package files.
    #[serde(rename = "packageVerificationCode", skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<VerificationCode>,

    /// The license the package authors declared.
    #[serde(rename = "licenseDeclared")]
    pub license_declared: LicenseExpression,

    /// The license the document's author concluded.
    #[serde(rename = "licenseConcluded")]
    pub license_concluded: LicenseExpression,

    /// The distinct licenses found in the package files.
    #[serde(rename = "licenseInfoFromFiles", skip_serializing_if = "Vec::is_empty")]
    pub license_info_from_files: Vec<LicenseExpression>,

    /// How the concluded license was arrived at.
    #[serde(rename = "licenseComments", skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,

    /// Copyright notices of the package, or a sentinel.
    #[serde(rename = "copyrightText")]
    pub copyright_text: String,

    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The files the package contains.
    #[serde(rename = "hasFiles", skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileId>,
}

impl SpdxPackage {
    /// A package with only a name, everything else unasserted.
    pub fn new(name: impl Into<String>) -> Self {
        SpdxPackage {
            name: name.into(),
            spdx_id: None,
            version: None,
            file_name: None,
            supplier: None,
            originator: None,
            download_location: NOASSERTION.to_string(),
            home_page: None,
            source_info: None,
            sha1: None,
            verification_code: None,
            license_declared: LicenseExpression::NoAssertion,
            license_concluded: LicenseExpression::NoAssertion,
            license_info_from_files: vec![],
            license_comments: None,
            copyright_text: NOASSERTION.to_string(),
            summary: None,
            description: None,
            files: vec![],
        }
    }

    /// Record a license found in the package's files, ignoring repeats.
    pub fn add_license_info_from_files(&mut self, license: LicenseExpression) {
        if !self.license_info_from_files.contains(&license) {
            self.license_info_from_files.push(license);
        }
    }

    /// Append a paragraph to the license comments.
    pub fn append_license_comment(&mut self, text: &str) {
        match self.license_comments.as_mut() {
            Some(existing) if !existing.is_empty() => {
                existing.push('\n');
                existing.push_str(text);
            }
            _ => self.license_comments = Some(text.to_string()),
        }
    }
}
