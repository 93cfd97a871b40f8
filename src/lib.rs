//! Read, check, convert and merge SPDX documents.
//!
//! The tag-value reader lives in [`tagvalue`], the document model in
//! [`document`], and [`merge`] combines documents whose extracted
//! licenses are renumbered with a [`LicenseMapper`].

#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![deny(missing_docs)]

pub mod document;
pub mod error;
pub mod format;
pub mod license;
pub mod merge;
pub mod pointer;
pub mod tagvalue;
pub mod verification;

pub use crate::document::SpdxDocument;
pub use crate::error::{Error, Result, Warning, WarningKind};
pub use crate::format::Format;
pub use crate::license::{ExtractedLicense, LicenseExpression, LicenseMapper, SourceId};
pub use crate::merge::{merge_documents, MergeOptions, Merged};
pub use crate::tagvalue::{parse_document, Parsed, TagTable};
pub use crate::verification::VerificationCode;
