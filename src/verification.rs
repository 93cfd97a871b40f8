//! Package verification codes.
//!
//! A verification code is the SHA-1 of the concatenated, sorted SHA-1 hex
//! digests of every file in a package, minus the excluded files.

use crate::document::SpdxFile;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use walkdir::WalkDir;

/// A package verification code and the files left out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationCode {
    /// Lower-case hex SHA-1.
    #[serde(rename = "packageVerificationCodeValue")]
    pub value: String,
    /// Files left out of the digest, as written in the package.
    #[serde(
        rename = "packageVerificationCodeExcludedFiles",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub excluded_file_names: BTreeSet<String>,
}

impl VerificationCode {
    /// Whether the value has the shape of a SHA-1 digest.
    pub fn is_well_formed(&self) -> bool {
        crate::document::is_sha1_hex(&self.value)
    }
}

impl Display for VerificationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.excluded_file_names.is_empty() {
            let names: Vec<&str> = self.excluded_file_names.iter().map(String::as_str).collect();
            write!(f, " (excludes: {})", names.join(", "))?;
        }
        Ok(())
    }
}

impl FromStr for VerificationCode {
    type Err = String;

    /// Parses `<sha1> (excludes: a, b)`; the excludes part is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (value, rest) = match s.find('(') {
            Some(open) => (s[..open].trim(), Some(&s[open + 1..])),
            None => (s, None),
        };
        if value.is_empty() || value.contains(char::is_whitespace) {
            return Err(format!("malformed verification code '{}'", s));
        }

        let mut excluded_file_names = BTreeSet::new();
        if let Some(rest) = rest {
            let rest = rest
                .strip_suffix(')')
                .ok_or_else(|| format!("unclosed excludes list in '{}'", s))?;
            let rest = rest.trim_start();
            let names = rest
                .strip_prefix("excludes:")
                .or_else(|| rest.strip_prefix("excludes"))
                .unwrap_or(rest);
            excluded_file_names.extend(
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(ToOwned::to_owned),
            );
        }

        Ok(VerificationCode {
            value: value.to_ascii_lowercase(),
            excluded_file_names,
        })
    }
}

/// Generate the verification code over `files`, leaving out `excluded`.
///
/// Files without a SHA-1 cannot contribute and are skipped; callers that
/// care list them in `excluded`.
pub fn generate<'a, I, S>(files: I, excluded: &[S]) -> VerificationCode
where
    I: IntoIterator<Item = &'a SpdxFile>,
    S: AsRef<str>,
{
    generate_from_checksums(
        files
            .into_iter()
            .filter_map(|f| f.sha1.as_deref().map(|sha1| (f.name.as_str(), sha1))),
        excluded,
    )
}

/// Generate the verification code from `(file name, sha1 hex)` pairs.
pub fn generate_from_checksums<'a, I, S>(checksums: I, excluded: &[S]) -> VerificationCode
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
    S: AsRef<str>,
{
    let excluded_file_names: BTreeSet<String> =
        excluded.iter().map(|s| s.as_ref().to_string()).collect();

    let mut digests: Vec<String> = checksums
        .into_iter()
        .filter(|(name, _)| !excluded_file_names.contains(*name))
        .map(|(_, sha1)| sha1.trim().to_ascii_lowercase())
        .collect();
    digests.sort();

    let mut hasher = Sha1::new();
    for digest in &digests {
        hasher.update(digest.as_bytes());
    }

    VerificationCode {
        value: hex::encode(hasher.finalize()),
        excluded_file_names,
    }
}

/// SHA-1 every regular file below `root`.
///
/// Names are relative to `root`, `/`-separated and prefixed with `./`, the
/// way SPDX documents name package files. Results are sorted by name.
pub fn hash_directory(root: &Path) -> io::Result<Vec<(String, String)>> {
    let mut out = vec![];

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        // PANIC SAFETY: Every entry yielded by the walk is below `root`.
        let relative = entry.path().strip_prefix(root).unwrap();
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let mut file = fs::File::open(entry.path())?;
        let mut sha1 = Sha1::new();
        io::copy(&mut file, &mut sha1)?;
        log::debug!(target: "spdx_tools", "hashed {}", name);

        out.push((format!("./{}", name), hex::encode(sha1.finalize())));
    }

    out.sort();
    Ok(out)
}
