//! Defines the output formats supported by `spdx-tools`.

pub mod tag_value;

use crate::document::SpdxDocument;
use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::str::FromStr;

/// The output format for the SPDX document.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// Key-value format.
    KeyValue,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
    /// RDF format.
    Rdf,
}

impl Format {
    /// Get the file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::KeyValue => ".spdx",
            Format::Json => ".spdx.json",
            Format::Yaml => ".spdx.yaml",
            Format::Rdf => ".spdx.rdf",
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::KeyValue
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::KeyValue => write!(f, "Key-Value"),
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
            Format::Rdf => write!(f, "RDF"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kv" | "Key-Value" => Ok(Format::KeyValue),
            "json" | "JSON" => Ok(Format::Json),
            "yaml" | "YAML" => Ok(Format::Yaml),
            "rdf" | "RDF" => Ok(Format::Rdf),
            s => Err(format!("unknown format '{}'", s)),
        }
    }
}

/// Write `doc` to `w` in `format`.
pub fn write<W: Write>(mut w: W, doc: &SpdxDocument, format: Format) -> Result<()> {
    log::info!(target: "spdx_tools", "writing '{}' as {}", doc.label(), format);

    match format {
        Format::KeyValue => tag_value::write(&mut w, doc)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut w, doc)?;
            writeln!(w)?;
        }
        Format::Yaml => serde_yaml::to_writer(&mut w, doc)?,
        Format::Rdf => return Err(Error::UnsupportedFormat(format.to_string())),
    }

    w.flush()?;
    Ok(())
}
