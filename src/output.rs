use crate::cli::OutputArgs;
use anyhow::{anyhow, Result};
use spdx_tools::{format, Format, SpdxDocument};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::ops::Not as _;
use std::path::PathBuf;

/// Handles writing to the correct path.
#[derive(Debug)]
pub struct OutputManager {
    /// The path to be written to, or `None` for standard output.
    to: Option<PathBuf>,
    /// The format to write the output in.
    format: Format,
    /// Whether output is being forced.
    force: bool,
}

impl OutputManager {
    /// Get a new output manager based on CLI args.
    pub fn new(args: &OutputArgs) -> Self {
        OutputManager {
            to: args.output.clone(),
            format: args.format(),
            force: args.force,
        }
    }

    /// Whether the document goes to standard output.
    #[inline]
    pub fn is_stdout(&self) -> bool {
        self.to.is_none()
    }

    /// Write the document to the output in the specified format.
    pub fn write_document(&self, doc: &SpdxDocument) -> Result<()> {
        if self.format == Format::Rdf {
            return Err(anyhow!("{} format not yet implemented", self.format));
        }

        // Get the writer to the right output stream, if conditions are met.
        let writer = self.get_writer()?;
        format::write(writer, doc, self.format)?;

        if let Some(to) = &self.to {
            log::info!(target: "spdx_tools", "wrote {}", to.display());
        }
        Ok(())
    }

    /// Get a writer to the output file, or to standard output.
    ///
    /// Returns an error if the output file already exists and the user hasn't set output
    /// to be forced.
    fn get_writer(&self) -> Result<Box<dyn Write>> {
        let to = match &self.to {
            Some(to) => to,
            None => return Ok(Box::new(BufWriter::new(stdout()))),
        };

        // A little truth table making clear this conditional is the right one.
        //
        // ---------
        // | T | T | - forcing and exists - no error
        // | T | F | - forcing and doesn't exist - no error
        // | F | T | - not forcing and exists - error
        // | F | F | - not forcing and doesn't exist - no error
        // ---------
        if self.force.not() && to.exists() {
            return Err(anyhow!("'{}' already exists", to.display()));
        }

        Ok(Box::new(BufWriter::new(File::create(to)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manager(to: PathBuf, force: bool) -> OutputManager {
        OutputManager {
            to: Some(to),
            format: Format::KeyValue,
            force,
        }
    }

    fn doc() -> SpdxDocument {
        SpdxDocument {
            spdx_version: "SPDX-1.2".to_string(),
            namespace: "http://example.com/out".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn existing_files_need_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.spdx");
        fs::write(&path, "keep me").unwrap();

        assert!(manager(path.clone(), false).write_document(&doc()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        manager(path.clone(), true).write_document(&doc()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("SPDXVersion: SPDX-1.2"));
    }

    #[test]
    fn rdf_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.spdx.rdf");
        let mut manager = manager(path.clone(), false);
        manager.format = Format::Rdf;

        assert!(manager.write_document(&doc()).is_err());
        assert!(!path.exists());
    }
}
