//! Defines the CLI for `spdx-tools`.

use clap::{Args, Parser, Subcommand};
use spdx_tools::Format;
use std::path::PathBuf;

/// Contains the parsed CLI arguments.
#[derive(Debug, Parser)]
#[clap(version, about, long_about = None)]
pub struct Cli {
    /// The operation to run.
    #[clap(subcommand)]
    pub command: Command,
}

/// The operations `spdx-tools` can run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a tag-value document and report every problem found in it.
    Verify {
        /// The tag-value file to check.
        file: PathBuf,
    },

    /// Read a tag-value document and write it out again.
    Convert {
        /// The tag-value file to read.
        file: PathBuf,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Merge tag-value documents into a new document.
    Merge {
        /// The document whose package and license identifiers are kept.
        master: PathBuf,

        /// The documents merged into the master.
        #[clap(required = true)]
        others: Vec<PathBuf>,

        /// The URL where the merged document will be hosted.
        #[clap(short = 'H', long)]
        host_url: String,

        /// The name of the merged document.
        #[clap(short, long)]
        name: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Compute the package verification code of a directory.
    VerificationCode {
        /// The directory holding the package files.
        dir: PathBuf,

        /// A file to leave out, relative to the directory.
        #[clap(short, long)]
        exclude: Vec<String>,
    },
}

/// Where and how a document is written.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// The output format to use.
    #[clap(short, long)]
    pub format: Option<Format>,

    /// The name of a file to write out to, instead of standard output.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[clap(long)]
    pub force: bool,
}

impl OutputArgs {
    /// Get the selected format, or the default.
    pub fn format(&self) -> Format {
        self.format.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_arguments() {
        let cli = Cli::parse_from([
            "spdx-tools",
            "merge",
            "a.spdx",
            "b.spdx",
            "c.spdx",
            "-H",
            "http://example.com/merged",
            "-f",
            "json",
            "--force",
        ]);
        match cli.command {
            Command::Merge {
                master,
                others,
                host_url,
                output,
                ..
            } => {
                assert_eq!(master, PathBuf::from("a.spdx"));
                assert_eq!(others.len(), 2);
                assert_eq!(host_url, "http://example.com/merged");
                assert_eq!(output.format(), Format::Json);
                assert!(output.force);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn merge_needs_another_document() {
        assert!(Cli::try_parse_from(["spdx-tools", "merge", "a.spdx", "-H", "http://x"]).is_err());
    }

    #[test]
    fn repeated_excludes() {
        let cli = Cli::parse_from(["spdx-tools", "verification-code", "pkg", "-e", "a", "-e", "b"]);
        match cli.command {
            Command::VerificationCode { exclude, .. } => assert_eq!(exclude, vec!["a", "b"]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
