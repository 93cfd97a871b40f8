//! Check, convert and merge SPDX tag-value documents.

#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![deny(missing_docs)]

use crate::cli::{Cli, Command, OutputArgs};
use crate::output::OutputManager;
use anyhow::{Context as _, Result};
use clap::Parser as _;
use spdx_tools::document::{format_timestamp, CreationInfo, CreationInfoBuilder, Creator};
use spdx_tools::{merge_documents, verification, MergeOptions, SpdxDocument, TagTable, Warning};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use time::OffsetDateTime;
use url::Url;

mod cli;
mod git;
mod output;

/// Program entrypoint, only calls `run` and reports errors.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        exit(1);
    }
}

/// Gathers CLI args and dispatches to the requested operation.
fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Verify { file } => verify(&file),
        Command::Convert { file, output } => convert(&file, &output),
        Command::Merge {
            master,
            others,
            host_url,
            name,
            output,
        } => merge(&master, &others, &host_url, name, &output),
        Command::VerificationCode { dir, exclude } => verification_code(&dir, &exclude),
    }
}

/// Parse and check a document, listing its warnings.
fn verify(path: &Path) -> Result<()> {
    let warnings = load(path, &mut io::stdout())?.1;
    println!("{}: {} warning(s)", path.display(), warnings);
    Ok(())
}

/// Read a document and write it out in the requested format.
fn convert(path: &Path, args: &OutputArgs) -> Result<()> {
    let output_manager = OutputManager::new(args);
    let (doc, _) = load(path, &mut warning_stream(&output_manager))?;
    output_manager.write_document(&doc)
}

/// Merge `others` into `master` and write out the result.
fn merge(
    master: &Path,
    others: &[PathBuf],
    host_url: &str,
    name: Option<String>,
    args: &OutputArgs,
) -> Result<()> {
    let output_manager = OutputManager::new(args);
    let mut report = warning_stream(&output_manager);

    let namespace = Url::parse(host_url)
        .with_context(|| format!("'{}' is not a valid URL", host_url))?
        .to_string();

    let (master_doc, _) = load(master, &mut report)?;
    let other_docs = others
        .iter()
        .map(|path| load(path, &mut report).map(|(doc, _)| doc))
        .collect::<Result<Vec<_>>>()?;

    let options = MergeOptions {
        namespace,
        name,
        creation_info: creation_info()?,
    };
    let merged = merge_documents(&master_doc, &other_docs, options)?;

    for skipped in &merged.skipped_files {
        writeln!(report, "skipped from the verification code: {}", skipped)?;
    }

    output_manager.write_document(&merged.document)
}

/// Print the verification code of the files under `dir`.
fn verification_code(dir: &Path, exclude: &[String]) -> Result<()> {
    let checksums = verification::hash_directory(dir)
        .with_context(|| format!("failed to read '{}'", dir.display()))?;

    // Package file names are written `./relative/path`.
    let exclude: Vec<String> = exclude
        .iter()
        .map(|name| {
            if name.starts_with("./") {
                name.clone()
            } else {
                format!("./{}", name)
            }
        })
        .collect();

    let code = verification::generate_from_checksums(
        checksums.iter().map(|(name, sha1)| (name.as_str(), sha1.as_str())),
        &exclude,
    );
    println!("{}", code);
    Ok(())
}

/// Parse a tag-value file, writing its warnings to `report`.
///
/// Returns the document and how many warnings it had.
fn load(path: &Path, report: &mut dyn Write) -> Result<(SpdxDocument, usize)> {
    let file = File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let parsed = spdx_tools::parse_document(file, &TagTable::default())
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    print_warnings(path, &parsed.warnings, report)?;
    Ok((parsed.document, parsed.warnings.len()))
}

/// Write each warning on its own line, prefixed by the file it came from.
fn print_warnings(path: &Path, warnings: &[Warning], report: &mut dyn Write) -> Result<()> {
    for warning in warnings {
        writeln!(report, "{}: warning: {}", path.display(), warning)?;
    }
    Ok(())
}

/// Warnings go to standard output unless the document is going there.
fn warning_stream(output_manager: &OutputManager) -> Box<dyn Write> {
    if output_manager.is_stdout() {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

/// Describe this run as the creator of a merged document.
///
/// The Git user is listed when one is configured.
fn creation_info() -> Result<CreationInfo> {
    let mut creators = vec![];
    match git::current_user() {
        Ok(user) => creators.push(user),
        Err(e) => log::debug!(target: "spdx_tools", "no git user: {}", e),
    }
    creators.push(Creator::tool(concat!("spdx-tools ", env!("CARGO_PKG_VERSION"))));

    Ok(CreationInfoBuilder::default()
        .creators(creators)
        .created(format_timestamp(OffsetDateTime::now_utc()))
        .build()?)
}
