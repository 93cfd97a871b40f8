//! Functions for getting git metadata.

use anyhow::Result;
use spdx_tools::document::Creator;

/// Get the current Git user as a document creator.
///
/// This requires that the name is specified, but permits the
/// email to be missing.
pub fn current_user() -> Result<Creator> {
    let git_config = git2::Config::open_default()?.snapshot()?;
    let name = git_config.get_str("user.name")?.to_owned();
    let email = git_config.get_str("user.email").ok().map(ToOwned::to_owned);
    log::debug!(target: "spdx_tools", "git user is {}", name);
    Ok(Creator::person(name, email))
}
