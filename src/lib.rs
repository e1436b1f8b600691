// Library root
// -----------
// The binary (`main.rs`) loads the config, picks the active profile and
// hands the file list to `run`.
//
// Module responsibilities:
// - `config`: locating and parsing `config.yml`, profile selection.
// - `api`: the blocking HTTP client that performs one upload per file.
// - `error`: the error type shared by both.
pub mod api;
pub mod config;
pub mod error;

pub use api::ApiClient;
pub use config::{Configuration, UserProfile};
pub use error::{Error, Result};

use log::info;
use std::io::{self, Write};
use std::path::Path;

/// Outcome counts of one `run`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub uploaded: usize,
    pub failed: usize,
}

/// Upload each path in order, writing the URL or an `ERROR:` line per file
/// to `out`. A failed upload does not stop the remaining ones.
pub fn run<I, P, W>(api: &ApiClient, paths: I, out: &mut W) -> io::Result<RunSummary>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    W: Write,
{
    let mut summary = RunSummary::default();
    for path in paths {
        match api.upload(path.as_ref()) {
            Ok(url) => {
                summary.uploaded += 1;
                writeln!(out, "{}", url)?;
            }
            Err(e) => {
                summary.failed += 1;
                writeln!(out, "ERROR: {}", e)?;
            }
        }
    }
    info!("{} uploaded, {} failed", summary.uploaded, summary.failed);
    Ok(summary)
}
