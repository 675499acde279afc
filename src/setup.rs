//! Environment bootstrap.
//!
//! Downloads the local data the analysis lessons depend on and validates
//! that everything is in place before class starts. Every step is
//! idempotent: running `snooscrape setup` twice downloads nothing the
//! second time, and `--force` re-downloads from scratch.

use crate::geo::{self, Gazetteer};
use crate::http::{HTTPError, HTTPService};
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SNOOSCRAPE_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";
const GAZETTEER_FILE: &str = "gazetteer.csv";

// A trimmed world-cities extract, a few megabytes instead of the gigabyte
// of full GeoNames data the original course tooling pulled down.
const GAZETTEER_URL: &str =
    "https://raw.githubusercontent.com/mdippery/snooscrape-data/main/gazetteer.csv";

/// A bootstrap error.
#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem operation failed.
    #[error("could not prepare data directory: {0}")]
    Io(#[from] std::io::Error),

    /// A download failed, even after retrying.
    #[error("could not download gazetteer: {0}")]
    Download(#[from] HTTPError),

    /// The downloaded data failed validation.
    #[error("gazetteer failed validation: {0}")]
    Validation(#[from] geo::Error),
}

/// The directory that holds downloaded data.
///
/// Defaults to `data/` next to the working directory -- the lessons keep
/// everything project-local -- but `$SNOOSCRAPE_DATA_DIR` overrides it.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Where the gazetteer lives on disk.
pub fn gazetteer_path() -> PathBuf {
    data_dir().join(GAZETTEER_FILE)
}

/// The result of a successful bootstrap, for reporting back to the
/// student.
#[derive(Debug)]
pub struct Summary {
    /// Where the data ended up.
    pub data_dir: PathBuf,

    /// Number of distinct place names in the validated gazetteer.
    pub places: usize,
}

/// Provisions and validates the local environment.
pub struct Bootstrap {
    force: bool,
    client: Client,
}

impl HTTPService for Bootstrap {}

impl Bootstrap {
    /// Creates a new bootstrapper.
    ///
    /// When `force` is true, data is re-downloaded even if it is already
    /// present.
    pub fn new(force: bool) -> Self {
        Self {
            force,
            client: Self::client(),
        }
    }

    /// Runs all provisioning steps, then validates the result.
    pub async fn run(&self) -> Result<Summary, Error> {
        self.ensure_data_dir()?;
        self.fetch_gazetteer().await?;
        self.validate()
    }

    fn ensure_data_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(data_dir())?;
        Ok(())
    }

    async fn fetch_gazetteer(&self) -> Result<(), Error> {
        let path = gazetteer_path();
        if path.exists() && !self.force {
            info!("gazetteer already present at {}", path.display());
            return Ok(());
        }
        match self.download(&path).await {
            Ok(()) => Ok(()),
            // One retry covers the transient classroom-wifi failure;
            // anything more persistent needs a human anyway.
            Err(err) => {
                warn!("gazetteer download failed, retrying once: {err}");
                self.download(&path).await
            }
        }
    }

    async fn download(&self, path: &Path) -> Result<(), Error> {
        info!("downloading gazetteer from {GAZETTEER_URL}");
        let resp = self
            .client
            .get(GAZETTEER_URL)
            .send()
            .await
            .map_err(HTTPError::Request)?;
        if !resp.status().is_success() {
            return Err(Error::Download(HTTPError::Http(resp.status())));
        }
        let body = resp.bytes().await.map_err(HTTPError::Body)?;
        fs::write(path, &body)?;
        Ok(())
    }

    fn validate(&self) -> Result<Summary, Error> {
        let gazetteer = Gazetteer::load(gazetteer_path())?;
        Ok(Summary {
            data_dir: data_dir(),
            places: gazetteer.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_the_gazetteer_inside_the_data_dir() {
        assert_eq!(gazetteer_path(), data_dir().join("gazetteer.csv"));
    }

    #[test]
    fn it_defaults_to_a_project_local_data_dir() {
        // Only meaningful when the override is not set, which is the
        // normal test environment.
        if env::var_os(DATA_DIR_ENV).is_none() {
            assert_eq!(data_dir(), PathBuf::from("data"));
        }
    }
}
