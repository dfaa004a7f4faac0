//! Design-file provider contract.
//!
//! The pipeline never performs I/O itself. Whatever fetches a file (an HTTP
//! relay, a cache, a fixture directory) implements `DesignSource` and hands
//! the resulting `DesignFile` to the extractor.

use crate::{DesignFile, TreeError};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Failure to obtain a design file or node images.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("access denied: {message}")]
    Unauthorized { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl FetchError {
    /// Translate a provider status code into a fetch error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => FetchError::Unauthorized { message },
            404 => FetchError::NotFound { message },
            status => FetchError::Upstream { status, message },
        }
    }
}

/// Something that can produce design files and node renders.
pub trait DesignSource {
    /// Fetch a whole file by key.
    fn fetch_file(&self, file_key: &str) -> Result<DesignFile, FetchError>;

    /// Map node ids to renderable image references. Ids without an image are
    /// absent from the result.
    fn fetch_node_images(
        &self,
        file_key: &str,
        node_ids: &[&str],
    ) -> Result<BTreeMap<String, String>, FetchError>;
}

/// Serves files from a directory: `<root>/<key>.json` for the file response
/// and `<root>/<key>.images.json` for the node image map.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, file_key: &str, suffix: &str) -> Result<PathBuf, FetchError> {
        if file_key.is_empty() || file_key.contains(['/', '\\']) || file_key.starts_with('.') {
            return Err(FetchError::InvalidRequest {
                message: format!("bad file key {file_key:?}"),
            });
        }
        Ok(self.root.join(format!("{file_key}{suffix}")))
    }

    fn read(&self, path: &Path) -> Result<String, FetchError> {
        debug!("reading {}", path.display());
        std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FetchError::NotFound {
                    message: path.display().to_string(),
                }
            } else {
                FetchError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }
}

impl DesignSource for DirectorySource {
    fn fetch_file(&self, file_key: &str) -> Result<DesignFile, FetchError> {
        let path = self.path_for(file_key, ".json")?;
        let source = self.read(&path)?;
        Ok(DesignFile::from_json(&source)?)
    }

    fn fetch_node_images(
        &self,
        file_key: &str,
        node_ids: &[&str],
    ) -> Result<BTreeMap<String, String>, FetchError> {
        if node_ids.is_empty() {
            return Err(FetchError::InvalidRequest {
                message: "no node ids requested".into(),
            });
        }

        let path = self.path_for(file_key, ".images.json")?;
        let source = self.read(&path)?;
        let value = crate::parse_document(&source)?;

        // Accept either `{ "images": {...} }` or the bare map.
        let table = match value.get("images") {
            Some(Value::Object(images)) => images,
            _ => match &value {
                Value::Object(images) => images,
                _ => {
                    return Err(FetchError::Tree(TreeError::Shape {
                        message: "image map must be an object".into(),
                    }))
                }
            },
        };

        Ok(node_ids
            .iter()
            .filter_map(|id| {
                let url = table.get(*id)?.as_str()?;
                Some(((*id).to_string(), url.to_string()))
            })
            .collect())
    }
}
