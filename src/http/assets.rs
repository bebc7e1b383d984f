//! Static file serving.
//!
//! `/` maps to the configured entry file; every other unrouted path is
//! looked up under the asset root. Missing files get tower-http's 404.

use std::path::PathBuf;

use tower_http::services::{ServeDir, ServeFile};

use crate::config::AssetConfig;

/// Path of the HTML entry file served at `/`.
pub fn index_path(config: &AssetConfig) -> PathBuf {
    PathBuf::from(&config.root).join(&config.index_file)
}

/// Service for `GET /`.
pub fn index_service(config: &AssetConfig) -> ServeFile {
    ServeFile::new(index_path(config))
}

/// Service for everything under the asset root.
pub fn asset_service(config: &AssetConfig) -> ServeDir {
    ServeDir::new(&config.root)
}
