//! Media upload adapter: streams an uploaded file to local disk.
//!
//! The catalog may later store the returned reference in a product's `image`
//! field; nothing here validates file contents.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// How stored files are named.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Keep the (sanitized) client file name. Re-uploads overwrite.
    Original,
    /// Prefix the sanitized name with a UUIDv7.
    #[default]
    Unique,
}

impl FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "unique" => Ok(Self::Unique),
            other => Err(format!("expected `original` or `unique`, got `{other}`")),
        }
    }
}

/// 1 GiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    pub destination: PathBuf,
    pub naming: NamingStrategy,
    /// Largest accepted file, in bytes.
    pub max_bytes: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("./uploads"),
            naming: NamingStrategy::default(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    /// Stored file name, relative to the destination directory.
    pub reference: String,
    pub original_name: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    config: MediaConfig,
}

impl MediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    pub fn destination(&self) -> &Path {
        &self.config.destination
    }

    pub fn max_bytes(&self) -> u64 {
        self.config.max_bytes
    }

    /// Start an upload for a client-supplied file name.
    pub async fn begin(&self, original_name: &str) -> Result<MediaUpload, MediaError> {
        fs::create_dir_all(&self.config.destination).await?;

        let reference = self.stored_name(original_name);
        let path = self.config.destination.join(&reference);
        let file = fs::File::create(&path).await?;

        tracing::debug!(path = %path.display(), "media upload started");
        Ok(MediaUpload {
            file,
            path,
            reference,
            original_name: original_name.to_string(),
            size: 0,
            max_bytes: self.config.max_bytes,
        })
    }

    /// Store a file that is already fully in memory.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<MediaRef, MediaError> {
        let mut upload = self.begin(original_name).await?;
        if let Err(e) = upload.write_chunk(bytes).await {
            upload.discard().await;
            return Err(e);
        }
        upload.finish().await
    }

    fn stored_name(&self, original_name: &str) -> String {
        let clean = sanitize_file_name(original_name);
        match self.config.naming {
            NamingStrategy::Original => clean,
            NamingStrategy::Unique => format!("{}-{}", Uuid::now_v7(), clean),
        }
    }
}

/// An in-progress upload. Dropping it without `finish` leaves a partial file;
/// call `abort` to remove it.
#[derive(Debug)]
pub struct MediaUpload {
    file: fs::File,
    path: PathBuf,
    reference: String,
    original_name: String,
    size: u64,
    max_bytes: u64,
}

impl MediaUpload {
    /// Append `chunk`. Fails with `TooLarge` before writing past the limit.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), MediaError> {
        if self.size + chunk.len() as u64 > self.max_bytes {
            return Err(MediaError::TooLarge {
                limit: self.max_bytes,
            });
        }
        self.file.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<MediaRef, MediaError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        tracing::info!(reference = %self.reference, size = self.size, "media stored");

        Ok(MediaRef {
            reference: self.reference,
            original_name: self.original_name,
            size: self.size,
        })
    }

    pub async fn abort(self) -> Result<(), MediaError> {
        drop(self.file);
        fs::remove_file(&self.path).await?;
        Ok(())
    }

    /// `abort`, logging rather than returning a cleanup failure.
    pub async fn discard(self) {
        let path = self.path.clone();
        if let Err(e) = self.abort().await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial upload");
        }
    }
}

/// Last path segment of `name`, restricted to `[A-Za-z0-9._-]`.
fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let clean: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    if clean.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        clean
    }
}
