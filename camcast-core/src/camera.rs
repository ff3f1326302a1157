//! Camera capability abstraction.
//!
//! A [`FrameSource`] opens the device and hands back a [`FrameStream`] that
//! yields encoded JPEG buffers until dropped. Hardware drivers implement
//! these traits out of tree; the crate ships [`DirectoryFrameSource`], which
//! cycles the JPEG files of a directory at a fixed interval, for development
//! and tests.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Error, Result};

/// Capture parameters passed to [`FrameSource::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub mirror_horizontal: bool,
    pub mirror_vertical: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            mirror_horizontal: true,
            mirror_vertical: true,
        }
    }
}

/// Factory for capture sessions. One open session exists at a time.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Open the device. The returned stream releases it on drop.
    async fn open(&self, settings: CaptureSettings) -> Result<Box<dyn FrameStream>>;
}

/// An open capture session producing encoded JPEG buffers.
#[async_trait]
pub trait FrameStream: Send {
    async fn next_frame(&mut self) -> Result<Bytes>;
}

/// Frame source that replays the `.jpg` files of a directory in a loop.
///
/// Mirror flags are ignored: the files are served as-is, already encoded.
#[derive(Debug, Clone)]
pub struct DirectoryFrameSource {
    dir: PathBuf,
    frame_interval: Duration,
}

impl DirectoryFrameSource {
    pub fn new(dir: impl Into<PathBuf>, frame_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            frame_interval,
        }
    }
}

#[async_trait]
impl FrameSource for DirectoryFrameSource {
    async fn open(&self, _settings: CaptureSettings) -> Result<Box<dyn FrameStream>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            Error::capture_unavailable(format!(
                "cannot read frame directory {}: {e}",
                self.dir.display()
            ))
        })?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_jpeg = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));
            if is_jpeg {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(Error::capture_unavailable(format!(
                "no JPEG files in {}",
                self.dir.display()
            )));
        }
        files.sort();

        Ok(Box::new(DirectoryFrameStream {
            files,
            next: 0,
            frame_interval: self.frame_interval,
        }))
    }
}

struct DirectoryFrameStream {
    files: Vec<PathBuf>,
    next: usize,
    frame_interval: Duration,
}

#[async_trait]
impl FrameStream for DirectoryFrameStream {
    async fn next_frame(&mut self) -> Result<Bytes> {
        tokio::time::sleep(self.frame_interval).await;
        let path = &self.files[self.next % self.files.len()];
        self.next = self.next.wrapping_add(1);
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }
}
