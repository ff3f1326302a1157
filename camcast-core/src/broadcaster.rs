//! Frame broadcaster: one capture producer, many concurrent readers.
//!
//! The broadcaster owns the single current frame and the capture lifecycle.
//! Capture starts lazily on the first read and stops itself once no reader
//! has asked for a frame within [`IDLE_TIMEOUT`], so the device is only held
//! open while somebody is watching.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::camera::{CaptureSettings, FrameSource, FrameStream};
use crate::error::{Error, Result};

/// Reads must arrive within this window to keep the capture loop alive.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Stopped,
    Running,
}

pub struct FrameBroadcaster {
    source: Arc<dyn FrameSource>,
    capture_settings: CaptureSettings,
    /// Serializes start attempts so concurrent cold-start readers never open
    /// the device twice.
    start_lock: AsyncMutex<()>,
    state_tx: watch::Sender<CaptureState>,
    frame_tx: watch::Sender<Option<Bytes>>,
    last_access: Mutex<Instant>,
}

impl FrameBroadcaster {
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        let (state_tx, _) = watch::channel(CaptureState::Stopped);
        let (frame_tx, _) = watch::channel(None);
        Self {
            source,
            capture_settings: CaptureSettings::default(),
            start_lock: AsyncMutex::new(()),
            state_tx,
            frame_tx,
            last_access: Mutex::new(Instant::now()),
        }
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        *self.state_tx.borrow()
    }

    /// Return the latest frame, starting capture first if it is stopped.
    ///
    /// Blocks cooperatively until a frame is available. All cold-start
    /// callers share the same first frame; there are no per-reader queues.
    /// Fails with [`Error::CaptureUnavailable`] when the source cannot be
    /// opened, leaving the state at `Stopped` so a later call retries.
    pub async fn get_frame(self: &Arc<Self>) -> Result<Bytes> {
        loop {
            *self.last_access.lock() = Instant::now();
            self.ensure_capture().await?;

            let mut frame_rx = self.frame_tx.subscribe();
            let mut state_rx = self.state_tx.subscribe();
            tokio::select! {
                frame = frame_rx.wait_for(|f| f.is_some()) => {
                    let guard = frame
                        .map_err(|_| Error::capture_unavailable("frame channel closed"))?;
                    if let Some(frame) = guard.as_ref() {
                        return Ok(frame.clone());
                    }
                }
                _ = state_rx.wait_for(|s| *s == CaptureState::Stopped) => {
                    // Capture exited before its first frame; retry the start.
                }
            }
        }
    }

    async fn ensure_capture(self: &Arc<Self>) -> Result<()> {
        if self.state() == CaptureState::Running {
            return Ok(());
        }
        let _guard = self.start_lock.lock().await;
        if self.state() == CaptureState::Running {
            return Ok(());
        }

        let stream = self
            .source
            .open(self.capture_settings)
            .await
            .map_err(|e| match e {
                Error::CaptureUnavailable(_) => e,
                other => Error::capture_unavailable(other.to_string()),
            })?;

        self.state_tx.send_replace(CaptureState::Running);
        let broadcaster = Arc::clone(self);
        tokio::spawn(async move { broadcaster.capture_loop(stream).await });
        info!(
            width = self.capture_settings.width,
            height = self.capture_settings.height,
            "Capture started"
        );
        Ok(())
    }

    /// One instance runs per activation; exits on idle or source error and
    /// resets the state to `Stopped` so a future read can start over.
    async fn capture_loop(self: Arc<Self>, mut stream: Box<dyn FrameStream>) {
        loop {
            match stream.next_frame().await {
                Ok(frame) => {
                    self.frame_tx.send_replace(Some(frame));
                }
                Err(e) => {
                    warn!("Capture interrupted: {e}");
                    break;
                }
            }

            // The idle check sits between hardware frames, so shutdown
            // latency is bounded by the source frame rate.
            let idle = self.last_access.lock().elapsed();
            if idle > IDLE_TIMEOUT {
                debug!(idle_secs = idle.as_secs(), "No readers, stopping capture");
                break;
            }
        }
        // Release the device before announcing the stop.
        drop(stream);
        self.state_tx.send_replace(CaptureState::Stopped);
        info!("Capture stopped");
    }
}
