//! Core library for the camcast camera viewer.
//!
//! Holds everything that is not HTTP-facing: configuration, logging setup,
//! the settings store, the camera abstraction and the frame broadcaster that
//! mediates between the single capture task and any number of readers.

pub mod broadcaster;
pub mod camera;
pub mod config;
pub mod error;
pub mod logging;
pub mod settings;

pub use broadcaster::{CaptureState, FrameBroadcaster};
pub use camera::{CaptureSettings, DirectoryFrameSource, FrameSource, FrameStream};
pub use config::Config;
pub use error::{Error, Result};
pub use settings::SettingsStore;
