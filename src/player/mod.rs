//! Playback control surface for a single media element.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod controller;
mod timer;

pub use controller::PlaybackController;
pub use timer::AutoHideTimer;

pub const DEFAULT_HIDE_DELAY_MS: u64 = 3000;
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;

/// The media primitive the controller drives (an HTML video element, a
/// native decoder, a test double).
pub trait MediaElement: Send {
    /// Metadata is loaded and the element accepts commands.
    fn is_ready(&self) -> bool;
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn request_fullscreen(&mut self) -> Result<()>;
    fn exit_fullscreen(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Paused,
    Playing,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub controls_visible: bool,
    pub fullscreen: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            controls_visible: true,
            fullscreen: false,
        }
    }
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// What the element actually outputs.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn time_label(&self) -> String {
        format!("{} / {}", format_time(self.position), format_time(self.duration))
    }
}

/// Tunables handed to the client alongside the watch view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub hide_delay_ms: u64,
    pub skip_seconds: f64,
}

impl PlayerSettings {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
            skip_seconds: DEFAULT_SKIP_SECONDS,
        }
    }
}

/// `m:ss`, seconds zero-padded below ten. Minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0) as u64
    } else {
        0
    };
    let minutes = total / 60;
    let secs = total % 60;
    format!("{}:{:02}", minutes, secs)
}
