use super::{AutoHideTimer, MediaElement, PlaybackPhase, PlaybackState, PlayerSettings};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Owns the playback state for one media element and translates user intent
/// into element commands.
///
/// Every command is a silent no-op while the element is not ready.
pub struct PlaybackController<M: MediaElement> {
    media: M,
    state: Arc<watch::Sender<PlaybackState>>,
    timer: AutoHideTimer,
    settings: PlayerSettings,
    last_audible_volume: Option<f64>,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M, settings: PlayerSettings) -> Self {
        let initial = PlaybackState::default();
        let last_audible_volume = (initial.volume > 0.0).then_some(initial.volume);
        let (state, _) = watch::channel(initial);
        let mut controller = Self {
            media,
            state: Arc::new(state),
            timer: AutoHideTimer::new(settings.hide_delay()),
            settings,
            last_audible_volume,
        };
        controller.on_loaded_metadata();
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn settings(&self) -> PlayerSettings {
        self.settings
    }

    fn phase(&self) -> PlaybackPhase {
        self.state.borrow().phase
    }

    fn usable_duration(&self) -> Option<f64> {
        let duration = self.media.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    /// Media event: metadata (duration) became available.
    pub fn on_loaded_metadata(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        let duration = self.usable_duration().unwrap_or(0.0);
        self.state.send_modify(|s| {
            s.duration = duration;
            if s.phase == PlaybackPhase::Idle {
                s.phase = PlaybackPhase::Paused;
            }
        });
    }

    /// Media event: the playhead moved.
    pub fn on_time_update(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        let position = self.media.current_time();
        self.state.send_modify(|s| s.position = position);
    }

    /// Media event: playback reached the end.
    pub fn on_ended(&mut self) {
        self.timer.cancel();
        let duration = self.usable_duration();
        self.state.send_modify(|s| {
            s.phase = PlaybackPhase::Ended;
            s.controls_visible = true;
            if let Some(d) = duration {
                s.position = d;
            }
        });
    }

    pub fn toggle_play(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        if self.phase() == PlaybackPhase::Idle {
            self.on_loaded_metadata();
        }
        match self.phase() {
            PlaybackPhase::Playing => self.pause(),
            _ => self.play(),
        }
    }

    pub fn play(&mut self) {
        if !self.media.is_ready() || self.phase() == PlaybackPhase::Playing {
            return;
        }
        if self.phase() == PlaybackPhase::Ended {
            self.media.set_current_time(0.0);
        }
        if let Err(e) = self.media.play() {
            warn!("Playback failed to start: {:#}", e);
            return;
        }
        let position = self.media.current_time();
        self.state.send_modify(|s| {
            s.phase = PlaybackPhase::Playing;
            s.position = position;
            s.controls_visible = true;
        });
        self.timer.arm(self.state.clone());
    }

    pub fn pause(&mut self) {
        if !self.media.is_ready() || self.phase() != PlaybackPhase::Playing {
            return;
        }
        self.media.pause();
        self.timer.cancel();
        self.state.send_modify(|s| {
            s.phase = PlaybackPhase::Paused;
            s.controls_visible = true;
        });
    }

    /// Seek to `fraction` (0..=1) of the total duration, whatever the phase.
    pub fn seek(&mut self, fraction: f64) {
        if !self.media.is_ready() || fraction.is_nan() {
            return;
        }
        let Some(duration) = self.usable_duration() else {
            return;
        };
        self.set_position(fraction.clamp(0.0, 1.0) * duration, duration);
    }

    /// Seek from a click `offset` inside a progress track `track_width` wide.
    pub fn seek_from_pointer(&mut self, offset: f64, track_width: f64) {
        if track_width > 0.0 {
            self.seek(offset / track_width);
        }
    }

    /// Move the playhead by `delta` seconds, clamped to the media bounds.
    pub fn skip(&mut self, delta: f64) {
        if !self.media.is_ready() || !delta.is_finite() {
            return;
        }
        let Some(duration) = self.usable_duration() else {
            return;
        };
        let target = (self.media.current_time() + delta).clamp(0.0, duration);
        self.set_position(target, duration);
    }

    pub fn skip_forward(&mut self) {
        self.skip(self.settings.skip_seconds);
    }

    pub fn skip_back(&mut self) {
        self.skip(-self.settings.skip_seconds);
    }

    fn set_position(&mut self, position: f64, duration: f64) {
        self.media.set_current_time(position);
        self.state.send_modify(|s| {
            s.position = position;
            s.duration = duration;
            if s.phase == PlaybackPhase::Ended && position < duration {
                s.phase = PlaybackPhase::Paused;
            }
        });
    }

    /// A volume of exactly 0 mutes; anything above un-mutes.
    pub fn set_volume(&mut self, volume: f64) {
        if !self.media.is_ready() || volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if volume > 0.0 {
            self.last_audible_volume = Some(volume);
        }
        self.media.set_volume(volume);
        self.state.send_modify(|s| {
            s.volume = volume;
            s.muted = volume == 0.0;
        });
    }

    /// Silence output, keeping the stored volume for a later unmute.
    pub fn mute(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        self.media.set_volume(0.0);
        self.state.send_modify(|s| s.muted = true);
    }

    /// Restore the last non-zero volume, or full volume if there never was one.
    pub fn unmute(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        let restored = self.last_audible_volume.unwrap_or(1.0);
        self.media.set_volume(restored);
        self.state.send_modify(|s| {
            s.volume = restored;
            s.muted = false;
        });
    }

    pub fn toggle_mute(&mut self) {
        if self.state.borrow().muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        if !self.media.is_ready() {
            return;
        }
        if self.state.borrow().fullscreen {
            if let Err(e) = self.media.exit_fullscreen() {
                warn!("Error leaving fullscreen: {:#}", e);
            }
            self.on_fullscreen_change(false);
            return;
        }
        match self.media.request_fullscreen() {
            Ok(()) => self.on_fullscreen_change(true),
            Err(e) => warn!("Error attempting to enable fullscreen: {:#}", e),
        }
    }

    /// Fullscreen changed outside the controller (e.g. the user pressed Esc).
    pub fn on_fullscreen_change(&mut self, active: bool) {
        if !self.media.is_ready() {
            return;
        }
        self.state.send_if_modified(|s| {
            let changed = s.fullscreen != active;
            s.fullscreen = active;
            changed
        });
    }

    /// Pointer entered or moved over the player region.
    pub fn pointer_activity(&mut self) {
        self.state.send_if_modified(|s| {
            let changed = !s.controls_visible;
            s.controls_visible = true;
            changed
        });
        if self.phase() == PlaybackPhase::Playing {
            self.timer.arm(self.state.clone());
        } else {
            self.timer.cancel();
        }
    }

    /// Tear down explicitly; equivalent to dropping the controller.
    pub fn unmount(mut self) {
        debug!("Unmounting playback controller");
        self.timer.cancel();
    }
}
