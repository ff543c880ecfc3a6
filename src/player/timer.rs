use super::PlaybackState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

/// Single-shot, re-armable timer that hides the control overlay.
///
/// At most one timer is live. Arming cancels the previous one, and a timer
/// whose epoch is stale when it wakes leaves the state untouched, so an abort
/// racing with the wake-up can never hide controls that were just shown.
#[derive(Debug)]
pub struct AutoHideTimer {
    delay: Duration,
    epoch: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl AutoHideTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            epoch: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    pub fn arm(&mut self, state: Arc<watch::Sender<PlaybackState>>) {
        self.cancel();
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available, controls will not auto-hide");
            return;
        };
        let armed_at = self.epoch.load(Ordering::SeqCst);
        let epoch = self.epoch.clone();
        let delay = self.delay;
        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_if_modified(|s| {
                if epoch.load(Ordering::SeqCst) != armed_at || !s.is_playing() || !s.controls_visible
                {
                    return false;
                }
                s.controls_visible = false;
                true
            });
        }));
    }

    pub fn cancel(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutoHideTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
