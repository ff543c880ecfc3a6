use super::{PageError, PageKind, PageState};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Holds the state of the page currently on screen and owns its in-flight
/// fetch.
///
/// Starting a new load aborts the previous one. A result that still arrives
/// from a superseded load is dropped by the generation check, and dropping
/// the slot aborts whatever is in flight.
pub struct Page<T> {
    state: Arc<watch::Sender<PageState<T>>>,
    generation: Arc<AtomicU64>,
    inflight: Option<JoinHandle<()>>,
}

impl<T> Page<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(PageState::Loading);
        Self {
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            inflight: None,
        }
    }

    /// Replace whatever is loading with `fetch`.
    pub fn load<F>(&mut self, kind: PageKind, fetch: F)
    where
        F: Future<Output = Result<T, PageError>> + Send + 'static,
    {
        self.cancel();
        self.state.send_replace(PageState::Loading);

        let mut guard = CommitGuard {
            state: self.state.clone(),
            current: self.generation.clone(),
            generation: self.generation.load(Ordering::SeqCst),
            kind,
            armed: true,
        };
        self.inflight = Some(tokio::spawn(async move {
            let next = match fetch.await {
                Ok(value) => PageState::Ready(value),
                Err(e) => {
                    warn!(page = ?kind, "Page load failed: {}", e);
                    PageState::Failed(e.user_message(kind).to_string())
                }
            };
            if !guard.commit(next) {
                debug!(page = ?kind, "Discarding result of superseded page load");
            }
        }));
    }

    /// Abort the in-flight load, if any. The state is left as it was.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Cancelling in-flight page load");
            }
            handle.abort();
        }
    }

    pub fn state(&self) -> PageState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<T>> {
        self.state.subscribe()
    }

    /// Wait until the current load settles. With nothing in flight (never
    /// loaded, or cancelled) this is the current state, even `Loading`.
    pub async fn settled(&self) -> PageState<T> {
        if self.inflight.is_none() {
            return self.state();
        }
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|s| !s.is_loading()).await {
            Ok(s) => s.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}

impl<T> Default for Page<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Page<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

/// Publishes a load's outcome if its generation is still current. A load
/// that dies without a result (the fetch panicked) is published as failed.
struct CommitGuard<T> {
    state: Arc<watch::Sender<PageState<T>>>,
    current: Arc<AtomicU64>,
    generation: u64,
    kind: PageKind,
    armed: bool,
}

impl<T> CommitGuard<T> {
    fn commit(&mut self, next: PageState<T>) -> bool {
        self.armed = false;
        let (current, generation) = (&self.current, self.generation);
        self.state.send_if_modified(|slot| {
            if current.load(Ordering::SeqCst) != generation {
                return false;
            }
            *slot = next;
            true
        })
    }
}

impl<T> Drop for CommitGuard<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let message = self.kind.failure_message().to_string();
        if self.commit(PageState::Failed(message)) {
            error!(page = ?self.kind, "Page load ended without a result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn commits_ready_value() {
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Details, async { Ok(7) });
        assert_eq!(page.settled().await, PageState::Ready(7));
    }

    #[tokio::test]
    async fn failure_becomes_static_message() {
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Category, async {
            Err(PageError::from(anyhow!("backend down")))
        });
        assert_eq!(
            page.settled().await,
            PageState::Failed("Failed to fetch movies. Please try again later.".to_string())
        );
    }

    #[tokio::test]
    async fn navigating_away_discards_the_slow_result() {
        let mut page: Page<&'static str> = Page::new();
        let (release_slow, slow_gate) = oneshot::channel::<()>();
        page.load(PageKind::Details, async move {
            let _ = slow_gate.await;
            Ok("stale")
        });
        page.load(PageKind::Details, async { Ok("fresh") });
        assert_eq!(page.settled().await, PageState::Ready("fresh"));

        let _ = release_slow.send(());
        tokio::task::yield_now().await;
        assert_eq!(page.state(), PageState::Ready("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_keeps_loading_state() {
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Search, async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(1)
        });
        page.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(page.state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_returns_after_cancel() {
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Details, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        });
        page.cancel();
        let settled = tokio::time::timeout(Duration::from_secs(2), page.settled()).await;
        assert_eq!(settled.ok(), Some(PageState::Loading));
    }

    #[tokio::test]
    async fn panicking_fetch_settles_as_failed() {
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Watch, async {
            if std::hint::black_box(true) {
                panic!("decoder blew up");
            }
            Ok(1)
        });
        let settled = tokio::time::timeout(Duration::from_secs(2), page.settled()).await;
        assert_eq!(
            settled.ok(),
            Some(PageState::Failed(
                "Failed to load movie. Please try again later.".to_string()
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_page_aborts_its_fetch() {
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let mut page: Page<u32> = Page::new();
        page.load(PageKind::Watch, async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = done_tx.send(());
            Ok(1)
        });
        drop(page);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(done_rx.await.is_err());
    }
}
