//! Cancellable render batches.
//!
//! A results container runs at most one cover-fetch batch at a time. Starting
//! a batch aborts the one before it, so a slow, stale batch can never finish
//! after (and overwrite) a newer one.

use futures::future::{AbortHandle, Abortable, Aborted};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Identifies one batch; later batches have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Returned when a batch was aborted by a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superseded(pub RequestToken);

#[derive(Debug, Default)]
pub struct BatchCoordinator {
    next: AtomicU64,
    current: Mutex<Option<(RequestToken, AbortHandle)>>,
}

impl BatchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `batch` as the current batch, aborting whichever batch was current.
    pub async fn run<F: Future>(&self, batch: F) -> Result<F::Output, Superseded> {
        let token = RequestToken(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        let (handle, registration) = AbortHandle::new_pair();

        if let Some((previous, stale)) = self.lock().replace((token, handle)) {
            log::debug!("batch {} superseded by {}", previous.get(), token.get());
            stale.abort();
        }

        let result = Abortable::new(batch, registration).await;

        let mut current = self.lock();
        if current.as_ref().is_some_and(|(t, _)| *t == token) {
            *current = None;
        }
        drop(current);

        result.map_err(|Aborted| Superseded(token))
    }

    /// Aborts the running batch, if any.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Token of the running batch, if any.
    pub fn current(&self) -> Option<RequestToken> {
        self.lock().as_ref().map(|(token, _)| *token)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(RequestToken, AbortHandle)>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
