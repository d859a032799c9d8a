// crates/cohort-screen-matchers/src/deadline.rs
// ============================================================================
// Module: Deadline Backend Wrapper
// Description: Per-call timeout enforcement for similarity backends.
// Purpose: Bound each backend call so a slow backend degrades, not blocks.
// Dependencies: cohort-screen-core
// ============================================================================

//! ## Overview
//! The deadline wrapper bounds every similarity call with a fixed timeout.
//! The wrapped call runs on a worker thread; when the deadline elapses the
//! wrapper returns [`SimilarityError::Timeout`], which the semantic matcher
//! degrades to a MAYBE "matcher unavailable" result instead of stalling the
//! batch. A timed-out worker is detached and its late result is discarded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use cohort_screen_core::SimilarityBackend;
use cohort_screen_core::SimilarityError;

// ============================================================================
// SECTION: Wrapper Implementation
// ============================================================================

/// Similarity backend wrapper enforcing a per-call deadline.
#[derive(Debug, Clone)]
pub struct DeadlineBackend<B> {
    /// Wrapped backend.
    inner: B,
    /// Per-call deadline in milliseconds.
    timeout_ms: u64,
}

impl<B> DeadlineBackend<B> {
    /// Wraps a backend with the given per-call deadline.
    #[must_use]
    pub const fn new(inner: B, timeout_ms: u64) -> Self {
        Self {
            inner,
            timeout_ms,
        }
    }

    /// Returns the configured deadline in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

impl<B> SimilarityBackend for DeadlineBackend<B>
where
    B: SimilarityBackend + Clone + 'static,
{
    fn similarity(&self, query: &str, passage: &str) -> Result<f64, SimilarityError> {
        let (sender, receiver) = mpsc::channel();
        let inner = self.inner.clone();
        let query = query.to_string();
        let passage = passage.to_string();
        thread::spawn(move || {
            let _ = sender.send(inner.similarity(&query, &passage));
        });

        match receiver.recv_timeout(Duration::from_millis(self.timeout_ms)) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SimilarityError::Timeout(self.timeout_ms)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(SimilarityError::Backend("similarity worker terminated".to_string()))
            }
        }
    }
}
