// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cancellable operations running on worker threads.

use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cooperative-cancellation flag shared with a worker.
///
/// Workers check the token at their chunk boundaries; cancellation is a
/// request, not a preemption.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Result of polling a [`BackgroundOp`].
#[derive(Debug)]
pub enum OpStatus<R> {
    /// The worker is still running.
    Pending,
    /// The worker finished; the result is handed over exactly once.
    Ready(R),
    /// The worker ended without producing a result, either because it
    /// honored a cancellation or because it died.
    Aborted,
}

/// Handle to one operation running on a worker thread.
///
/// The result comes back over a bounded channel, so [`poll`] never
/// blocks: it either finds the result already delivered or reports that
/// the worker is still out there. The worker is detached; dropping the
/// handle after [`cancel`] lets it wind down on its own.
///
/// [`poll`]: BackgroundOp::poll
/// [`cancel`]: BackgroundOp::cancel
pub struct BackgroundOp<R> {
    receiver: Receiver<R>,
    token: CancelToken,
}

impl<R: Send + 'static> BackgroundOp<R> {
    /// Spawns `work` on a new worker thread.
    ///
    /// The worker receives a [`CancelToken`] and should check it between
    /// chunks, returning `None` once cancelled so that no result is
    /// delivered.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce(CancelToken) -> Option<R> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let token = CancelToken::new();
        let worker_token = token.clone();
        std::thread::spawn(move || {
            if let Some(result) = work(worker_token) {
                let _ = sender.send(result);
            }
        });
        Self { receiver, token }
    }

    /// Non-blocking completion check.
    ///
    /// Once `Ready` has handed the result over, the operation is spent
    /// and later polls report `Aborted`; callers are expected to drop the
    /// handle instead.
    pub fn poll(&mut self) -> OpStatus<R> {
        match self.receiver.try_recv() {
            Ok(result) => OpStatus::Ready(result),
            Err(TryRecvError::Empty) => OpStatus::Pending,
            Err(TryRecvError::Disconnected) => OpStatus::Aborted,
        }
    }

    /// Requests cooperative cancellation of the worker.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token shared with the worker.
    #[must_use]
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl<R> std::fmt::Debug for BackgroundOp<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundOp")
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
