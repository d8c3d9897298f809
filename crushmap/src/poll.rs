/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Periodic snapshot polling.
//!
//! [`Poller::spawn`] runs a fetch function on a fixed period. Each
//! fetch is tagged with a sequence number when it is *dispatched* and
//! runs as its own task, so a slow fetch does not delay the next tick
//! and results can resolve out of order. Consumers fold results into a
//! [`FetchState`], which only accepts results newer than what it
//! already holds; a late response from an older fetch is discarded
//! instead of overwriting a fresher snapshot.
//!
//! The ticker and every in-flight fetch are owned by the [`Poller`].
//! Dropping it (or calling [`Poller::cancel`]) aborts all of them, so
//! nothing is delivered after the consumer is gone.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;

/// One fetch result, tagged with the sequence number assigned at
/// dispatch. Sequence numbers start at 1.
#[derive(Debug)]
pub struct Polled<T, E> {
    pub seq: u64,
    pub result: Result<T, E>,
}

/// Latest known result of a polled source, with ordering metadata.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<T> {
    /// Nothing applied yet.
    Unknown,
    /// Successful fetch.
    Ready { seq: u64, value: T },
    /// Failed fetch.
    Error { seq: u64, msg: String },
}

impl<T> FetchState<T> {
    pub fn from_result<E: fmt::Display>(seq: u64, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchState::Ready { seq, value },
            Err(e) => FetchState::Error {
                seq,
                msg: e.to_string(),
            },
        }
    }

    pub fn seq(&self) -> Option<u64> {
        match self {
            FetchState::Unknown => None,
            FetchState::Ready { seq, .. } | FetchState::Error { seq, .. } => Some(*seq),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether `self` should replace `current`.
    ///
    /// `Unknown` never wins and always loses. Otherwise the higher
    /// sequence number wins; on a tie, `Ready` beats `Error`. Only the
    /// ordering metadata is compared, so `current` may hold a
    /// different payload type (e.g. a summary of what was applied).
    pub fn supersedes<U>(&self, current: &FetchState<U>) -> bool {
        match (self.seq(), current.seq()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(new), Some(old)) if new != old => new > old,
            _ => {
                matches!(self, FetchState::Ready { .. })
                    && matches!(current, FetchState::Error { .. })
            }
        }
    }

    /// Replace `self` with `incoming` if it is newer. Returns whether
    /// it was applied.
    pub fn apply(&mut self, incoming: FetchState<T>) -> bool {
        if incoming.supersedes(self) {
            *self = incoming;
            true
        } else {
            false
        }
    }
}

/// A running poll loop and the receiving end of its results.
pub struct Poller<T, E> {
    rx: mpsc::UnboundedReceiver<Polled<T, E>>,
    ticker: JoinHandle<()>,
}

impl<T, E> Poller<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Start polling `fetch` every `period`. The first fetch is
    /// dispatched one period from now; callers load the initial
    /// snapshot themselves.
    pub fn spawn<F, Fut>(period: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut in_flight = JoinSet::new();
            let mut seq = 0u64;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        seq += 1;
                        let dispatched = seq;
                        tracing::trace!(seq = dispatched, "dispatching poll fetch");
                        let pending = fetch();
                        let tx = tx.clone();
                        in_flight.spawn(async move {
                            let result = pending.await;
                            // The receiver may already be gone.
                            let _ = tx.send(Polled { seq: dispatched, result });
                        });
                    }
                    Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                    _ = tx.closed() => break,
                }
            }
        });
        Self { rx, ticker }
    }
}

impl<T, E> Poller<T, E> {
    /// Next result, in completion order (not dispatch order).
    pub async fn next(&mut self) -> Option<Polled<T, E>> {
        self.rx.recv().await
    }

    /// Stop polling and abort in-flight fetches.
    pub fn cancel(self) {}
}

impl<T, E> Drop for Poller<T, E> {
    fn drop(&mut self) {
        // Dropping the ticker's JoinSet aborts in-flight fetches too.
        self.ticker.abort();
    }
}
