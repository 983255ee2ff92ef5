// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Completion of an operation submitted to the bridge worker.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use inkbridge_core::error::{InkBridgeError, Result};
use tokio::sync::oneshot;

/// Result of a bridge operation, delivered once the worker has run it.
///
/// The operation is queued when the bridge method is called, not when this
/// is first polled. Dropping a `Pending` discards the result; the operation
/// itself still runs to completion on the worker.
#[must_use = "the result of a bridge operation is only observable through its Pending"]
#[derive(Debug)]
pub struct Pending<T> {
    reply: oneshot::Receiver<Result<T>>,
}

impl<T> Pending<T> {
    pub(crate) fn new(reply: oneshot::Receiver<Result<T>>) -> Self {
        Self { reply }
    }

    /// A `Pending` that is already resolved.
    pub(crate) fn ready(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive right here, so the send cannot fail.
        let _ = tx.send(result);
        Self::new(rx)
    }

    /// Block the calling thread until the worker replies.
    ///
    /// For callers outside an async runtime. Panics if called from within
    /// one, like [`oneshot::Receiver::blocking_recv`].
    pub fn wait_blocking(self) -> Result<T> {
        self.reply
            .blocking_recv()
            .unwrap_or(Err(InkBridgeError::WorkerStopped))
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().reply)
            .poll(cx)
            .map(|reply| reply.unwrap_or(Err(InkBridgeError::WorkerStopped)))
    }
}
