//! # Stream Lifecycle
//!
//! A streaming call is `Open` until the first terminal event (error, early
//! stop, cancellation or end of body) moves it to `Terminated`. Later events
//! are ignored, so a call settles exactly once, either as a summary or as an
//! error.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::ClientError;

/// Consumer verdict after each delivered item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamControl {
    /// Keep delivering items.
    Continue,
    /// End the stream now; the call completes successfully.
    Stop,
}

impl From<bool> for StreamControl {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            StreamControl::Continue
        } else {
            StreamControl::Stop
        }
    }
}

/// How a successfully settled stream ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEnd {
    /// The node closed the body after the last item.
    Completed,
    /// The consumer returned [`StreamControl::Stop`].
    Stopped,
    /// The caller cancelled through the cancellation token.
    Cancelled,
}

/// Successful settlement of a streaming call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSummary {
    /// Items handed to the consumer.
    pub delivered: usize,
    /// Why the stream ended.
    pub end: StreamEnd,
}

/// Lifecycle state of one streaming call.
#[derive(Debug)]
pub enum StreamState {
    /// Items may still be delivered.
    Open,
    /// Settled; holds the one and only outcome.
    Terminated(Result<StreamEnd, ClientError>),
}

/// Explicit `Open -> Terminated` state machine for a streaming call.
#[derive(Debug)]
pub struct StreamLifecycle {
    state: StreamState,
    delivered: usize,
}

impl Default for StreamLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamLifecycle {
    /// A fresh, open lifecycle.
    pub fn new() -> Self {
        Self {
            state: StreamState::Open,
            delivered: 0,
        }
    }

    /// True until a terminal event has been observed.
    pub fn is_open(&self) -> bool {
        matches!(self.state, StreamState::Open)
    }

    /// Items delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Count a delivery. Returns false (and counts nothing) once terminated.
    pub fn record_delivery(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.delivered += 1;
        true
    }

    /// Apply a terminal event. Only the first one is kept; returns whether
    /// this call performed the transition.
    pub fn terminate(&mut self, outcome: Result<StreamEnd, ClientError>) -> bool {
        if !self.is_open() {
            tracing::trace!(ignored = ?outcome, "stream already terminated");
            return false;
        }
        self.state = StreamState::Terminated(outcome);
        true
    }

    /// Consume the lifecycle into the settled result.
    pub fn into_outcome(self) -> Result<StreamSummary, ClientError> {
        match self.state {
            StreamState::Terminated(Ok(end)) => Ok(StreamSummary {
                delivered: self.delivered,
                end,
            }),
            StreamState::Terminated(Err(e)) => Err(e),
            StreamState::Open => Err(ClientError::Transport(
                "stream abandoned before a terminal event".into(),
            )),
        }
    }
}

/// Handle to a stream running on its own task.
///
/// Items are pushed to the consumer given at spawn time. The handle settles
/// at most once; dropping it cancels the stream and closes the connection.
#[derive(Debug)]
pub struct StreamSubscription {
    cancel: CancellationToken,
    settled: oneshot::Receiver<Result<StreamSummary, ClientError>>,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl StreamSubscription {
    pub(crate) fn new(
        cancel: CancellationToken,
        settled: oneshot::Receiver<Result<StreamSummary, ClientError>>,
        task: JoinHandle<()>,
    ) -> Self {
        let guard = cancel.clone().drop_guard();
        Self {
            cancel,
            settled,
            task,
            _guard: guard,
        }
    }

    /// Request termination. The stream settles with [`StreamEnd::Cancelled`]
    /// unless another terminal event got there first.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this stream, for racing against external timers.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// True once the stream task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the single settlement of the stream.
    pub async fn settled(self) -> Result<StreamSummary, ClientError> {
        match self.settled.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::Transport(
                "stream task exited without settling".into(),
            )),
        }
    }
}
