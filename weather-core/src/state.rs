//! Lifecycle states emitted by repository operations, and the stream that
//! carries them to the presentation layer.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::Stream;
use thiserror::Error;
use tokio::sync::mpsc;

/// One step of an asynchronous repository operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    Loading,
    Success(T),
    Failure(FailureReason),
}

impl<T> DataState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    /// `Success` and `Failure` end a stream.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }
}

/// Transport-agnostic failure vocabulary shown to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("{0}")]
    ServerError(String),

    #[error("Could not reach the weather service. Check your connection and API key.")]
    NetworkIssue,

    #[error("Something went wrong. Please try again later.")]
    GenericError,
}

// Loading plus one terminal state.
const STATES_PER_OPERATION: usize = 2;

/// Create the paired writer/reader for one repository operation.
pub(crate) fn state_channel<T>() -> (StateEmitter<T>, StateStream<T>) {
    let (tx, rx) = mpsc::channel(STATES_PER_OPERATION);
    (StateEmitter { tx }, StateStream { rx })
}

pub(crate) struct StateEmitter<T> {
    tx: mpsc::Sender<DataState<T>>,
}

impl<T> StateEmitter<T> {
    /// Returns `false` once the consumer has dropped its stream.
    pub(crate) async fn emit(&self, state: DataState<T>) -> bool {
        self.tx.send(state).await.is_ok()
    }
}

/// Single-subscriber stream of [`DataState`] values.
///
/// Yields `Loading`, then exactly one terminal state, then ends. Dropping it
/// cancels delivery of whatever has not been produced yet.
#[derive(Debug)]
pub struct StateStream<T> {
    rx: mpsc::Receiver<DataState<T>>,
}

impl<T> StateStream<T> {
    /// Wait for the next state, `None` once the operation has finished.
    pub async fn next_state(&mut self) -> Option<DataState<T>> {
        self.rx.recv().await
    }
}

impl<T> Stream for StateStream<T> {
    type Item = DataState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
