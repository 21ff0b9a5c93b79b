use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

/// Creates a selection that can be resolved exactly once.
pub fn selection() -> (DeviceSelector, PendingSelection) {
    let (sender, receiver) = oneshot::channel();
    let selector = DeviceSelector {
        sender: Arc::new(Mutex::new(Some(sender))),
    };

    (selector, PendingSelection { receiver })
}

/// Handle given to whoever presents the discovered devices. Cloning shares the same selection.
#[derive(Clone, Debug)]
pub struct DeviceSelector {
    sender: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

impl DeviceSelector {
    /// Resolves the selection with `device_id`. Only the first call, across all clones, succeeds.
    pub fn select(&self, device_id: impl Into<String>) -> Result<(), SelectionError> {
        let sender = self.take_sender().ok_or(SelectionError::AlreadyResolved)?;
        sender.send(device_id.into()).map_err(|_| SelectionError::Cancelled)
    }

    /// Resolves the selection as cancelled. Does nothing if it was already resolved.
    pub fn cancel(&self) {
        self.take_sender();
    }

    fn take_sender(&self) -> Option<oneshot::Sender<String>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Resolves to the selected device id, or [`SelectionError::Cancelled`].
#[derive(Debug)]
pub struct PendingSelection {
    receiver: oneshot::Receiver<String>,
}

impl Future for PendingSelection {
    type Output = Result<String, SelectionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|result| result.map_err(|_| SelectionError::Cancelled))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("a device has already been selected")]
    AlreadyResolved,
    #[error("device selection was cancelled")]
    Cancelled,
    #[error("unknown device '{0}'")]
    UnknownDevice(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_selection_resolves_the_pending_selection() {
        let (selector, pending) = selection();

        assert_eq!(selector.select("device-1"), Ok(()));
        assert_eq!(pending.await, Ok("device-1".to_string()));
    }

    #[tokio::test]
    async fn second_selection_is_rejected() {
        let (selector, pending) = selection();
        let other = selector.clone();

        selector.select("device-1").unwrap();

        assert_eq!(other.select("device-2"), Err(SelectionError::AlreadyResolved));
        assert_eq!(pending.await, Ok("device-1".to_string()));
    }

    #[tokio::test]
    async fn cancel_resolves_as_cancelled() {
        let (selector, pending) = selection();

        selector.cancel();

        assert_eq!(pending.await, Err(SelectionError::Cancelled));
        assert_eq!(selector.select("device-1"), Err(SelectionError::AlreadyResolved));
    }

    #[tokio::test]
    async fn dropping_every_selector_cancels() {
        let (selector, pending) = selection();

        drop(selector);

        assert_eq!(pending.await, Err(SelectionError::Cancelled));
    }

    #[test]
    fn selecting_after_the_pending_selection_is_gone_reports_cancelled() {
        let (selector, pending) = selection();

        drop(pending);

        assert_eq!(selector.select("device-1"), Err(SelectionError::Cancelled));
    }
}
