//! # Notification Channel
//!
//! Per-subscriber transport carrying notifications from the registry to a
//! long-lived stream held open by the remote peer.
//!
//! A channel is a pair: the [`ChannelSender`] stays with the registry, the
//! [`ChannelHandle`] is handed to whoever streams to the peer. Dropping the
//! handle is the transport-level close; it runs the registered close hooks
//! exactly once.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::{RealtimeError, RealtimeResult};
use super::event::Notification;

/// Identifier of one opened channel
pub type ChannelId = Uuid;

type CloseHook = Box<dyn FnOnce(ChannelId) + Send>;

/// Open a new channel pair
pub fn open() -> (ChannelSender, ChannelHandle) {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();

    (
        ChannelSender { id, tx },
        ChannelHandle {
            id,
            rx,
            close_hooks: Vec::new(),
        },
    )
}

/// Sending half, owned by the registry while the subscription is live
#[derive(Debug)]
pub struct ChannelSender {
    id: ChannelId,
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSender {
    /// Channel ID
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Push one notification
    ///
    /// Fails with [`RealtimeError::ChannelClosed`] once the handle is gone.
    pub fn send(&self, notification: Notification) -> RealtimeResult<()> {
        self.tx
            .send(notification)
            .map_err(|_| RealtimeError::ChannelClosed)
    }
}

/// Receiving half, streamed to the remote peer
///
/// Yields notifications until the registry drops the sending half
/// (eviction or replacement), then ends.
pub struct ChannelHandle {
    id: ChannelId,
    rx: mpsc::UnboundedReceiver<Notification>,
    close_hooks: Vec<CloseHook>,
}

impl ChannelHandle {
    /// Channel ID
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Register a callback run once when this handle closes
    pub fn on_close<F>(&mut self, hook: F)
    where
        F: FnOnce(ChannelId) + Send + 'static,
    {
        self.close_hooks.push(Box::new(hook));
    }

    /// Wait for the next notification
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Take a notification if one is queued
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Close the channel from the peer side
    pub fn close(self) {}

    /// Stop receiving without running close hooks
    #[cfg(test)]
    pub(crate) fn close_receiver(&mut self) {
        self.rx.close();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        // Senders must observe the close before hooks touch the registry.
        self.rx.close();
        for hook in self.close_hooks.drain(..) {
            hook(self.id);
        }
    }
}

impl Stream for ChannelHandle {
    type Item = Notification;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("id", &self.id)
            .field("close_hooks", &self.close_hooks.len())
            .finish()
    }
}
