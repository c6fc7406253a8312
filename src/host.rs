//! Hand-off to the host application's UI-owning task.
//!
//! The bridge never touches host UI state directly. It holds an optional
//! `HostHandle` whose events are drained by the host application on its own
//! single-consumer task. Delivery is fire-and-forget: the HTTP response for a
//! control command commits before (and regardless of whether) the host acts
//! on the event.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The embedded content asked the host to dismiss the bridge view.
    CloseRequested,
}

#[derive(Clone)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<HostEvent>,
}

/// Create a host channel. The host application keeps the receiver alive on
/// its UI-owning task; the handle goes to the dispatcher.
pub fn host_channel() -> (HostHandle, mpsc::UnboundedReceiver<HostEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (HostHandle { tx }, rx)
}

impl HostHandle {
    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Enqueue a close request. Returns false if the host side is gone, which
    /// the dispatcher treats the same as having no host at all.
    pub fn request_close(&self) -> bool {
        self.tx.send(HostEvent::CloseRequested).is_ok()
    }
}
