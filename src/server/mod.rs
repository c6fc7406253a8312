//! Lifecycle wrapper binding the dispatcher to the loopback listener.

use crate::config::BridgeConfig;
use crate::dispatch::Dispatcher;
use crate::error::{LifecycleError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

mod transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Created,
    Started,
    Stopped,
}

struct Inner {
    state: BridgeState,
    shutdown_tx: Option<broadcast::Sender<()>>,
    accept_task: Option<tokio::task::JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

/// The bridge server. Start and stop are idempotent; the handler chain is
/// frozen at construction and shared read-only with every connection task.
///
/// The listener only ever binds the loopback interface; the bridge is not
/// reachable from outside the device.
pub struct BridgeServer {
    config: BridgeConfig,
    dispatcher: Arc<Dispatcher>,
    inner: Mutex<Inner>,
}

impl BridgeServer {
    pub fn new(config: BridgeConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
            inner: Mutex::new(Inner {
                state: BridgeState::Created,
                shutdown_tx: None,
                accept_task: None,
                local_addr: None,
            }),
        }
    }

    /// Bind the listener and begin serving. A no-op if already started.
    ///
    /// Bind failures are logged and returned; the server stays in its prior
    /// state and a later `start` retries the bind. Callers that want the
    /// legacy swallow-and-log behavior can ignore the result.
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state == BridgeState::Started {
            debug!("bridge server already started");
            return Ok(());
        }

        let addr = SocketAddr::from(([127, 0, 0, 1], self.config.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("failed to bind bridge listener on {}: {}", addr, e);
                return Err(LifecycleError::BindFailed { addr, source: e }.into());
            }
        };
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let accept_task = tokio::spawn(transport::accept_loop(
            listener,
            self.dispatcher.clone(),
            shutdown_rx,
            self.config.request_log,
        ));

        inner.state = BridgeState::Started;
        inner.shutdown_tx = Some(shutdown_tx);
        inner.accept_task = Some(accept_task);
        inner.local_addr = Some(local_addr);

        info!("bridge server listening on {}", local_addr);
        Ok(())
    }

    /// Unbind the listener and drain the accept loop. A no-op if the server
    /// was never started or already stopped.
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != BridgeState::Started {
            debug!("bridge server not running, nothing to stop");
            return Ok(());
        }

        if let Some(shutdown_tx) = inner.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = inner.accept_task.take() {
            let _ = task.await;
        }

        inner.state = BridgeState::Stopped;
        inner.local_addr = None;

        info!("bridge server stopped");
        Ok(())
    }

    pub async fn state(&self) -> BridgeState {
        self.inner.lock().await.state
    }

    pub async fn is_started(&self) -> bool {
        self.state().await == BridgeState::Started
    }

    /// Actual bound address, once started. With port 0 in the config this is
    /// where the OS-assigned port shows up.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.lock().await.local_addr
    }
}
