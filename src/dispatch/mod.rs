//! Top-level request dispatch.
//!
//! The dispatcher walks an ordered middleware chain built once during setup.
//! The single special case is the reserved control command, which bypasses
//! the chain entirely and hands off to the host application instead.

use crate::context::RequestContext;
use crate::host::HostHandle;
use crate::middleware::Middleware;
use http::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// Reserved request target that triggers a host-application action instead of
/// normal handler matching. Compared case-insensitively.
pub const CLOSE_COMMAND: &str = "/_close";

pub struct Dispatcher {
    middlewares: Vec<Arc<dyn Middleware>>,
    host: Option<HostHandle>,
}

impl Dispatcher {
    pub fn new(host: Option<HostHandle>) -> Self {
        Self {
            middlewares: Vec::new(),
            host,
        }
    }

    /// Register a middleware. Setup-time only: once the dispatcher is shared
    /// behind an `Arc` the chain can no longer change, which is what makes
    /// concurrent dispatch safe without locking. Registration order is
    /// dispatch order and the only tie-break rule.
    pub fn append_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Dispatch one request. Returns true if the control command or some
    /// middleware produced a terminal response; false if nobody claimed the
    /// target, in which case the context is untouched and the transport
    /// decides what the client sees.
    pub async fn dispatch(&self, target: &str, ctx: &mut RequestContext) -> bool {
        if target.eq_ignore_ascii_case(CLOSE_COMMAND) {
            return self.dispatch_close(ctx);
        }

        for middleware in &self.middlewares {
            if middleware.handle(target, ctx).await {
                debug!(middleware = middleware.name(), path = target, "request handled");
                return true;
            }
        }

        false
    }

    /// Hand the close command off to the host and commit 200 immediately.
    /// Fire-and-forget: the response does not wait for the host to act, so a
    /// client observing the 200 cannot assume the UI effect has happened yet.
    fn dispatch_close(&self, ctx: &mut RequestContext) -> bool {
        match &self.host {
            Some(host) if host.request_close() => {
                ctx.set_status(StatusCode::OK);
                true
            }
            Some(_) => {
                debug!("close command received but host channel is closed");
                false
            }
            None => {
                debug!("close command received but no host is attached");
                false
            }
        }
    }
}
