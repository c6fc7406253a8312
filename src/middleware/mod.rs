//! Handler contracts for the dispatch chain.
//!
//! A middleware either fully answers a request (writes the response into the
//! context and returns true) or declines it (leaves the context untouched and
//! returns false). The dispatcher knows nothing about concrete handler kinds;
//! it only walks the ordered chain.

use crate::context::RequestContext;
use async_trait::async_trait;

pub mod router;

pub use router::CapabilityRouter;

#[async_trait]
pub trait Middleware: Send + Sync {
    /// Short name used only in dispatch diagnostics.
    fn name(&self) -> &'static str;

    /// Try to answer the request. Implementations do their own matching on
    /// `target` and must write a complete response before returning true.
    async fn handle(&self, target: &str, ctx: &mut RequestContext) -> bool;
}

/// A middleware-shaped handler scoped to one native capability (camera,
/// geolocation, wallet signing, key-value store, external links). Capability
/// internals live outside this crate; the bridge only relies on this shape.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, target: &str, ctx: &mut RequestContext) -> bool;
}
