//! Tower service wrapping one trigger method.
//!
//! [`TriggerService<H>`] binds a handler instance to one of its trigger
//! methods and implements `tower::Service<TriggerContext>`. Descriptors store
//! it type-erased as a [`BoxedTriggerService`], so the dispatcher can call
//! any trigger without knowing the concrete handler type.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service};

use crate::context::TriggerContext;
use crate::trigger::TriggerFn;

/// Type-erased trigger service stored in every descriptor.
pub type BoxedTriggerService = BoxCloneSyncService<TriggerContext, (), BoxError>;

/// A tower [`Service`] that calls one trigger method on a shared handler.
pub struct TriggerService<H> {
    instance: Arc<H>,
    method: TriggerFn<H>,
}

impl<H> TriggerService<H> {
    pub fn new(instance: Arc<H>, method: TriggerFn<H>) -> Self {
        Self { instance, method }
    }
}

impl<H: Send + Sync + 'static> TriggerService<H> {
    /// Erases the handler type.
    pub fn boxed(self) -> BoxedTriggerService {
        BoxCloneSyncService::new(self)
    }
}

impl<H> Clone for TriggerService<H> {
    fn clone(&self) -> Self {
        Self {
            instance: Arc::clone(&self.instance),
            method: self.method,
        }
    }
}

impl<H> Service<TriggerContext> for TriggerService<H>
where
    H: Send + Sync + 'static,
{
    type Response = ();
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<(), BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: TriggerContext) -> Self::Future {
        (self.method)(Arc::clone(&self.instance), ctx)
    }
}
