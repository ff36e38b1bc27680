//! The seam between the controller and any concrete backend.

use std::future::Future;
use std::pin::Pin;

use crate::error::ProviderError;
use crate::model::{ModelReply, ModelRequest, ProviderId};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A backend that can turn a [`ModelRequest`] into a [`ModelReply`].
///
/// Implementations make exactly one outbound call per `complete` and do
/// not retry; classification of failures is the caller's signal for what
/// to do next.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>>;
}
