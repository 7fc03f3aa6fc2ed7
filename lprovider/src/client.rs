use std::sync::Arc;

use lcommon::BoxFuture;

use crate::{ModelRequest, ModelResponse, ProviderError, ProviderId};

pub type ClientFuture<'a, T> = BoxFuture<'a, T>;

/// Boundary over the external generative-model call.
///
/// Implementations must return tool-call identifiers exactly as the model
/// produced them so results can be correlated on the next call.
pub trait ModelClient: Send + Sync {
    fn id(&self) -> ProviderId;

    fn invoke<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ClientFuture<'a, Result<ModelResponse, ProviderError>>;
}

impl<T> ModelClient for Arc<T>
where
    T: ModelClient + ?Sized,
{
    fn id(&self) -> ProviderId {
        (**self).id()
    }

    fn invoke<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ClientFuture<'a, Result<ModelResponse, ProviderError>> {
        (**self).invoke(request)
    }
}
