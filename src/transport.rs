use std::future::Future;
use std::sync::Arc;

use crate::TransportError;

/// Response that carries a numeric HTTP status code.
pub trait HttpResponse {
    /// Numeric status code, e.g. `200`.
    fn status_code(&self) -> u16;
}

impl HttpResponse for reqwest::Response {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

/// Capability that performs one request/response exchange.
///
/// The request is borrowed so the same value can be handed to every attempt.
/// Implementations must be safe to call concurrently from independent tasks.
pub trait Transport: Send + Sync {
    type Request: Sync;
    type Response: HttpResponse + Send + 'static;
    type Error: std::error::Error + Send + 'static;

    /// Performs one exchange. `Err` is a transport-level failure such as a
    /// refused connection, never an unwanted status code.
    fn invoke(
        &self,
        request: &Self::Request,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

impl Transport for reqwest::Client {
    type Request = reqwest::Request;
    type Response = reqwest::Response;
    type Error = TransportError;

    async fn invoke(&self, request: &reqwest::Request) -> Result<reqwest::Response, TransportError> {
        // reqwest consumes the request, so each attempt sends its own copy.
        let request = request
            .try_clone()
            .ok_or(TransportError::UnclonableRequest)?;
        Ok(self.execute(request).await?)
    }
}

impl<T: Transport> Transport for Arc<T> {
    type Request = T::Request;
    type Response = T::Response;
    type Error = T::Error;

    fn invoke(
        &self,
        request: &Self::Request,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send {
        T::invoke(self, request)
    }
}
