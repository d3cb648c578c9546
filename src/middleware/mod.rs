use axum::{body::Body, http::Request, response::Response};
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::config::Config;
use crate::error::BoxError;
use crate::exception::CaughtError;
use crate::responder::{self, Captured};

/// Tower Layer that turns errors into content-negotiated responses
///
/// # Example
/// ```
/// use axum::{Router, routing::get};
/// use axum_errhandler::{Config, ErrorHandlerLayer, HttpError};
///
/// async fn create() -> Result<&'static str, HttpError> {
///     Err(HttpError::new(400, "Bad request"))
/// }
///
/// let app: Router = Router::new()
///     .route("/users", get(create))
///     .layer(ErrorHandlerLayer::new(Config::builder().log(true).build()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ErrorHandlerLayer {
    config: Arc<Config>,
}

impl ErrorHandlerLayer {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for ErrorHandlerLayer {
    type Service = ErrorHandlerMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorHandlerMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ErrorHandlerMiddleware<S> {
    inner: S,
    config: Arc<Config>,
}

impl<S> Service<Request<Body>> for ErrorHandlerMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if self.config.skips(&request) {
            tracing::trace!(path = request.uri().path(), "Error handling skipped by filter");
            return Box::pin(inner.call(request));
        }

        let config = self.config.clone();
        let captured = Captured::from_request(&config, &request);

        Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { inner.call(request).await })
                .catch_unwind()
                .await;

            let error = match outcome {
                Ok(Ok(response)) => match response.extensions().get::<CaughtError>() {
                    Some(raised) => raised.clone(),
                    None => return Ok(response),
                },
                Ok(Err(err)) => CaughtError::other(err),
                Err(payload) => CaughtError::from_panic(payload),
            };

            Ok(responder::handle(&config, &captured, error))
        })
    }
}
