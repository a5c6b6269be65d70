//! Rate limiting middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use garage_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use garage_core::ports::RateLimiter;

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Keyed by client address
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        match self.limiter.check(&key) {
            Ok(result) if !result.allowed => {
                tracing::warn!(client = %key, "Rate limit exceeded");

                let retry_after = result.reset_after.as_secs().max(1);
                let error = ErrorResponse::new(429, "Too Many Requests").with_detail(format!(
                    "リクエストが多すぎます。{}秒後に再度お試しください",
                    retry_after
                ));

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
            outcome => {
                let remaining = match outcome {
                    Ok(result) => Some(result.remaining),
                    Err(e) => {
                        tracing::error!(error = %e, "Rate limiter error, failing open");
                        None
                    }
                };

                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    if let Some(remaining) = remaining {
                        res.headers_mut().insert(
                            actix_web::http::header::HeaderName::from_static(
                                "x-ratelimit-remaining",
                            ),
                            remaining.into(),
                        );
                    }
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use garage_core::ports::{RateLimitError, RateLimitResult};
    use std::time::Duration;

    struct Deny;

    impl RateLimiter for Deny {
        fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: Duration::from_secs(30),
            })
        }
    }

    struct Broken;

    impl RateLimiter for Broken {
        fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Backend("unavailable".to_string()))
        }
    }

    #[actix_web::test]
    async fn test_denied_request_gets_429_with_retry_after() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(Arc::new(Deny)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("Retry-After").unwrap(), "30");
    }

    #[actix_web::test]
    async fn test_backend_error_fails_open() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(Arc::new(Broken)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
