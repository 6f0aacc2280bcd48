//! Content-Security-Policy middleware for Actix Web.
//!
//! Adds a `Content-Security-Policy` header to every response, including error responses. Handlers that set their own
//! policy keep it.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, CONTENT_SECURITY_POLICY},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

pub struct CspMiddlewareFactory {
    // If None, then the middleware passes every response through untouched
    policy: Option<HeaderValue>,
}

impl CspMiddlewareFactory {
    pub fn new(policy: Option<&str>) -> Self {
        let policy = policy.and_then(|p| {
            HeaderValue::from_str(p)
                .map_err(|e| warn!("💻️ '{p}' is not a valid Content-Security-Policy. The header is disabled. {e}"))
                .ok()
        });
        CspMiddlewareFactory { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = CspMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService { policy: self.policy.clone(), service: Rc::new(service) }))
    }
}

pub struct CspMiddlewareService<S> {
    policy: Option<HeaderValue>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = self.policy.clone();
        Box::pin(async move {
            let mut res = service.call(req).await?;
            if let Some(policy) = policy {
                if !res.headers().contains_key(CONTENT_SECURITY_POLICY) {
                    trace!("💻️ Adding Content-Security-Policy header");
                    res.headers_mut().insert(CONTENT_SECURITY_POLICY, policy);
                }
            }
            Ok(res)
        })
    }
}
