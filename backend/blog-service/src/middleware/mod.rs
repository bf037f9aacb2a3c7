/// HTTP middleware for blog-service
///
/// Identity resolution: validates a Bearer token when one is present and
/// stores the resulting `Identity` in request extensions. Requests without a
/// valid token pass through anonymously; handlers that require an identity
/// answer its absence with a login redirect, so this middleware never rejects
/// a request itself.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::auth::{self, Identity};

/// Identity extractor that never fails; anonymous requests carry `None`.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequest for MaybeIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeIdentity(
            req.extensions().get::<Identity>().cloned(),
        )))
    }
}

/// Actix middleware that validates Bearer tokens and records the caller.
pub struct IdentityMiddleware {
    secret: Rc<String>,
}

impl IdentityMiddleware {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::new(secret.to_string()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = bearer_token(req.request()) {
            match auth::decode_token(&token, &self.secret) {
                Ok(claims) => {
                    req.extensions_mut().insert(Identity::from(claims));
                }
                Err(err) => {
                    // Invalid tokens degrade to anonymous rather than 401:
                    // public pages stay readable with a stale token.
                    tracing::debug!(error = %err, "Ignoring invalid bearer token");
                }
            }
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}
