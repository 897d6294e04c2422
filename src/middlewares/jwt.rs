use crate::actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use crate::context::UserInfo;
use crate::core::tokener::{Claim, Payload, Tokener};
use crate::error::Error as ClubError;
use crate::impls::tokener::jwt::JWT;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Resolves the caller from an `Authorization: Bearer <token>` header. Requests
/// without the header pass through anonymously; a bad token is rejected with 401.
pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtMiddleware {
            tokener: JWT::new(self.secret.clone()),
            next_service: service,
        }))
    }
}

pub struct JwtMiddleware<S> {
    tokener: JWT,
    next_service: S,
}

impl<S> JwtMiddleware<S> {
    fn caller(&self, header: &str) -> Result<UserInfo, ClubError> {
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        let claim: Claim = self.tokener.verify_token(token)?;
        if claim.user().is_empty() {
            return Err(ClubError::Unauthorized("token carries no user".into()));
        }
        Ok(UserInfo { username: claim.user().to_owned() })
    }
}

impl<S, B> Service<ServiceRequest> for JwtMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(next_service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(header) = req.headers().get(AUTHORIZATION) {
            let user_info = header
                .to_str()
                .map_err(|e| ClubError::Unauthorized(e.to_string()))
                .and_then(|header| self.caller(header));
            match user_info {
                Ok(user_info) => {
                    log::debug!("request from {}", user_info.username);
                    req.extensions_mut().insert(user_info);
                }
                Err(e) => {
                    log::warn!("rejected token: {}", e);
                    return Box::pin(async move { Err(ClubError::Unauthorized("invalid token".into()).into()) });
                }
            }
        }
        let res_fut = self.next_service.call(req);
        Box::pin(res_fut)
    }
}
