use crate::actix_web::{self, FromRequest, HttpMessage};
use crate::error::Error;
use std::future::{ready, Ready};

/// Identity of the authenticated caller, inserted by the jwt middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub username: String,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<Self>() {
            ready(Ok(user.clone()))
        } else {
            ready(Err(Error::Unauthorized("no caller identity in request".into())))
        }
    }
}
