use crate::error::Error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub trait Payload: Serialize + DeserializeOwned {
    fn user(&self) -> &str;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}

/// Claims carried by a caller's bearer token. `user` is the caller's username.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

#[cfg(test)]
impl Claim {
    pub fn new(user: &str, ttl: chrono::Duration) -> Self {
        Self {
            user: user.into(),
            exp: (chrono::Utc::now() + ttl).timestamp(),
        }
    }
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}
