//! Cookie sessions.
//!
//! A session is an opaque random token carried in a cookie. The engine binds tokens to logins when users register or
//! log in, and every other request is authorised by resolving its token back to a login.
use actix_web::{cookie::Cookie, dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::*;

use crate::config::DEFAULT_SESSION_COOKIE;

/// The name of the session cookie. Register it as app data; requests fall back to the default name otherwise.
#[derive(Clone, Debug)]
pub struct SessionCookie {
    name: String,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIE)
    }
}

impl SessionCookie {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// A cookie that carries `token` for the whole site. Scripts cannot read it.
    pub fn issue(&self, token: &str) -> Cookie<'static> {
        Cookie::build(self.name.clone(), token.to_string()).path("/").http_only(true).finish()
    }
}

/// The session token presented with a request. Empty if the request carried no session cookie, which the engine
/// rejects as unauthorised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromRequest for SessionToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = match req.app_data::<web::Data<SessionCookie>>() {
            Some(cookie) => req.cookie(cookie.name()),
            None => req.cookie(DEFAULT_SESSION_COOKIE),
        }
        .map(|c| c.value().to_string())
        .unwrap_or_default();
        if token.is_empty() {
            trace!("💻️ No session cookie in request to {}", req.path());
        }
        ready(Ok(SessionToken(token)))
    }
}
