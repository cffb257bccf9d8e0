use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated user from request extensions.
///
/// `AuthMiddleware` places the verified `User` there. If it is missing the
/// middleware did not run, and the request is treated like any other
/// unauthenticated one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                log::warn!("no authenticated user on {}; is AuthMiddleware active?", req.path());
                ready(Err(AppError::InvalidToken.into()))
            }
        }
    }
}
