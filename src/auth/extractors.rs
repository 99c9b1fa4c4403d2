use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Extracts the authenticated user's ID from request extensions.
///
/// This extractor is intended to be used on routes protected by
/// `AuthMiddleware`, which is responsible for validating the JWT and
/// inserting the user's ID into request extensions.
///
/// If the user ID is not found in the extensions (e.g., if `AuthMiddleware`
/// did not run or failed to insert it), this extractor will return an
/// `AppError::Unauthorized` error.
#[derive(Debug, Clone)]
pub struct AuthenticatedUserId(pub String);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUserId>().cloned() {
            Some(user_id) => ready(Ok(user_id)),
            None => {
                let err = AppError::Unauthorized(
                    "User ID not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
