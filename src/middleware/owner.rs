use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub const OWNER_KEY_HEADER: &str = "x-owner-key";

/// The cart holder a request acts for, taken from the `X-Owner-Key` header.
#[derive(Debug, Clone)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(OWNER_KEY_HEADER)
            .ok_or_else(|| AppError::InvalidArgument("Missing X-Owner-Key header".into()))?;

        let owner = header
            .to_str()
            .map_err(|_| AppError::InvalidArgument("Invalid X-Owner-Key header".into()))?
            .trim();

        if owner.is_empty() {
            return Err(AppError::InvalidArgument("X-Owner-Key must not be empty".into()));
        }

        Ok(Owner(owner.to_string()))
    }
}
