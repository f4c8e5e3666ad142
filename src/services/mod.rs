use crate::error::{AppError, AppResult};

pub mod cart_service;
pub mod order_service;
pub mod product_service;

const MAX_OWNER_KEY_LEN: usize = 128;

/// Rejects owner keys that could never name a cart, before any lock or I/O.
pub(crate) fn require_owner(owner: &str) -> AppResult<()> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(AppError::InvalidArgument("owner key is required".into()));
    }
    if owner.len() > MAX_OWNER_KEY_LEN {
        return Err(AppError::InvalidArgument(format!(
            "owner key must be at most {MAX_OWNER_KEY_LEN} bytes"
        )));
    }
    Ok(())
}
