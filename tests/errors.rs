use axum::{http::StatusCode, response::IntoResponse};
use inventory_reservation_api::{
    dto::cart::CartLine,
    error::AppError,
    services::cart_service::cart_total,
};
use uuid::Uuid;

#[test]
fn business_outcomes_map_to_client_statuses() {
    let cases = [
        (AppError::InvalidArgument("quantity".into()), StatusCode::BAD_REQUEST),
        (AppError::NotFound("product".into()), StatusCode::NOT_FOUND),
        (
            AppError::InsufficientStock {
                product_id: Uuid::nil(),
                requested: 3,
                available: 2,
            },
            StatusCode::CONFLICT,
        ),
        (AppError::EmptyCart, StatusCode::UNPROCESSABLE_ENTITY),
        (AppError::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
        (
            AppError::DbError(sqlx::Error::RowNotFound),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.status_code(), expected, "{err}");
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn only_store_failures_are_store_errors() {
    assert!(AppError::DbError(sqlx::Error::PoolTimedOut).is_store_error());
    assert!(AppError::DeadlineExceeded.is_store_error());
    assert!(!AppError::EmptyCart.is_store_error());
    assert!(!AppError::InvalidArgument("x".into()).is_store_error());
}

#[test]
fn insufficient_stock_message_names_the_shortfall() {
    let product_id = Uuid::new_v4();
    let message = AppError::InsufficientStock {
        product_id,
        requested: 3,
        available: 2,
    }
    .to_string();
    assert!(message.contains(&product_id.to_string()));
    assert!(message.contains("requested 3"));
    assert!(message.contains("available 2"));
}

#[test]
fn cart_total_sums_quantity_times_price() {
    let lines = vec![
        CartLine {
            product_id: Uuid::new_v4(),
            quantity: 2,
            price: 1_250,
        },
        CartLine {
            product_id: Uuid::new_v4(),
            quantity: 3,
            price: 499,
        },
    ];
    assert_eq!(cart_total(&lines).unwrap(), 2 * 1_250 + 3 * 499);
    assert_eq!(cart_total(&[]).unwrap(), 0);
}

#[test]
fn cart_total_rejects_overflow() {
    let lines = vec![
        CartLine {
            product_id: Uuid::new_v4(),
            quantity: i32::MAX,
            price: i64::MAX / 2,
        },
    ];
    assert!(matches!(cart_total(&lines), Err(AppError::Internal(_))));
}
