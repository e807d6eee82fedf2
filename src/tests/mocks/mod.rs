//! Pre-programmed backends built on the mockall-generated `MockTokenBackend`.

use crate::api::client::MockTokenBackend;
use crate::api::error::ApiError;
use crate::api::models::{IssuedToken, TokenPage};

/// A backend whose listing always returns `page`.
pub fn listing_backend(page: TokenPage) -> MockTokenBackend {
    let mut backend = MockTokenBackend::new();
    backend
        .expect_list_tokens()
        .returning(move |_| Ok(page.clone()));
    backend
}

/// A backend that issues `issued` once and lists `page` on every refresh.
pub fn issuing_backend(issued: IssuedToken, page: TokenPage) -> MockTokenBackend {
    let mut backend = listing_backend(page);
    backend
        .expect_create_token()
        .times(1)
        .returning(move |_| Ok(issued.clone()));
    backend
}

/// A backend that rejects every creation with `status` and `message`.
pub fn rejecting_backend(status: u16, message: &str, page: TokenPage) -> MockTokenBackend {
    let mut backend = listing_backend(page);
    let message = message.to_string();
    backend.expect_create_token().returning(move |_| {
        Err(ApiError::Status {
            status,
            message: message.clone(),
        })
    });
    backend
}

/// A backend whose listing always fails with a server error.
pub fn broken_listing_backend(message: &str) -> MockTokenBackend {
    let mut backend = MockTokenBackend::new();
    let message = message.to_string();
    backend.expect_list_tokens().returning(move |_| {
        Err(ApiError::Status {
            status: 500,
            message: message.clone(),
        })
    });
    backend
}
