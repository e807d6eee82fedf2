//! Backend collaborator: wire types and the HTTP client.

pub mod client;
pub mod error;
pub mod models;

pub use client::{HttpTokenBackend, TokenBackend};
pub use error::ApiError;
pub use models::{
    CreateTokenRequest, IssuedToken, PageQuery, TokenPage, TokenSecret, TokenSummary, UserSummary,
};
