/// tokendeck - API token manager for the terminal
///
/// Lists, pages and creates personal API tokens against a remote backend.
/// A newly issued token is shown exactly once and can be copied to the
/// system clipboard before it is gone for good.

pub mod api;
pub mod config;
pub mod core;
pub mod tui;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
