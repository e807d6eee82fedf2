//! Terminal UI: event loop, views and the collaborators they talk to.

pub mod app;
pub mod clipboard;
pub mod effects;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;
