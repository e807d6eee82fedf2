pub mod datetime;
pub mod i18n;
pub mod logging;
pub mod reveal;
