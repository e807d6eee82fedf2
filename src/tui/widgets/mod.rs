pub mod avatar;
pub mod text_field;
