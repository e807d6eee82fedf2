pub mod api_tokens;
pub mod token_form;
