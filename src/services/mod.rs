pub mod mail;
pub mod templates;
