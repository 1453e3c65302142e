pub mod connection_type;
pub mod error;
pub mod keys;
pub mod pattern;
pub mod payload;
pub mod styled_text;
