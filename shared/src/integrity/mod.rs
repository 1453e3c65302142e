pub mod fallback;
pub mod guard;
pub mod inventory;
