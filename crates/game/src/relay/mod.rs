mod action;
mod authority;
mod context;

pub use action::Action;
pub use authority::{apply_local, handle_message, submit};
pub use context::{NetContext, NetRole};
