//! Subcommand handlers

pub mod order;
pub mod upload;

pub use order::handle_order_command;
pub use upload::handle_upload_command;
