//! Message handling - text in, text out around the steam command

pub mod dispatcher;
pub mod parser;
pub mod render;

pub use dispatcher::MessageDispatcher;
pub use parser::{MessageParser, ParsedCommand};
pub use render::{render, render_error};
