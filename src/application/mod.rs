//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: identifier normalization, the resolution facade, subcommands
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, rendering, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
