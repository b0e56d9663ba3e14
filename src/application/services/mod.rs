//! Application services
//!
//! - `normalizer`: raw token -> canonical SteamID64
//! - `resolution_service`: the facade over store + normalizer + Steam API
//! - `steam_command`: argument validation and subcommand routing

pub mod normalizer;
pub mod resolution_service;
pub mod steam_command;

#[cfg(test)]
pub(crate) mod testing;

pub use normalizer::{Identifier, IdentifierNormalizer};
pub use resolution_service::ResolutionService;
pub use steam_command::{CommandOutcome, SteamCommand, Subcommand};
