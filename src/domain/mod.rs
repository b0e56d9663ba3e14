//! Domain layer - Core business objects and the seams around them
//! 
//! This layer contains:
//! - Entities: Steam ids, alias bindings, live status payloads
//! - Traits: Abstractions for infrastructure (AliasStore, SteamApi, Bot)
//!   and the AliasResolver contract the command layer depends on

pub mod entities;
pub mod traits;
