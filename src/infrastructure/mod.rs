//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: JSON file-backed alias store
//! - Steam: Steam Web API client
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod steam;
pub mod adapters;
