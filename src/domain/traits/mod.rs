//! Domain traits - Abstractions for infrastructure

pub mod bot;
pub mod resolver;
pub mod steam;
pub mod store;

pub use bot::{Bot, BotInfo};
pub use resolver::AliasResolver;
pub use steam::SteamApi;
pub use store::AliasStore;
