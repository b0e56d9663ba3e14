//! Group-scoped Steam aliases: bind names to Steam accounts per chat group
//! and look up their live status through the Steam Web API.

pub mod application;
pub mod domain;
pub mod infrastructure;
