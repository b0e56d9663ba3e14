//! Domain entities - Core business objects with no external dependencies

pub mod binding;
pub mod status;
pub mod steam_id;

pub use binding::{AliasBinding, AliasPolicy, BindResult, LinkOutcome};
pub use status::{
    ListedBinding, PersonaState, PresenceState, ProfileVisibility, ResolutionResult,
    StatusPayload,
};
pub use steam_id::{SteamId, STEAM_ID64_BASE};
