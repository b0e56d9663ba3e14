//! Identifier normalization
//!
//! Turns whatever a user typed (SteamID64, account id, Steam2/Steam3 text,
//! profile URL, vanity name) into a [`SteamId`]. Only vanity names need the
//! network.

use std::sync::Arc;

use crate::application::errors::ResolveError;
use crate::domain::entities::SteamId;
use crate::domain::traits::SteamApi;

const COMMUNITY_HOST: &str = "steamcommunity.com/";

/// Shape of a raw token, decided without touching the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Id(SteamId),
    Vanity(String),
}

impl Identifier {
    pub fn classify(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let s = s.strip_prefix('@').unwrap_or(s).trim();
        if s.is_empty() {
            return None;
        }

        if let Some(path) = community_path(s) {
            let mut segments = path.split('/').filter(|p| !p.is_empty());
            return match (segments.next(), segments.next()) {
                (Some("profiles"), Some(id)) => SteamId::parse_canonical(id).map(Identifier::Id),
                (Some("id"), Some(name)) if is_vanity(name) => Some(Identifier::Vanity(name.to_string())),
                _ => None,
            };
        }

        // An all-digit token is never sent off as a vanity name
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return SteamId::parse_canonical(s)
                .or_else(|| SteamId::parse_account_id(s))
                .map(Identifier::Id);
        }

        if s.starts_with("STEAM_") {
            return SteamId::parse_steam2(s).map(Identifier::Id);
        }
        if s.starts_with("[U:") || s.starts_with("U:") {
            return SteamId::parse_steam3(s).map(Identifier::Id);
        }

        is_vanity(s).then(|| Identifier::Vanity(s.to_string()))
    }
}

/// Path after `steamcommunity.com/` in a profile link, if `s` is one.
/// The host must come first, after an optional scheme and `www.`.
fn community_path(s: &str) -> Option<&str> {
    let rest = strip_prefix_ignore_case(s, "https://")
        .or_else(|| strip_prefix_ignore_case(s, "http://"))
        .unwrap_or(s);
    let rest = strip_prefix_ignore_case(rest, "www.").unwrap_or(rest);
    let path = strip_prefix_ignore_case(rest, COMMUNITY_HOST)?;
    Some(path.split(['?', '#']).next().unwrap_or(path))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .and_then(|_| s.get(prefix.len()..))
}

/// Vanity URL names: 2-32 chars of letters, digits, `_` and `-`.
fn is_vanity(s: &str) -> bool {
    (2..=32).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Normalizer backed by the remote vanity lookup
#[derive(Clone)]
pub struct IdentifierNormalizer {
    steam: Arc<dyn SteamApi>,
}

impl IdentifierNormalizer {
    pub fn new(steam: Arc<dyn SteamApi>) -> Self {
        Self { steam }
    }

    pub async fn normalize(&self, raw: &str) -> Result<SteamId, ResolveError> {
        match Identifier::classify(raw) {
            Some(Identifier::Id(id)) => Ok(id),
            Some(Identifier::Vanity(name)) => {
                let id = self.steam.resolve_vanity(&name).await?;
                tracing::debug!(vanity = %name, steam_id = %id, "resolved vanity name");
                Ok(id)
            }
            None => Err(ResolveError::NotResolvable(raw.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::LookupError;
    use crate::application::services::testing::FakeSteam;

    fn id(account: u32) -> SteamId {
        SteamId::from_account_id(account).unwrap()
    }

    #[test]
    fn classify_numeric_forms() {
        assert_eq!(
            Identifier::classify("76561197960287930"),
            Some(Identifier::Id(id(22202)))
        );
        assert_eq!(Identifier::classify("22202"), Some(Identifier::Id(id(22202))));
        assert_eq!(Identifier::classify(" @22202 "), Some(Identifier::Id(id(22202))));
        assert_eq!(Identifier::classify("STEAM_0:0:11101"), Some(Identifier::Id(id(22202))));
        assert_eq!(Identifier::classify("[U:1:22202]"), Some(Identifier::Id(id(22202))));
    }

    #[test]
    fn classify_rejects_numbers_outside_both_ranges() {
        assert_eq!(Identifier::classify("1145141919810"), None);
        assert_eq!(Identifier::classify("0"), None);
        assert_eq!(Identifier::classify(""), None);
    }

    #[test]
    fn classify_profile_urls() {
        assert_eq!(
            Identifier::classify("https://steamcommunity.com/profiles/76561197960287930/"),
            Some(Identifier::Id(id(22202)))
        );
        assert_eq!(
            Identifier::classify("steamcommunity.com/id/gabelogannewell?l=english"),
            Some(Identifier::Vanity("gabelogannewell".to_string()))
        );
        assert_eq!(Identifier::classify("https://steamcommunity.com/groups/x"), None);
        assert_eq!(
            Identifier::classify("HTTPS://www.SteamCommunity.com/id/robin_walker"),
            Some(Identifier::Vanity("robin_walker".to_string()))
        );
    }

    #[test]
    fn classify_rejects_lookalike_hosts() {
        assert_eq!(Identifier::classify("evilsteamcommunity.com/id/x"), None);
        assert_eq!(Identifier::classify("https://evilsteamcommunity.com/id/robin"), None);
        assert_eq!(
            Identifier::classify("https://example.com/?u=steamcommunity.com/profiles/76561197960287930"),
            None
        );
    }

    #[test]
    fn classify_vanity_names() {
        assert_eq!(
            Identifier::classify("robin_walker"),
            Some(Identifier::Vanity("robin_walker".to_string()))
        );
        assert_eq!(Identifier::classify("麦麦"), None);
        assert_eq!(Identifier::classify("a"), None);
        assert_eq!(Identifier::classify("has space"), None);
    }

    #[test]
    fn canonical_range_edges_are_identity() {
        for raw in ["76561197960265729", "76561202255233023"] {
            match Identifier::classify(raw) {
                Some(Identifier::Id(id)) => assert_eq!(id.to_string(), raw),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn numeric_input_skips_the_network() {
        let steam = Arc::new(FakeSteam::default());
        let normalizer = IdentifierNormalizer::new(steam.clone());
        assert_eq!(normalizer.normalize("22202").await.unwrap(), id(22202));
        assert_eq!(steam.vanity_calls(), 0);
    }

    #[tokio::test]
    async fn vanity_goes_through_the_api() {
        let steam = Arc::new(FakeSteam::default().with_vanity("gaben", id(22202)));
        let normalizer = IdentifierNormalizer::new(steam.clone());
        assert_eq!(normalizer.normalize("gaben").await.unwrap(), id(22202));
        assert_eq!(
            normalizer.normalize("nobody_here").await.unwrap_err(),
            ResolveError::NotFound("nobody_here".to_string())
        );
        assert_eq!(steam.vanity_calls(), 2);
    }

    #[tokio::test]
    async fn transient_vanity_errors_propagate() {
        let steam = Arc::new(FakeSteam::default().failing(LookupError::Transient("timeout".into())));
        let normalizer = IdentifierNormalizer::new(steam);
        assert!(matches!(
            normalizer.normalize("gaben").await.unwrap_err(),
            ResolveError::Transient(_)
        ));
    }

    #[tokio::test]
    async fn garbage_is_not_resolvable() {
        let normalizer = IdentifierNormalizer::new(Arc::new(FakeSteam::default()));
        assert_eq!(
            normalizer.normalize(" what is this ").await.unwrap_err(),
            ResolveError::NotResolvable("what is this".to_string())
        );
    }
}
