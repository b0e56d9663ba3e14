//! Steam account identifiers
//!
//! Every accepted representation funnels into [`SteamId`], the 64-bit
//! form that the binding store persists and the Web API accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Offset between a 32-bit account id and its 64-bit individual id
/// (universe 1 "public", account type 1 "individual", instance 1).
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// Width of the canonical decimal form
const CANONICAL_DIGITS: usize = 17;

/// Canonical 64-bit Steam identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(u64);

impl SteamId {
    /// Build from a legacy 32-bit account id. Zero is not a real account.
    pub fn from_account_id(account_id: u32) -> Option<Self> {
        if account_id == 0 {
            return None;
        }
        Some(Self(STEAM_ID64_BASE + u64::from(account_id)))
    }

    /// Accept a raw 64-bit value only if it lies in the individual-account range.
    pub fn from_u64(value: u64) -> Option<Self> {
        let account = value.checked_sub(STEAM_ID64_BASE)?;
        if account == 0 || account > u64::from(u32::MAX) {
            return None;
        }
        Some(Self(value))
    }

    /// Parse the fixed-width decimal canonical form.
    pub fn parse_canonical(s: &str) -> Option<Self> {
        if s.len() != CANONICAL_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().and_then(Self::from_u64)
    }

    /// Parse a legacy decimal account id (`1..=u32::MAX`).
    pub fn parse_account_id(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u32>().ok().and_then(Self::from_account_id)
    }

    /// Parse Steam2 text form `STEAM_X:Y:Z`, where account id = Z * 2 + Y.
    pub fn parse_steam2(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("STEAM_")?;
        let mut parts = rest.split(':');
        let universe = parts.next()?;
        let low_bit: u64 = parts.next()?.parse().ok()?;
        let high: u64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || universe.parse::<u8>().is_err() || low_bit > 1 {
            return None;
        }
        let account = high.checked_mul(2)?.checked_add(low_bit)?;
        u32::try_from(account).ok().and_then(Self::from_account_id)
    }

    /// Parse Steam3 text form `[U:1:N]` (brackets optional).
    pub fn parse_steam3(s: &str) -> Option<Self> {
        let inner = s.trim_start_matches('[').trim_end_matches(']');
        let account = inner.strip_prefix("U:1:")?;
        account.parse::<u32>().ok().and_then(Self::from_account_id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Legacy 32-bit account id for this identifier.
    pub fn account_id(&self) -> u32 {
        // from_u64/from_account_id keep the offset within u32 range
        (self.0 - STEAM_ID64_BASE) as u32
    }

    /// Steam2 rendering, e.g. `STEAM_1:0:11101`.
    pub fn to_steam2(&self) -> String {
        let account = self.account_id();
        format!("STEAM_1:{}:{}", account & 1, account >> 1)
    }

    /// Steam3 rendering, e.g. `[U:1:22202]`.
    pub fn to_steam3(&self) -> String {
        format!("[U:1:{}]", self.account_id())
    }

    pub fn profile_url(&self) -> String {
        format!("https://steamcommunity.com/profiles/{}", self.0)
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_canonical(s).ok_or_else(|| format!("not a canonical SteamID64: {}", s))
    }
}

// Persisted and sent over the wire as a decimal string so JSON readers
// without 64-bit integers don't lose precision.
impl Serialize for SteamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SteamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
