use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Store-assigned record identifier.
///
/// Ids are handed out by the store from a monotonic counter and are never
/// reused within a process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Parse a path segment into an id.
    ///
    /// Only plain base-10 digits are accepted: no sign, no whitespace, no
    /// trailing garbage.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const ANONYMOUS_OWNER: &str = "anonymous";

/// The identity a record belongs to.
///
/// Records are only visible to their owner. When no identity provider sits in
/// front of the service every caller is [`OwnerId::anonymous`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_OWNER.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_OWNER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record kind the generic store can manage.
///
/// Implementors describe how a validated draft becomes a record, how a patch
/// is merged into one, and how a collection of them is summarized.
pub trait Record: Clone + Send + Sync + 'static {
    /// Validated input for `create`.
    type Draft: Send;
    /// Validated partial input for `update`.
    type Patch: Send;
    /// Aggregate produced by [`Record::summarize`].
    type Stats;

    /// Short kind name used in log lines and error messages.
    const KIND: &'static str;

    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn id(&self) -> RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Merge the supplied fields and refresh `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Compute the aggregate in a single pass.
    fn summarize<'a, I>(records: I) -> Self::Stats
    where
        I: IntoIterator<Item = &'a Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_digits() {
        assert_eq!(RecordId::parse("42").unwrap(), RecordId::new(42));
        assert_eq!("7".parse::<RecordId>().unwrap().get(), 7);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "abc", "-1", "+3", "12abc", " 4", "1.5"] {
            assert!(RecordId::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!(RecordId::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn id_serializes_as_number() {
        let json = serde_json::to_string(&RecordId::new(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn next_id() {
        assert_eq!(RecordId::new(9).next(), RecordId::new(10));
    }

    #[test]
    fn anonymous_owner() {
        let a = OwnerId::anonymous();
        assert!(a.is_anonymous());
        assert!(!OwnerId::new("alice").is_anonymous());
        assert_eq!(OwnerId::new("alice").to_string(), "alice");
    }
}
