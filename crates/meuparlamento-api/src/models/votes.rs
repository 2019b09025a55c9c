//! Vote tallies and the per-party vote decoder.
//!
//! Proposals carry a tally of party codes grouped by vote direction
//! (`afavor`, `contra`, `abstencao`). The ingestion pipeline stores each
//! group either as a comma-joined string (`"PS, PCP, VERDES"`) or as a list
//! of codes; both shapes deserialize into the same [`VoteTally`].

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Decoded vote of a single party on a proposal.
///
/// Serialized with the numeric encoding clients expect:
/// `1` in favor, `-1` against, `0` abstain, `null` unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    InFavor,
    Against,
    Abstain,
    Unknown,
}

impl Vote {
    /// Numeric wire encoding, `None` for [`Vote::Unknown`].
    pub fn as_code(&self) -> Option<i8> {
        match self {
            Vote::InFavor => Some(1),
            Vote::Against => Some(-1),
            Vote::Abstain => Some(0),
            Vote::Unknown => None,
        }
    }
}

impl Serialize for Vote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_code() {
            Some(code) => serializer.serialize_i8(code),
            None => serializer.serialize_none(),
        }
    }
}

/// How a party code is matched against a vote group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteMatching {
    /// Exact membership of the trimmed party token.
    #[default]
    Exact,

    /// Substring containment over a group stored as a comma-joined string,
    /// so `"PS"` matches inside `"PSD"`. Groups stored as lists still use
    /// exact membership.
    Substring,
}

impl VoteMatching {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteMatching::Exact => "exact",
            VoteMatching::Substring => "substring",
        }
    }
}

impl fmt::Display for VoteMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(VoteMatching::Exact),
            "substring" => Ok(VoteMatching::Substring),
            other => Err(format!(
                "expected 'exact' or 'substring', got '{}'",
                other
            )),
        }
    }
}

/// Party codes of a single vote group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyCodes {
    codes: BTreeSet<String>,
    /// The stored string, when the group was stored comma-joined.
    joined: Option<String>,
}

impl PartyCodes {
    /// Build from a comma-joined group such as `"CDS-PP, PSD"`.
    pub fn from_joined(joined: &str) -> Self {
        let codes = joined
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            codes,
            joined: Some(joined.to_string()),
        }
    }

    /// Build from a list of codes.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes
            .into_iter()
            .map(Into::into)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();

        Self {
            codes,
            joined: None,
        }
    }

    pub fn contains(&self, party: &str, matching: VoteMatching) -> bool {
        match (matching, &self.joined) {
            (VoteMatching::Substring, Some(joined)) => joined.contains(party),
            _ => self.codes.contains(party.trim()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Raw shape of a vote group as found in the document store.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawPartyCodes {
    Joined(String),
    Codes(Vec<String>),
}

impl Default for RawPartyCodes {
    fn default() -> Self {
        RawPartyCodes::Codes(Vec::new())
    }
}

impl From<RawPartyCodes> for PartyCodes {
    fn from(raw: RawPartyCodes) -> Self {
        match raw {
            RawPartyCodes::Joined(joined) => PartyCodes::from_joined(&joined),
            RawPartyCodes::Codes(codes) => PartyCodes::from_codes(codes),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawVoteTally {
    #[serde(default)]
    afavor: RawPartyCodes,
    #[serde(default)]
    contra: RawPartyCodes,
    #[serde(default)]
    abstencao: RawPartyCodes,
}

/// Tally of party codes by vote direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawVoteTally")]
pub struct VoteTally {
    pub in_favor: PartyCodes,
    pub against: PartyCodes,
    pub abstain: PartyCodes,
}

impl From<RawVoteTally> for VoteTally {
    fn from(raw: RawVoteTally) -> Self {
        Self {
            in_favor: raw.afavor.into(),
            against: raw.contra.into(),
            abstain: raw.abstencao.into(),
        }
    }
}

impl VoteTally {
    /// Build a tally from comma-joined groups.
    pub fn from_joined(in_favor: &str, against: &str, abstain: &str) -> Self {
        Self {
            in_favor: PartyCodes::from_joined(in_favor),
            against: PartyCodes::from_joined(against),
            abstain: PartyCodes::from_joined(abstain),
        }
    }
}

/// Decode how `party` voted.
///
/// Groups are checked in fixed priority order: in favor, against, abstain.
/// A party erroneously listed in several groups resolves to the first match.
pub fn decode_vote(party: &str, tally: &VoteTally, matching: VoteMatching) -> Vote {
    if tally.in_favor.contains(party, matching) {
        Vote::InFavor
    } else if tally.against.contains(party, matching) {
        Vote::Against
    } else if tally.abstain.contains(party, matching) {
        Vote::Abstain
    } else {
        Vote::Unknown
    }
}
