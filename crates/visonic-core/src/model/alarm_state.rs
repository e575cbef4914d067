// ── Alarm state normalization ──
//
// The panel reports its state as a free-form string whose spelling has
// drifted across firmware and API revisions. `StateMapper` owns an
// ordered alias table; anything it cannot place is reported as
// `MappedState::Unparsed` and never coerced into a real state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Normalized alarm state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlarmState {
    Disarmed,
    ArmedHome,
    ArmedAway,
    Arming,
    Disarming,
    Pending,
    Triggered,
}

impl AlarmState {
    pub fn is_armed(self) -> bool {
        matches!(self, Self::ArmedHome | Self::ArmedAway)
    }

    /// States reached by a completed user action, for which the event log
    /// can tell who did it.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Disarmed | Self::ArmedHome | Self::ArmedAway)
    }
}

/// Result of mapping a raw panel state string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MappedState {
    Known(AlarmState),
    /// The raw value matched nothing. Callers must surface this.
    Unparsed(String),
}

impl MappedState {
    pub fn known(&self) -> Option<AlarmState> {
        match self {
            Self::Known(state) => Some(*state),
            Self::Unparsed(_) => None,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

impl fmt::Display for MappedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(state) => write!(f, "{state}"),
            Self::Unparsed(raw) => write!(f, "unparsed({raw})"),
        }
    }
}

/// Vendor spellings observed on the wire. Older firmware sends them in
/// upper case (`DISARM`, `HOME`), so lookup ignores ASCII case.
const BUILTIN_ALIASES: &[(&str, AlarmState)] = &[
    ("Disarm", AlarmState::Disarmed),
    ("Home", AlarmState::ArmedHome),
    ("Home Instant", AlarmState::ArmedHome),
    ("Away", AlarmState::ArmedAway),
    ("Away Instant", AlarmState::ArmedAway),
    ("ExitDelayHome", AlarmState::Arming),
    ("ExitDelayHome Instant", AlarmState::Arming),
    ("ExitDelayAway", AlarmState::Arming),
    ("ExitDelayAway Instant", AlarmState::Arming),
    ("EntryDelay", AlarmState::Pending),
    ("Alarm", AlarmState::Triggered),
];

/// Maps raw panel state strings to [`AlarmState`].
///
/// Lookup order: the alias table (built-ins, then extras added with
/// [`with_alias`](Self::with_alias)), then the normalized state names
/// (`armed_home`, `disarmed`, ...). Both comparisons ignore ASCII case.
#[derive(Debug, Clone)]
pub struct StateMapper {
    aliases: Vec<(String, AlarmState)>,
}

impl Default for StateMapper {
    fn default() -> Self {
        Self {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(raw, state)| ((*raw).to_owned(), *state))
                .collect(),
        }
    }
}

impl StateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias. A later alias for the same raw string wins.
    #[must_use]
    pub fn with_alias(mut self, raw: impl Into<String>, state: AlarmState) -> Self {
        let raw = raw.into();
        self.aliases
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&raw));
        self.aliases.push((raw, state));
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (S, AlarmState)>,
        S: Into<String>,
    {
        aliases
            .into_iter()
            .fold(self, |mapper, (raw, state)| mapper.with_alias(raw, state))
    }

    /// Matching ignores case and surrounding whitespace; an unmatched value
    /// is kept verbatim.
    pub fn map(&self, raw: &str) -> MappedState {
        let key = raw.trim();
        let alias = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(key));
        if let Some((_, state)) = alias {
            return MappedState::Known(*state);
        }
        match AlarmState::from_str(key) {
            Ok(state) => MappedState::Known(state),
            Err(_) => MappedState::Unparsed(raw.to_owned()),
        }
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, AlarmState)> {
        self.aliases.iter().map(|(raw, state)| (raw.as_str(), *state))
    }
}
