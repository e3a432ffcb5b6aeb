//! Named hierarchy-construction policies.

use crate::model::tree::VIRTUAL_ROOT_LABEL;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a child with several parent edges is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiParentPolicy {
    /// Attach under every parent; the child subtree is repeated per parent.
    #[default]
    AttachUnderEach,
    /// Attach only under the parent of the first accepted edge.
    FirstParentWins,
}

/// How a parent cycle met during tree materialization is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Drop the back-edge and keep building.
    #[default]
    Truncate,
    /// Fail the build with the offending edge.
    Reject,
}

/// Manifest-style string value for [`MultiParentPolicy::AttachUnderEach`].
pub const MULTI_PARENT_ATTACH_UNDER_EACH: &str = "attach-under-each";
/// Manifest-style string value for [`MultiParentPolicy::FirstParentWins`].
pub const MULTI_PARENT_FIRST_PARENT_WINS: &str = "first-parent-wins";
/// String value for [`CyclePolicy::Truncate`].
pub const CYCLE_TRUNCATE: &str = "truncate";
/// String value for [`CyclePolicy::Reject`].
pub const CYCLE_REJECT: &str = "reject";

impl MultiParentPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttachUnderEach => MULTI_PARENT_ATTACH_UNDER_EACH,
            Self::FirstParentWins => MULTI_PARENT_FIRST_PARENT_WINS,
        }
    }

    /// Parses a policy name. Underscores are accepted in place of dashes.
    pub fn parse(value: &str) -> Result<Self, PolicyParseError> {
        match normalize_policy_name(value)?.as_str() {
            MULTI_PARENT_ATTACH_UNDER_EACH => Ok(Self::AttachUnderEach),
            MULTI_PARENT_FIRST_PARENT_WINS => Ok(Self::FirstParentWins),
            other => Err(PolicyParseError::Unsupported {
                policy: "multi-parent",
                value: other.to_string(),
            }),
        }
    }
}

impl CyclePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Truncate => CYCLE_TRUNCATE,
            Self::Reject => CYCLE_REJECT,
        }
    }

    pub fn parse(value: &str) -> Result<Self, PolicyParseError> {
        match normalize_policy_name(value)?.as_str() {
            CYCLE_TRUNCATE => Ok(Self::Truncate),
            CYCLE_REJECT => Ok(Self::Reject),
            other => Err(PolicyParseError::Unsupported {
                policy: "cycle",
                value: other.to_string(),
            }),
        }
    }
}

/// Policy name parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyParseError {
    Empty,
    Unsupported { policy: &'static str, value: String },
}

impl Display for PolicyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "policy value must not be empty"),
            Self::Unsupported { policy, value } => {
                write!(f, "unsupported {policy} policy: {value}")
            }
        }
    }
}

impl Error for PolicyParseError {}

fn normalize_policy_name(value: &str) -> Result<String, PolicyParseError> {
    let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
    if normalized.is_empty() {
        return Err(PolicyParseError::Empty);
    }
    Ok(normalized)
}

/// Options for one hierarchy build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    pub multi_parent: MultiParentPolicy,
    pub cycles: CyclePolicy,
    /// Label of the synthetic root.
    pub root_label: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            multi_parent: MultiParentPolicy::default(),
            cycles: CyclePolicy::default(),
            root_label: VIRTUAL_ROOT_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildOptions, CyclePolicy, MultiParentPolicy, PolicyParseError};

    #[test]
    fn parses_policy_names() {
        assert_eq!(
            MultiParentPolicy::parse(" First_Parent_Wins ").unwrap(),
            MultiParentPolicy::FirstParentWins
        );
        assert_eq!(
            MultiParentPolicy::parse("attach-under-each").unwrap(),
            MultiParentPolicy::AttachUnderEach
        );
        assert_eq!(CyclePolicy::parse("REJECT").unwrap(), CyclePolicy::Reject);
    }

    #[test]
    fn rejects_unknown_and_empty_policy_names() {
        assert_eq!(CyclePolicy::parse("  "), Err(PolicyParseError::Empty));
        assert_eq!(
            CyclePolicy::parse("ignore"),
            Err(PolicyParseError::Unsupported {
                policy: "cycle",
                value: "ignore".to_string()
            })
        );
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for policy in [
            MultiParentPolicy::AttachUnderEach,
            MultiParentPolicy::FirstParentWins,
        ] {
            assert_eq!(MultiParentPolicy::parse(policy.as_str()).unwrap(), policy);
        }
    }

    #[test]
    fn defaults_preserve_lenient_behavior() {
        let options = BuildOptions::default();
        assert_eq!(options.multi_parent, MultiParentPolicy::AttachUnderEach);
        assert_eq!(options.cycles, CyclePolicy::Truncate);
        assert_eq!(options.root_label, "Family");
    }
}
