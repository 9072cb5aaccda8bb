use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::RpzError;

/// Policy action applied by an RPZ trigger rule.
///
/// Each action maps to a fixed rule suffix; the trigger domain plus the
/// suffix forms one zone line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyAction {
    /// Answer NXDOMAIN for the triggering name
    Nxdomain,
    /// Answer NODATA (name exists, no records)
    Nodata,
    /// Answer with the 0.0.0.0 sinkhole address
    NullRoute,
}

impl PolicyAction {
    /// The fixed RPZ rule suffix for this action.
    #[must_use]
    pub const fn rule_suffix(self) -> &'static str {
        match self {
            Self::Nxdomain => "CNAME .",
            Self::Nodata => "CNAME *.",
            Self::NullRoute => "A 0.0.0.0",
        }
    }
}

impl std::fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nxdomain => write!(f, "nxdomain"),
            Self::Nodata => write!(f, "nodata"),
            Self::NullRoute => write!(f, "null-route"),
        }
    }
}

impl FromStr for PolicyAction {
    type Err = RpzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nxdomain" => Ok(Self::Nxdomain),
            "nodata" => Ok(Self::Nodata),
            "null-route" => Ok(Self::NullRoute),
            other => Err(RpzError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One configured output: a destination file and the policy action every
/// accepted domain is bound to in that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Zone file path to publish
    pub destination: PathBuf,
    /// Policy action rendered into every rule line
    pub action: PolicyAction,
}

impl Output {
    /// Pair a destination path with a policy action.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>, action: PolicyAction) -> Self {
        Self {
            destination: destination.into(),
            action,
        }
    }
}
