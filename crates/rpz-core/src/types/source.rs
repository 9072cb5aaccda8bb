use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::RpzError;

/// Declared line grammar of a domain-list source.
///
/// Every tag maps to exactly one extraction grammar and exactly one
/// [`SourceCategory`]; the category decides whether the source feeds the
/// wildcard pre-pass or the main pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// One domain per line, `#` comments
    Domains,
    /// One domain per line, every entry treated as a wildcard base
    WildcardDomains,
    /// Hosts-file lines of the form `0.0.0.0 <domain>`
    Hosts,
    /// RPZ zone subset: `<domain> CNAME .` without a `*.` prefix
    RpzPlain,
    /// RPZ zone subset: `*.<domain> CNAME .` wildcard rules only
    RpzWildcard,
}

/// Pipeline placement of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCategory {
    /// Entries are wildcard bases; collected in the two-pass pre-pass
    Wildcard,
    /// Entries are literal domains; streamed through the main pipeline
    NonWildcard,
}

impl SourceFormat {
    /// Pipeline category this format belongs to.
    #[must_use]
    pub const fn category(self) -> SourceCategory {
        match self {
            Self::WildcardDomains | Self::RpzWildcard => SourceCategory::Wildcard,
            Self::Domains | Self::Hosts | Self::RpzPlain => SourceCategory::NonWildcard,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domains => write!(f, "domains"),
            Self::WildcardDomains => write!(f, "wildcard-domains"),
            Self::Hosts => write!(f, "hosts"),
            Self::RpzPlain => write!(f, "rpz-plain"),
            Self::RpzWildcard => write!(f, "rpz-wildcard"),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = RpzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domains" => Ok(Self::Domains),
            "wildcard-domains" => Ok(Self::WildcardDomains),
            "hosts" => Ok(Self::Hosts),
            "rpz-plain" => Ok(Self::RpzPlain),
            "rpz-wildcard" => Ok(Self::RpzWildcard),
            other => Err(RpzError::UnknownFormat(other.to_string())),
        }
    }
}

/// One configured (URL, format) source descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Where the newline-delimited list is fetched from
    pub url: String,
    /// Declared line grammar
    pub format: SourceFormat,
}

impl Source {
    /// Pair a URL with its declared format.
    #[must_use]
    pub fn new(url: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }

    /// Pipeline category, forwarded from the format tag.
    #[must_use]
    pub const fn category(&self) -> SourceCategory {
        self.format.category()
    }
}
