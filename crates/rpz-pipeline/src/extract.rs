//! Per-format domain extraction from raw source lines.

use rpz_core::{is_canonical_domain, Source, SourceFormat};
use tracing::info;

/// Extracts zero or one canonical domain name per input line, according to
/// the grammar of the source's declared format.
///
/// The extractor keeps a running count of accepted lines, reported when the
/// stage is torn down with [`DomainExtractor::finish`].
#[derive(Debug)]
pub struct DomainExtractor {
    url: String,
    format: SourceFormat,
    extracted: u64,
}

impl DomainExtractor {
    /// Build an extractor for one source.
    #[must_use]
    pub fn new(source: &Source) -> Self {
        Self {
            url: source.url.clone(),
            format: source.format,
            extracted: 0,
        }
    }

    /// Parse one raw line; `None` means the line fails the grammar and is
    /// silently dropped.
    pub fn extract(&mut self, line: &str) -> Option<String> {
        let candidate = match self.format {
            SourceFormat::Domains => plain_domain(line)?.to_string(),
            SourceFormat::WildcardDomains => {
                // Entries of a wildcard source are normalized to their base
                // domain before entering wildcard logic.
                let token = plain_domain(line)?;
                token.strip_prefix("*.").unwrap_or(token).to_string()
            }
            SourceFormat::Hosts => hosts_domain(line)?.to_string(),
            SourceFormat::RpzPlain => {
                let domain = rpz_trigger(line)?;
                if domain.starts_with("*.") {
                    return None;
                }
                domain.to_string()
            }
            SourceFormat::RpzWildcard => rpz_trigger(line)?.strip_prefix("*.")?.to_string(),
        };

        // Trailing-dot absolute names are out of grammar for every format.
        if !is_canonical_domain(&candidate) {
            return None;
        }

        self.extracted += 1;
        Some(candidate)
    }

    /// Number of domains extracted so far.
    #[must_use]
    pub const fn extracted(&self) -> u64 {
        self.extracted
    }

    /// Tear the stage down, reporting the per-source extraction count.
    pub fn finish(self) -> u64 {
        info!(
            url = %self.url,
            format = %self.format,
            extracted = self.extracted,
            "domain names extracted from source"
        );
        self.extracted
    }
}

/// Plain list grammar: the leading whitespace-delimited token of any line
/// that is non-empty and starts with neither `#` nor whitespace.
fn plain_domain(line: &str) -> Option<&str> {
    let first = line.chars().next()?;
    if first == '#' || first.is_whitespace() {
        return None;
    }
    line.split_whitespace().next()
}

/// Hosts-file grammar: `0.0.0.0 <domain>`, rejecting the sinkhole-address
/// self-mapping line.
fn hosts_domain(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("0.0.0.0")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let domain = rest.split_whitespace().next()?;
    if domain == "0.0.0.0" {
        return None;
    }
    Some(domain)
}

/// RPZ subset grammar: exactly `<domain> CNAME .`, case-insensitive on the
/// record type.
fn rpz_trigger(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let mut fields = line.split_whitespace();
    let domain = fields.next()?;
    let rtype = fields.next()?;
    let target = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    if !rtype.eq_ignore_ascii_case("CNAME") || target != "." {
        return None;
    }
    Some(domain)
}
