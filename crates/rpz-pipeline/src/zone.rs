//! Zone header construction: comments, `$TTL`, SOA, NS.

use chrono::{DateTime, Local, SecondsFormat};
use rpz_core::Source;

/// Zone TTL, also the SOA expiry advertised via `$TTL`.
const ZONE_TTL: u32 = 3600;
/// SOA refresh timer.
const REFRESH: u32 = 86_400;
/// SOA retry timer.
const RETRY: u32 = 60;
/// SOA expire timer.
const EXPIRE: u32 = 2_592_000;
/// SOA negative-cache TTL.
const NEGATIVE_TTL: u32 = 30;

/// Render the comment block, `$TTL` directive, SOA record and NS line that
/// precede the rule section of every zone file.
///
/// `now` is injected so tests can pin the timestamp; the serial is derived
/// from it as `%y%m%d%H%M`.
#[must_use]
pub fn header_lines(
    sources: &[Source],
    name_server: &str,
    email: &str,
    now: DateTime<Local>,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(sources.len() + 10);

    lines.push(format!(
        "; Last modified: {}",
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    ));
    for (n, source) in sources.iter().enumerate() {
        lines.push(format!("; Source #{}: {}", n + 1, source.url));
    }

    lines.push(String::new());
    lines.push(format!("$TTL {ZONE_TTL}"));
    lines.push(format!(
        "@ IN SOA {name_server}. {}. (",
        escape_hostmaster(email)
    ));
    lines.push(format!("         {}", now.format("%y%m%d%H%M")));
    lines.push(format!("         {REFRESH}"));
    lines.push(format!("         {RETRY}"));
    lines.push(format!("         {EXPIRE}"));
    lines.push(format!("         {NEGATIVE_TTL} )"));
    lines.push(" NS localhost.".to_string());
    lines.push(String::new());

    lines
}

/// Render a hostmaster email address as an SOA RNAME literal: dots in the
/// local part are escaped with `\.` and the `@` becomes a label separator.
/// An address without `@` is assumed to already be in RNAME form.
#[must_use]
pub fn escape_hostmaster(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}.{domain}", local.replace('.', "\\.")),
        None => email.to_string(),
    }
}
