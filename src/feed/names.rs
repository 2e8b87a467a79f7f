//! Small string helpers for display names and grouping keys.

use url::Url;

/// Turn a directory name like `world_news` into `world news`.
pub fn format_section_name(name: &str) -> String {
    name.replace('_', " ")
}

/// The host part of `url` without a leading `www.`.
///
/// Anything that does not parse as an absolute URL with a host is returned
/// unchanged, so malformed source URLs still form their own group.
pub fn source_domain(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(host) => host.strip_prefix("www.").map(String::from).unwrap_or(host),
        None => url.to_string(),
    }
}
