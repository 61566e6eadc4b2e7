use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AbstractConfig;

/// Locate the abstract section in the scanned text.
///
/// Returns everything after the first whole-word, case-insensitive
/// "ABSTRACT", or `None` when the heading never appears.
pub fn find_abstract_section(text: &str) -> Option<&str> {
    find_abstract_section_with_config(text, &AbstractConfig::default())
}

/// Config-aware version of [`find_abstract_section`].
pub(crate) fn find_abstract_section_with_config<'a>(
    text: &'a str,
    config: &AbstractConfig,
) -> Option<&'a str> {
    static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bABSTRACT\b").unwrap());

    let heading_re = config.heading_re.as_ref().unwrap_or(&HEADING_RE);
    let m = heading_re.find(text)?;
    Some(&text[m.end()..])
}
