use std::collections::HashSet;

use crate::config::AbstractConfig;

/// Suffixes that complete a five-letter stem split across a line break
/// (`"charg"` + `"ing"`).
pub const DEFAULT_JOIN_SUFFIXES: &[&str] = &["ing", "tion", "ous", "ent", "ant", "ity"];

/// Join kept abstract lines into one string, closing up words that a line
/// wrap split in two.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    join_lines_with_config(lines, &AbstractConfig::default())
}

/// Config-aware version of [`join_lines`].
pub(crate) fn join_lines_with_config<S: AsRef<str>>(
    lines: &[S],
    config: &AbstractConfig,
) -> String {
    let defaults: Vec<String> = DEFAULT_JOIN_SUFFIXES.iter().map(|s| s.to_string()).collect();
    let suffixes: HashSet<String> = config.join_suffixes.resolve(&defaults).into_iter().collect();

    let mut joined: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines.iter().map(AsRef::as_ref) {
        if let Some(prev) = joined.last_mut() {
            let split = match (prev.split_whitespace().last(), line.split_whitespace().next()) {
                (Some(last), Some(first)) => is_split_word_with_suffixes(last, first, &suffixes),
                _ => false,
            };
            if split {
                tracing::trace!(prev = %prev, line, "joining split word");
                prev.push_str(line);
                continue;
            }
        }
        joined.push(line.to_string());
    }

    joined.join(" ")
}

/// Whether `last` (end of one line) and `first` (start of the next) look like
/// the two halves of one word, using the default suffix list.
pub fn is_split_word(last: &str, first: &str) -> bool {
    let suffixes: HashSet<String> = DEFAULT_JOIN_SUFFIXES.iter().map(|s| s.to_string()).collect();
    is_split_word_with_suffixes(last, first, &suffixes)
}

fn is_split_word_with_suffixes(last: &str, first: &str, suffixes: &HashSet<String>) -> bool {
    let (Some(last_char), Some(first_char)) = (last.chars().last(), first.chars().next()) else {
        return false;
    };
    if !last_char.is_lowercase() || !first_char.is_lowercase() {
        return false;
    }
    if last.ends_with([',', ';', '.', '!', '?']) {
        return false;
    }

    let last_len = last.chars().count();
    let first_len = first.chars().count();

    // "elec" + "tric", "effi" + "ciency"
    let fragment = (3..=4).contains(&last_len)
        && (4..=7).contains(&first_len)
        && (8..=11).contains(&(last_len + first_len));

    // "charg" + "ing"
    let stem_suffix = last_len == 5 && first_len == 3 && suffixes.contains(first);

    fragment || stem_suffix
}
