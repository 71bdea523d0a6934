use super::repair::has_escaped_bytes;
use crate::error::{Error, SyncResult};
use tracing::debug;

/// "Дата:" as it appears in decoded text
pub const DATE_MARKER: &str = "Дата:";

/// "Дата:" as it appears before byte escapes are repaired
pub const ESCAPED_DATE_MARKER: &str = r"\xd0\x94\xd0\xb0\xd1\x82\xd0\xb0:";

/// Whether a fragment carries a lecture date
pub fn is_date_fragment(fragment: &str) -> bool {
    fragment.contains(DATE_MARKER) || fragment.contains(ESCAPED_DATE_MARKER)
}

/// Stray values such as `5.00` that sit between a lecture's bullet points
pub fn is_number(fragment: &str) -> bool {
    fragment.trim().parse::<f64>().is_ok()
}

/// Text in the page's own language, escaped or already decoded
fn has_native_text(fragment: &str) -> bool {
    has_escaped_bytes(fragment) || !fragment.is_ascii()
}

/// Pull the `[name, date, name, date, ...]` sequence out of a page's fragments.
///
/// The page lists each lecture as its name, optional bullet points, then the
/// date line. Every fragment directly followed by a date line closes a lecture;
/// its name is the first non-numeric fragment after the previous date line.
/// Leading noise comes before the first lecture and nothing follows the last,
/// so only the final `lecture_count` pairs are kept.
pub fn extract_lecture_data(fragments: &[String], lecture_count: usize) -> SyncResult<Vec<String>> {
    let mut lecture_data = Vec::new();
    let mut previous_date: Option<usize> = None;

    for (i, pair) in fragments.windows(2).enumerate() {
        if is_date_fragment(&pair[0]) {
            previous_date = Some(i);
            continue;
        }
        if !is_date_fragment(&pair[1]) {
            continue;
        }

        let name_start = match previous_date {
            Some(date_idx) => date_idx + 1,
            None => first_lecture_start(fragments, i),
        };

        match find_lecture_name(fragments, name_start, i) {
            Some(name) => {
                lecture_data.push(name.clone());
                lecture_data.push(pair[1].clone());
            }
            None => debug!(date = %pair[1], "Discarding lecture with only numeric name candidates"),
        }
    }

    let expected = lecture_count * 2;
    if lecture_data.len() < expected {
        return Err(Error::TruncatedExtraction {
            expected,
            found: lecture_data.len(),
        });
    }

    Ok(lecture_data.split_off(lecture_data.len() - expected))
}

/// Where the name of the first lecture begins, since no date line precedes it.
///
/// Everything up to the last fragment with native text is treated as page
/// chrome. When even the fragment before the date has native text, the date
/// itself is returned as the name and is later replaced by the normalizer.
fn first_lecture_start(fragments: &[String], before_date: usize) -> usize {
    (0..=before_date)
        .rev()
        .find(|&idx| has_native_text(&fragments[idx]))
        .map_or(0, |idx| idx + 1)
}

fn find_lecture_name(fragments: &[String], start: usize, end: usize) -> Option<&String> {
    if start > end {
        return fragments.get(start);
    }
    fragments[start..=end].iter().find(|f| !is_number(f))
}
