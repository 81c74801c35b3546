//! Splitting card lists into printable pages.

use crate::error::{CardError, CardResult};

/// Cards printed on one sheet, in input order.
pub type Page = Vec<String>;

/// Trim surrounding tab/CR/LF characters, drop lines left empty and keep only
/// the first tab-separated column of the rest.
///
/// Spaces are not trimmed here: a line made of spaces is still a card.
pub fn non_blank_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let trimmed = line.as_ref().trim_matches(['\t', '\r', '\n']);
            let column = trimmed.split('\t').next().unwrap_or_default();
            (!trimmed.is_empty()).then(|| column.to_string())
        })
        .collect()
}

/// Split a whole card list on runs of line terminators.
pub fn lines_from_str(text: &str) -> Vec<String> {
    non_blank_lines(text.split(['\r', '\n']))
}

/// Group `lines` into pages of at most `capacity` cards.
pub fn paginate(lines: &[String], capacity: usize) -> CardResult<Vec<Page>> {
    if capacity == 0 {
        return Err(CardError::ZeroCapacity);
    }
    Ok(lines.chunks(capacity).map(<[String]>::to_vec).collect())
}
