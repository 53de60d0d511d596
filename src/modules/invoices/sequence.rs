//! Year-scoped invoice-number sequence.
//!
//! Numbers are formatted `INV-<year>-<seq>` with the sequence zero-padded
//! to four digits. The next number for a year is one past the highest
//! suffix among every number sharing the year prefix — soft-deleted
//! invoices included, because deletion never frees a number.
//!
//! The pure functions here compute the next number from a set of existing
//! numbers; the store holds the row lock that makes the computation safe
//! under concurrent writers (see [`super::store`]).

/// Prefix for all numbers issued in `year`, including the trailing dash.
pub fn year_prefix(year: i32) -> String {
    format!("INV-{year}-")
}

/// Format a number from its parts. Sequences wider than four digits keep
/// their full width.
pub fn format_number(year: i32, seq: u32) -> String {
    format!("INV-{year}-{seq:04}")
}

/// The numeric suffix of `number`, if it belongs to `year`'s sequence.
/// Foreign or malformed numbers yield `None` and are ignored by
/// allocation.
pub fn parse_sequence(number: &str, year: i32) -> Option<u32> {
    number
        .strip_prefix(&year_prefix(year))?
        .parse::<u32>()
        .ok()
}

/// The next number in `year`'s sequence given every existing number that
/// shares the prefix. Callers must hold the allocation lock while the
/// existing set is read and the result inserted.
pub fn next_number<'a, I>(year: i32, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|n| parse_sequence(n, year))
        .max()
        .unwrap_or(0);

    format_number(year, max + 1)
}
