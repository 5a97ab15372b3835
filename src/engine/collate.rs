//! Name collation for roster sorting.
//!
//! Strings are compared in three passes, each consulted only when the
//! previous one ties:
//!
//! 1. base letters, ignoring accents and case ("Émile" < "Fred");
//! 2. accents, unaccented first ("Zoe" < "Zoë");
//! 3. case, lowercase first at the first differing position ("ana" < "Ana").
//!
//! This matches the ordering people expect from a dictionary rather than raw
//! code-point order, where "Ana" < "Bob" < "ana" < "Émile".

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Base letters of `s`: decomposed, accents dropped, lowercased.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Decomposed and lowercased, accents kept.
fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn compare_case(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.nfd().zip(b.nfd()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.nfd().count().cmp(&b.nfd().count())
}

/// Compare two display strings in dictionary order.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| compare_case(a, b))
}
