//! Fixed vocabularies used by the address parser, and the patterns built from them.
//!
//! Extending recognition means adding entries here; the parsing control flow
//! never carries these words inline.

use std::sync::LazyLock;
use regex::Regex;

/// Country tokens recognised at the very end of an address.
pub const COUNTRY_TOKENS: &[&str] = &[
    "United States of America",
    "United States",
    "U.S.A.",
    "USA",
    "U.S.",
    "US",
    "Canada",
    "Mexico",
];

/// Secondary-address designators (unit, suite, box, ...), abbreviated and full.
///
/// `Fl` is left out on purpose: it reads as the Florida state code.
pub const SECONDARY_DESIGNATORS: &[&str] = &[
    "Apartment", "Apt",
    "Suite", "Ste",
    "Unit",
    "Building", "Bldg",
    "Floor", "Flr",
    "Room", "Rm",
    "Lot",
    "Space", "Spc",
    "Department", "Dept",
    "Trailer", "Trlr",
    "Post Office Box", "P.O. Box", "PO Box", "P O Box",
    "Box",
    "#",
];

/// Words that, directly before `Box`, make the box the street itself.
pub const PO_BOX_LEAD_INS: &[&str] = &["Post Office", "P.O.", "P. O.", "PO", "P O"];

/// Identifier after a designator: either starts with a digit (`4B`, `200`, `12-A`)
/// or is a single letter with optional digits (`A`, `B12`). A letter identifier
/// must be set apart by whitespace or `#`.
const IDENTIFIER: &str = r"(?:(?:\s*#?\s*\d[A-Za-z0-9-]*|(?:\s+|\s*#)\s*[A-Za-z](?:-?\d+)?)\b)";

/// Turn a vocabulary into a regex alternation, longest entry first.
/// Spaces inside an entry match any run of whitespace.
pub fn alternation<S: AsRef<str>>(words: &[S]) -> String {
    let mut words = words.iter()
        .map(|w| w.as_ref().trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    words.iter()
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// A designator with its optional identifier, unanchored.
pub fn secondary_fragment() -> String {
    format!(r"(?i:{})\.?{}?", alternation(SECONDARY_DESIGNATORS), IDENTIFIER)
}

/// Pattern matching a trailing country token, with the separator before it.
pub fn country_pattern<S: AsRef<str>>(tokens: &[S]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)(?:^|[\s,]+)(?P<country>{})\s*$", alternation(tokens)))
}

pub static DEFAULT_COUNTRY_REG: LazyLock<Regex> = LazyLock::new(|| country_pattern(COUNTRY_TOKENS).unwrap());

/// street, optional secondary, city, state, zip
pub static STRUCTURED_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"^(?P<street>.+?)",
            r"(?:[\s,]+(?P<address2>{}))?",
            r"\s*,\s*(?P<city>\p{{L}}[\p{{L}} .'-]*?)",
            r"(?:\s*,\s*|\s+)(?P<state>[A-Z]{{2}})",
            r"[\s,]*(?P<zip>\d{{5}}(?:-\d{{4}})?)",
            r"[\s,]*$",
        ),
        secondary_fragment()
    )).unwrap()
});

/// A secondary designator anywhere in a street line. A bare designator with
/// no identifier only counts at the very end.
pub static SECONDARY_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:^|[\s,]+)(?P<address2>(?i:{})\.?(?:{}|[\s,]*$))",
        alternation(SECONDARY_DESIGNATORS),
        IDENTIFIER
    )).unwrap()
});

/// A whole comma segment that is nothing but a secondary designator.
pub static SECONDARY_SEGMENT_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}$", secondary_fragment())).unwrap()
});

/// `ST 12345` / `ST 12345-6789` / `ST`
pub static STATE_ZIP_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<state>[A-Z]{2})(?:[\s,]*(?P<zip>\d{5}(?:-\d{4})?))?$").unwrap()
});

pub static PO_BOX_LEAD_IN_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:^|\s)(?:{})$", alternation(PO_BOX_LEAD_INS))).unwrap()
});

pub static BOX_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^box\b").unwrap());

/// `PO Box`, `P.O. Box`, `Post Office Box` at the start of a fragment
pub static PO_BOX_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:{})\s*box\b", alternation(PO_BOX_LEAD_INS))).unwrap()
});

/// Text made of words only, e.g. the `New` in `New Mexico`
pub static PLACE_WORDS_REG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}[\p{L} .'-]*$").unwrap()
});
