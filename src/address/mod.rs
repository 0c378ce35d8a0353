//! Free-form postal address parsing.
//!
//! The pipeline is fixed: normalize lines, strip a trailing country, detect a
//! name line, segment the body with the first strategy that accepts it, then
//! pull a secondary designator (apt, suite, box, ...) out of the street.
//! Parsing never fails; anything that cannot be recognised is left empty.

use std::sync::LazyLock;
use log::{debug, trace};
use regex::Regex;
use crate::address::model::AddressFields;
use crate::address::strategy::{default_strategies, BodyParts, BodyStrategy};
use crate::address::vocab::{
    country_pattern, BOX_REG, COUNTRY_TOKENS, DEFAULT_COUNTRY_REG, PLACE_WORDS_REG, PO_BOX_LEAD_IN_REG, PO_BOX_REG,
    SECONDARY_REG,
};
use crate::utils::{comma_segments, has_digit, normalize_lines, trim_field};

pub mod model;
pub mod strategy;
pub mod vocab;

/// Single-line inputs need at least this many comma segments before the first
/// one is read as a name.
const MIN_SEGMENTS_FOR_NAME: usize = 4;

static DEFAULT_PARSER: LazyLock<AddressParser> = LazyLock::new(AddressParser::new);

/// Parse with the default vocabularies.
pub fn parse_address(text: &str) -> AddressFields {
    DEFAULT_PARSER.parse(text)
}

pub struct AddressParser {
    country_reg: Regex,
    strategies: Vec<Box<dyn BodyStrategy>>,
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressParser {
    pub fn new() -> Self {
        Self {
            country_reg: DEFAULT_COUNTRY_REG.clone(),
            strategies: default_strategies(),
        }
    }

    /// Recognise `extra` country tokens on top of [`COUNTRY_TOKENS`].
    pub fn with_extra_countries<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = COUNTRY_TOKENS.iter()
            .map(|token| token.to_string())
            .chain(extra.into_iter().map(|token| token.as_ref().to_string()))
            .collect::<Vec<_>>();
        Ok(
            Self {
                country_reg: country_pattern(&tokens)?,
                strategies: default_strategies(),
            }
        )
    }

    pub fn parse(&self, text: &str) -> AddressFields {
        let mut lines = normalize_lines(text);

        let mut country = String::new();
        if let Some(last) = lines.last_mut() {
            if let Some((rest, token)) = self.take_country(*last) {
                debug!("stripped trailing country [{}]", token);
                *last = rest;
                country = token;
            }
        }
        lines.retain(|line| !line.is_empty());

        let (name, body) = Self::split_name(&lines);
        trace!("name [{}], body [{}]", name, body);

        let mut parts = self.segment_body(&body);
        Self::fold_po_box(&mut parts);
        if parts.address2.is_empty() {
            if let Some((street, address2)) = Self::extract_secondary(&parts.street) {
                parts.street = street;
                parts.address2 = address2;
            }
        }

        AddressFields {
            name: trim_field(name).to_string(),
            street: trim_field(&parts.street).to_string(),
            address2: trim_field(&parts.address2).to_string(),
            city: trim_field(&parts.city).to_string(),
            state: trim_field(&parts.state).to_string(),
            zip: trim_field(&parts.zip).to_string(),
            country: trim_field(&country).to_string(),
        }
    }

    /// Remove a country token from the end of `line`, returning the rest and the token.
    fn take_country<'a>(&self, line: &'a str) -> Option<(&'a str, String)> {
        let caps = self.country_reg.captures(line)?;
        let start = caps.get(0)?.start();
        let token = caps.name("country")?;
        let rest = &line[..start];
        // `New Mexico`: the token ends a longer place name
        if !rest.is_empty() && !line[start..token.start()].contains(',') && PLACE_WORDS_REG.is_match(rest) {
            debug!("[{}] is part of [{}], not a country", token.as_str(), line);
            return None;
        }
        Some((trim_field(rest), token.as_str().to_string()))
    }

    /// Pick out a leading name, returning it with the body joined by `", "`.
    ///
    /// A name never contains digits, so a numeric street line is never taken for one.
    fn split_name<'a>(lines: &[&'a str]) -> (&'a str, String) {
        match *lines {
            [] => ("", String::new()),
            [line] => {
                let segments = comma_segments(line);
                if segments.len() >= MIN_SEGMENTS_FOR_NAME && !has_digit(segments[0]) {
                    (segments[0], segments[1..].join(", "))
                } else {
                    ("", line.to_string())
                }
            }
            [first, ref rest @ ..] => {
                if has_digit(first) {
                    ("", Self::join_lines(lines))
                } else {
                    (first, Self::join_lines(rest))
                }
            }
        }
    }

    fn join_lines(lines: &[&str]) -> String {
        lines.iter()
            .map(|line| trim_field(line))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn segment_body(&self, body: &str) -> BodyParts {
        self.strategies.iter()
            .find_map(|strategy| {
                let parts = strategy.segment(body)?;
                debug!("[{}] strategy matched [{}]", strategy.name(), body);
                Some(parts)
            })
            .unwrap_or_default()
    }

    /// `PO` + `Box 12` is a PO box street, not a street with a secondary unit.
    fn fold_po_box(parts: &mut BodyParts) {
        if BOX_REG.is_match(&parts.address2) && PO_BOX_LEAD_IN_REG.is_match(&parts.street) {
            parts.street = format!("{} {}", parts.street, parts.address2);
            parts.address2.clear();
        }
    }

    /// Split the first secondary designator off a street line, joining the
    /// text around it back into the street.
    fn extract_secondary(street: &str) -> Option<(String, String)> {
        SECONDARY_REG.captures_iter(street).find_map(|caps| {
            let whole = caps.get(0)?;
            let address2 = trim_field(caps.name("address2")?.as_str());
            let before = trim_field(&street[..whole.start()]);
            let after = trim_field(&street[whole.end()..]);
            let po_box_street = if before.is_empty() {
                PO_BOX_REG.is_match(address2)
            } else {
                BOX_REG.is_match(address2) && PO_BOX_LEAD_IN_REG.is_match(before)
            };
            if po_box_street {
                return None;
            }
            let rest = [before, after].into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if rest.is_empty() {
                return None;
            }
            Some((rest, address2.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_with_name_suite_and_country() {
        let fields = parse_address("Britt Kimmel\n15373 E Hinsdale Cir ste a,\nCentennial, CO 80112, USA");
        assert_eq!(fields.name, "Britt Kimmel");
        assert_eq!(fields.street, "15373 E Hinsdale Cir");
        assert_eq!(fields.address2, "ste a");
        assert_eq!(fields.city, "Centennial");
        assert_eq!(fields.state, "CO");
        assert_eq!(fields.zip, "80112");
        assert_eq!(fields.country, "USA");
    }

    #[test]
    fn single_line_without_name() {
        let fields = parse_address("4506 Central School Road, St. Charles, MO 63304, USA");
        assert_eq!(fields.name, "");
        assert_eq!(fields.street, "4506 Central School Road");
        assert_eq!(fields.address2, "");
        assert_eq!(fields.city, "St. Charles");
        assert_eq!(fields.state, "MO");
        assert_eq!(fields.zip, "63304");
        assert_eq!(fields.country, "USA");
    }

    #[test]
    fn plain_text_becomes_street() {
        let fields = parse_address("justsomeplaintext");
        assert_eq!(fields, AddressFields { street: "justsomeplaintext".to_string(), ..Default::default() });
    }

    #[test]
    fn empty_input_gives_empty_fields() {
        assert!(parse_address("").is_empty());
        assert!(parse_address(" \r\n \n").is_empty());
    }

    #[test]
    fn single_line_with_four_segments_takes_a_name() {
        let fields = parse_address("Jane Doe, 12 Elm St, Springfield, IL 62701");
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.city, "Springfield");
        assert_eq!(fields.state, "IL");
        assert_eq!(fields.zip, "62701");
    }

    #[test]
    fn numeric_first_segment_is_never_a_name() {
        let fields = parse_address("12 Elm St, Apt 4, Springfield, IL 62701");
        assert_eq!(fields.name, "");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.address2, "Apt 4");
        assert_eq!(fields.city, "Springfield");
    }

    #[test]
    fn numeric_first_line_is_never_a_name() {
        let fields = parse_address("15373\nE Hinsdale Cir\nCentennial, CO 80112");
        assert_eq!(fields.name, "");
        assert_eq!(fields.street, "15373, E Hinsdale Cir");
        assert_eq!(fields.city, "Centennial");
    }

    #[test]
    fn crlf_input_matches_lf_input() {
        let lf = parse_address("Britt Kimmel\n15373 E Hinsdale Cir ste a,\nCentennial, CO 80112, USA");
        let crlf = parse_address("Britt Kimmel\r\n15373 E Hinsdale Cir ste a,\r\nCentennial, CO 80112, USA\r\n");
        assert_eq!(lf, crlf);
    }

    #[test]
    fn country_on_its_own_line() {
        let fields = parse_address("Jane Doe\n12 Elm St\nToronto, ON 12345\ncanada");
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.city, "Toronto");
        assert_eq!(fields.state, "ON");
        assert_eq!(fields.country, "canada");
    }

    #[test]
    fn mid_string_country_is_kept() {
        let fields = parse_address("1 USA Way, Springfield, IL 62701");
        assert_eq!(fields.street, "1 USA Way");
        assert_eq!(fields.country, "");
    }

    #[test]
    fn secondary_is_pulled_from_fallback_street() {
        let fields = parse_address("15373 E Hinsdale Cir Unit 4B, Centennial, Colorado");
        assert_eq!(fields.street, "15373 E Hinsdale Cir");
        assert_eq!(fields.address2, "Unit 4B");
        assert_eq!(fields.city, "Centennial");
        assert_eq!(fields.state, "Colorado");
        assert_eq!(fields.zip, "");
    }

    #[test]
    fn po_box_street_stays_whole() {
        let fields = parse_address("PO Box 123, Springfield, IL 62701");
        assert_eq!(fields.street, "PO Box 123");
        assert_eq!(fields.address2, "");
        assert_eq!(fields.city, "Springfield");

        let fields = parse_address("P.O. Box 9");
        assert_eq!(fields.street, "P.O. Box 9");
        assert_eq!(fields.address2, "");
    }

    #[test]
    fn po_box_after_street_is_secondary() {
        let fields = parse_address("12 Elm St PO Box 5, Springfield, IL 62701");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.address2, "PO Box 5");
    }

    #[test]
    fn designator_inside_the_street_is_pulled_out() {
        let fields = parse_address("123 Main St Apt 4 Rear, Springfield, IL 62701");
        assert_eq!(fields.street, "123 Main St Rear");
        assert_eq!(fields.address2, "Apt 4");
        assert_eq!(fields.city, "Springfield");
        assert_eq!(fields.state, "IL");
        assert_eq!(fields.zip, "62701");
    }

    #[test]
    fn leading_designator_segment_is_pulled_out() {
        let fields = parse_address("Apt 4, 12 Elm St, Springfield, IL 62701");
        assert_eq!(fields.name, "");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.address2, "Apt 4");
        assert_eq!(fields.city, "Springfield");
        assert_eq!(fields.zip, "62701");
    }

    #[test]
    fn designator_segment_is_not_a_city() {
        let fields = parse_address("12 Elm St, Apt 4, Springfield, Colorado");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.address2, "Apt 4");
        assert_eq!(fields.city, "Springfield");
        assert_eq!(fields.state, "Colorado");
    }

    #[test]
    fn street_words_that_look_like_designators_stay() {
        let fields = parse_address("12 Space Center Blvd, Houston, TX 77058");
        assert_eq!(fields.street, "12 Space Center Blvd");
        assert_eq!(fields.address2, "");
    }

    #[test]
    fn hash_designator() {
        let fields = parse_address("12 Elm St #5\nSpringfield, IL 62701-1234");
        assert_eq!(fields.name, "");
        assert_eq!(fields.street, "12 Elm St");
        assert_eq!(fields.address2, "#5");
        assert_eq!(fields.zip, "62701-1234");
    }

    #[test]
    fn extra_country_tokens() {
        let parser = AddressParser::with_extra_countries(["Puerto Rico"]).unwrap();
        let fields = parser.parse("12 Calle Sol, San Juan, PR 00901, Puerto Rico");
        assert_eq!(fields.country, "Puerto Rico");
        assert_eq!(fields.city, "San Juan");
        assert_eq!(fields.zip, "00901");

        let fields = parse_address("12 Calle Sol, San Juan, PR 00901, Puerto Rico");
        assert_eq!(fields.country, "");
    }

    #[test]
    fn oversized_country_token_is_an_error() {
        assert!(AddressParser::with_extra_countries(["9".repeat(2_000_000)]).is_err());
    }

    #[test]
    fn country_word_inside_a_place_name_is_kept() {
        let fields = parse_address("Jane Doe\n123 Main St\nAlbuquerque, NM 87101\nNew Mexico");
        assert_eq!(fields.country, "");
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.street, "123 Main St");
        assert_eq!(fields.city, "Albuquerque");
        assert_eq!(fields.state, "NM");
        assert_eq!(fields.zip, "87101");

        let fields = parse_address("Jane Doe\n12 Elm St\nToronto, ON Canada");
        assert_eq!(fields.country, "Canada");
        assert_eq!(fields.city, "Toronto");
        assert_eq!(fields.state, "ON");
    }
}
