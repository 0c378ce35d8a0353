use std::fmt;
use serde::Serialize;

/// Structured fields recovered from free-form address text.
///
/// Absent fields are empty strings. Nothing here is validated: a two-letter
/// `state` is kept verbatim even if it is not a real code.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Serialize)]
pub struct AddressFields {
    pub name: String,
    pub street: String,
    /// unit, suite, floor, box, etc.
    pub address2: String,
    pub city: String,
    pub state: String,
    /// `12345` or `12345-6789`
    pub zip: String,
    pub country: String,
}

impl AddressFields {
    /// the 5-digit part of the ZIP code
    pub fn zip5(&self) -> &str {
        self.zip.split('-').next().unwrap_or_default()
    }

    /// the +4 extension, if any
    pub fn zip4(&self) -> Option<&str> {
        self.zip.split_once('-').map(|(_, zip4)| zip4)
    }

    pub fn is_empty(&self) -> bool {
        [&self.name, &self.street, &self.address2, &self.city, &self.state, &self.zip, &self.country]
            .iter()
            .all(|field| field.is_empty())
    }
}

/// Single line: `name, street, address2, city, ST 12345, country`, skipping empty parts.
impl fmt::Display for AddressFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_zip = [self.state.as_str(), self.zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let line = [
            self.name.as_str(),
            self.street.as_str(),
            self.address2.as_str(),
            self.city.as_str(),
            state_zip.as_str(),
            self.country.as_str(),
        ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&line)
    }
}
