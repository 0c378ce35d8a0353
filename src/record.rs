use std::io::Write;
use serde::Serialize;
use crate::address::model::AddressFields;

/// Pounds per kilogram as printed on the box table ("1kg=4lb").
pub const LB_PER_KG: f64 = 4.0;

/// Column header for pounds, shared by the table and CSV output.
pub const LB_HEADER: &str = "Lb (1kg=4lb)";

/// One parsed address, as written to a table or CSV file
#[derive(Debug, Serialize)]
pub struct AddressRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Street Address")]
    street: String,
    #[serde(rename = "Address 2")]
    address2: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "ZIP")]
    zip: String,
    #[serde(rename = "Country")]
    country: String,
}

impl AddressRecord {
    /// (label, value) pairs in display order
    pub fn labelled(&self) -> [(&'static str, &str); 7] {
        [
            ("Name", self.name.as_str()),
            ("Street Address", self.street.as_str()),
            ("Address 2", self.address2.as_str()),
            ("City", self.city.as_str()),
            ("State", self.state.as_str()),
            ("ZIP", self.zip.as_str()),
            ("Country", self.country.as_str()),
        ]
    }
}

impl From<AddressFields> for AddressRecord {
    fn from(fields: AddressFields) -> Self {
        Self {
            name: fields.name,
            street: fields.street,
            address2: fields.address2,
            city: fields.city,
            state: fields.state,
            zip: fields.zip,
            country: fields.country,
        }
    }
}

/// One box of a weight split
#[derive(Debug, Serialize, PartialEq)]
pub struct BoxRecord {
    #[serde(rename = "Box #")]
    pub number: usize,
    #[serde(rename = "Kg")]
    pub kg: f64,
    #[serde(rename = "Lb (1kg=4lb)")]
    pub lb: u64,
}

impl BoxRecord {
    pub fn new(number: usize, kg: f64) -> Self {
        Self {
            number,
            kg,
            lb: (kg * LB_PER_KG) as u64,
        }
    }
}

/// write records as CSV, header first
pub fn write_csv<T: Serialize>(records: &[T], writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
