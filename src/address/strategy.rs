use log::debug;
use crate::address::vocab::{PO_BOX_REG, SECONDARY_SEGMENT_REG, STATE_ZIP_REG, STRUCTURED_REG};
use crate::utils::{comma_segments, trim_field};

/// Fields recovered from the address body (everything but name and country).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyParts {
    pub street: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// One way of segmenting an address body.
///
/// Strategies are tried in order; the first to return `Some` wins.
pub trait BodyStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn segment(&self, body: &str) -> Option<BodyParts>;
}

/// `street[, secondary], city, ST 12345[-6789]`
pub struct StructuredPattern;

impl BodyStrategy for StructuredPattern {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn segment(&self, body: &str) -> Option<BodyParts> {
        let caps = STRUCTURED_REG.captures(body)?;
        let field = |name: &str| caps.name(name)
            .map(|m| trim_field(m.as_str()).to_string())
            .unwrap_or_default();
        Some(
            BodyParts {
                street: field("street"),
                address2: field("address2"),
                city: field("city"),
                state: field("state"),
                zip: field("zip"),
            }
        )
    }
}

/// Positional comma split: street, city, then a state/zip token.
///
/// A segment that is only a secondary designator (`Apt 4`) is taken out as
/// `address2` before positions are assigned. A leading PO box is the street.
pub struct CommaPositional;

impl CommaPositional {
    /// `ST 12345`, then two whitespace tokens, then a lone token as the state.
    fn split_state_zip(token: &str) -> (String, String) {
        if let Some(caps) = STATE_ZIP_REG.captures(token) {
            let zip = caps.name("zip").map(|m| m.as_str()).unwrap_or_default();
            return (caps["state"].to_string(), zip.to_string());
        }
        let tokens = token.split_whitespace().collect::<Vec<_>>();
        match tokens.as_slice() {
            [state, zip] => (trim_field(state).to_string(), trim_field(zip).to_string()),
            [state] => (trim_field(state).to_string(), String::new()),
            _ => {
                debug!("cannot split state/zip from [{}]", token);
                (String::new(), String::new())
            }
        }
    }
}

impl BodyStrategy for CommaPositional {
    fn name(&self) -> &'static str {
        "comma-positional"
    }

    fn segment(&self, body: &str) -> Option<BodyParts> {
        let mut segments = comma_segments(body);
        if segments.len() < 2 {
            return None;
        }
        let unit = segments.iter()
            .enumerate()
            .position(|(idx, segment)| {
                SECONDARY_SEGMENT_REG.is_match(segment) && !(idx == 0 && PO_BOX_REG.is_match(segment))
            });
        let address2 = unit.map(|idx| segments.remove(idx).to_string()).unwrap_or_default();
        if segments.len() > 3 {
            debug!("ignoring trailing segments {:?}", &segments[3..]);
        }
        let (state, zip) = segments.get(2)
            .map(|token| Self::split_state_zip(token))
            .unwrap_or_default();
        Some(
            BodyParts {
                street: segments[0].to_string(),
                address2,
                city: segments.get(1).map(|city| city.to_string()).unwrap_or_default(),
                state,
                zip,
            }
        )
    }
}

/// Last resort: the whole body is the street.
pub struct Verbatim;

impl BodyStrategy for Verbatim {
    fn name(&self) -> &'static str {
        "verbatim"
    }

    fn segment(&self, body: &str) -> Option<BodyParts> {
        Some(
            BodyParts {
                street: trim_field(body).to_string(),
                ..Default::default()
            }
        )
    }
}

/// Default order: highest confidence first.
pub fn default_strategies() -> Vec<Box<dyn BodyStrategy>> {
    vec![
        Box::new(StructuredPattern),
        Box::new(CommaPositional),
        Box::new(Verbatim),
    ]
}
