//! Greedy decomposition of a shipment weight into standard box sizes.

use log::debug;
use serde::Serialize;
use thiserror::Error;
use crate::record::BoxRecord;
use crate::utils::round_cents;

pub mod profile;

/// Slack when comparing the remaining weight against a capacity, so that
/// e.g. `0.3 - 0.1 - 0.1` still fits a `0.1` box.
const EPSILON: f64 = 1e-9;

/// Upper bound on the number of boxes a single split may produce.
pub const MAX_BOXES: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("weight must be a positive number, got {0}")]
    InvalidWeight(f64),
    #[error("at least one box capacity is required")]
    NoCapacities,
    #[error("box capacity must be a positive number, got {0}")]
    InvalidCapacity(f64),
    #[error("split would need {count} boxes, more than the limit of {limit}")]
    TooManyBoxes { count: usize, limit: usize },
}

/// Box weights, largest capacity first, with any partial box last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoxAllocation(Vec<f64>);

impl BoxAllocation {
    pub fn boxes(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// One numbered row per box, for display.
    pub fn rows(&self) -> Vec<BoxRecord> {
        self.0.iter()
            .enumerate()
            .map(|(idx, kg)| BoxRecord::new(idx + 1, *kg))
            .collect()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// Split `weight` into boxes, greedily filling the largest capacity first.
///
/// Whatever is left once no capacity fits becomes a final partial box,
/// rounded to two decimals. A weight below every capacity yields a single box.
pub fn split_weight(weight: f64, capacities: &[f64]) -> Result<BoxAllocation, SplitError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(SplitError::InvalidWeight(weight));
    }
    if capacities.is_empty() {
        return Err(SplitError::NoCapacities);
    }
    if let Some(bad) = capacities.iter().find(|c| !c.is_finite() || **c <= 0.0) {
        return Err(SplitError::InvalidCapacity(*bad));
    }

    let mut sizes = capacities.to_vec();
    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();

    let mut boxes = Vec::new();
    let mut remaining = weight;
    for size in sizes {
        let fits = ((remaining + EPSILON) / size).floor();
        if boxes.len() as f64 + fits > MAX_BOXES as f64 {
            // the cast saturates for huge quotients
            let count = boxes.len().saturating_add(fits as usize);
            return Err(SplitError::TooManyBoxes { count, limit: MAX_BOXES });
        }
        let count = fits as usize;
        boxes.extend(std::iter::repeat(size).take(count));
        remaining -= size * count as f64;
    }

    let remainder = round_cents(remaining);
    if remainder > 0.0 {
        boxes.push(remainder);
    } else if boxes.is_empty() {
        // too light to show in hundredths, still one box
        boxes.push(weight);
    }
    debug!("split {} into {} boxes: {:?}", weight, boxes.len(), boxes);
    Ok(BoxAllocation(boxes))
}
