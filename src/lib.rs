//! Shipping helper tools: split a shipment weight into standard boxes, and
//! split free-form postal address text into structured fields.
//!
//! Both are pure, synchronous functions with no shared mutable state.

pub mod address;
pub mod packaging;
pub mod record;
pub mod utils;

pub use address::model::AddressFields;
pub use address::{parse_address, AddressParser};
pub use packaging::profile::{PackagingProfile, ProfileError, ProfileRegistry};
pub use packaging::{split_weight, BoxAllocation, SplitError};
