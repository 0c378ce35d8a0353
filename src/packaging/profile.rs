use log::debug;
use thiserror::Error;

/// Environment variable that adds or replaces packaging profiles.
///
/// PACKAGING_PROFILES=`NAME`=`CAP`[,`CAP`]*[;`NAME`=`CAP`[,`CAP`]*]*
pub const PROFILES_ENV: &str = "PACKAGING_PROFILES";

pub const DEFAULT_PROFILE: &str = "Los Doz";

const BUILTIN_PROFILES: &[(&str, &[f64])] = &[
    ("Los Doz", &[12.0, 6.0, 2.0]),
    ("AML (9kg)", &[9.0]),
    ("AML (10kg)", &[10.0]),
];

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("malformed profile entry [{0}], expected NAME=CAP[,CAP]*")]
    MalformedEntry(String),
    #[error("profile [{profile}] has an invalid capacity [{value}]")]
    InvalidCapacity { profile: String, value: String },
    #[error("profile [{0}] has no capacities")]
    EmptyProfile(String),
}

/// A named set of box capacities, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagingProfile {
    name: String,
    capacities: Vec<f64>,
}

impl PackagingProfile {
    pub fn new(name: impl Into<String>, capacities: &[f64]) -> Result<Self, ProfileError> {
        let name = name.into();
        let mut capacities = capacities.to_vec();
        if capacities.is_empty() {
            return Err(ProfileError::EmptyProfile(name));
        }
        if let Some(bad) = capacities.iter().find(|c| !c.is_finite() || **c <= 0.0) {
            return Err(ProfileError::InvalidCapacity { value: bad.to_string(), profile: name });
        }
        capacities.sort_by(|a, b| b.total_cmp(a));
        capacities.dedup();
        Ok(Self { name, capacities })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacities(&self) -> &[f64] {
        &self.capacities
    }

    /// parse a single `NAME=CAP[,CAP]*` entry
    fn parse_entry(entry: &str) -> Result<Self, ProfileError> {
        let (name, caps) = entry.split_once('=')
            .ok_or_else(|| ProfileError::MalformedEntry(entry.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::MalformedEntry(entry.to_string()));
        }
        let capacities = caps.split(',')
            .map(str::trim)
            .filter(|cap| !cap.is_empty())
            .map(|cap| {
                cap.parse::<f64>().map_err(|_| ProfileError::InvalidCapacity {
                    profile: name.to_string(),
                    value: cap.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, &capacities)
    }
}

/// Fixed set of profiles, looked up by name (case-insensitive).
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<PackagingProfile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES.iter()
            .map(|(name, capacities)| PackagingProfile {
                name: name.to_string(),
                capacities: capacities.to_vec(),
            })
            .collect();
        Self { profiles }
    }

    /// Built-in profiles plus whatever [`PROFILES_ENV`] declares.
    pub fn from_env() -> Result<Self, ProfileError> {
        let mut registry = Self::builtin();
        if let Ok(entries) = std::env::var(PROFILES_ENV) {
            registry.merge_entries(&entries)?;
        }
        Ok(registry)
    }

    /// Add or replace profiles from a `;`-separated list of `NAME=CAP[,CAP]*` entries.
    pub fn merge_entries(&mut self, entries: &str) -> Result<(), ProfileError> {
        for entry in entries.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let profile = PackagingProfile::parse_entry(entry)?;
            debug!("loaded packaging profile [{}] = {:?}", profile.name, profile.capacities);
            self.insert(profile);
        }
        Ok(())
    }

    pub fn insert(&mut self, profile: PackagingProfile) {
        match self.profiles.iter_mut().find(|p| p.name.eq_ignore_ascii_case(&profile.name)) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackagingProfile> {
        let name = name.trim();
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn profiles(&self) -> &[PackagingProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(registry.profiles().len(), 3);
        assert_eq!(registry.get(DEFAULT_PROFILE).unwrap().capacities(), &[12.0, 6.0, 2.0]);
        assert_eq!(registry.get("aml (9KG)").unwrap().capacities(), &[9.0]);
        assert_eq!(registry.get(" AML (10kg) ").unwrap().capacities(), &[10.0]);
        assert!(registry.get("Pallet").is_none());
    }

    #[test]
    fn new_sorts_descending_and_dedups() {
        let profile = PackagingProfile::new("Mixed", &[2.0, 12.0, 6.0, 12.0]).unwrap();
        assert_eq!(profile.capacities(), &[12.0, 6.0, 2.0]);
    }

    #[test]
    fn new_rejects_bad_capacities() {
        assert_eq!(PackagingProfile::new("Empty", &[]), Err(ProfileError::EmptyProfile("Empty".to_string())));
        assert!(matches!(
            PackagingProfile::new("Neg", &[-1.0]),
            Err(ProfileError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn merge_entries_adds_and_replaces() {
        let mut registry = ProfileRegistry::builtin();
        registry.merge_entries("Pallet=500; los doz = 10, 5 ;").unwrap();
        assert_eq!(registry.profiles().len(), 4);
        assert_eq!(registry.get("Pallet").unwrap().capacities(), &[500.0]);
        let los_doz = registry.get("Los Doz").unwrap();
        assert_eq!(los_doz.name(), "los doz");
        assert_eq!(los_doz.capacities(), &[10.0, 5.0]);
    }

    #[test]
    fn merge_entries_errors() {
        let mut registry = ProfileRegistry::builtin();
        assert_eq!(
            registry.merge_entries("Pallet"),
            Err(ProfileError::MalformedEntry("Pallet".to_string()))
        );
        assert_eq!(
            registry.merge_entries("Pallet=big"),
            Err(ProfileError::InvalidCapacity { profile: "Pallet".to_string(), value: "big".to_string() })
        );
        assert_eq!(registry.merge_entries("Pallet="), Err(ProfileError::EmptyProfile("Pallet".to_string())));
        assert!(registry.merge_entries("=5").is_err());
    }

    #[test]
    fn from_env_reads_profiles_variable() {
        std::env::set_var(PROFILES_ENV, "Crate=25,5; AML (9kg)=8");
        let registry = ProfileRegistry::from_env();
        std::env::set_var(PROFILES_ENV, "Crate");
        let malformed = ProfileRegistry::from_env();
        std::env::remove_var(PROFILES_ENV);

        let registry = registry.unwrap();
        assert_eq!(registry.profiles().len(), 4);
        assert_eq!(registry.get("crate").unwrap().capacities(), &[25.0, 5.0]);
        assert_eq!(registry.get("AML (9kg)").unwrap().capacities(), &[8.0]);
        assert_eq!(malformed.unwrap_err(), ProfileError::MalformedEntry("Crate".to_string()));
        assert_eq!(ProfileRegistry::from_env().unwrap().profiles().len(), 3);
    }
}
