// ── Validator ──
//
// A baker as listed by the public directory, or a synthetic placeholder
// when the selected address is unknown to it.

use serde::{Deserialize, Serialize};

/// Display name given to validators the directory does not know about.
pub const PLACEHOLDER_NAME: &str = "Unknown Baker";

/// Status given to placeholder validators.
pub const PLACEHOLDER_STATUS: &str = "unknown";

/// Delegation or staking terms. Amounts in tez, `fee` and `estimated_apy`
/// as ratios (0.05 = 5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityProfile {
    pub enabled: bool,
    pub min_balance: f64,
    pub fee: f64,
    pub capacity: f64,
    /// Negative when the validator is over capacity.
    pub free_space: f64,
    pub estimated_apy: f64,
}

impl CapacityProfile {
    /// Capacity already taken.
    pub fn used(&self) -> f64 {
        self.capacity - self.free_space
    }

    pub fn is_over_capacity(&self) -> bool {
        self.free_space < 0.0
    }

    /// Used capacity as a percentage. Zero when capacity is zero; may exceed
    /// 100 when over capacity.
    pub fn utilization_pct(&self) -> f64 {
        if self.capacity > 0.0 {
            self.used() / self.capacity * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub address: String,
    pub name: String,
    pub logo: Option<String>,
    pub status: String,
    /// Tez.
    pub balance: f64,
    pub delegation: CapacityProfile,
    pub staking: CapacityProfile,
    /// `true` for validators synthesized locally rather than listed.
    #[serde(default)]
    pub placeholder: bool,
}

impl Validator {
    /// Synthetic validator for an address missing from the directory.
    pub fn placeholder(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: PLACEHOLDER_NAME.to_owned(),
            logo: None,
            status: PLACEHOLDER_STATUS.to_owned(),
            balance: 0.0,
            delegation: CapacityProfile::default(),
            staking: CapacityProfile::default(),
            placeholder: true,
        }
    }

    /// Case-insensitive match against name or address.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.address.to_lowercase().contains(&query)
    }

    /// Block explorer page for this validator.
    pub fn explorer_url(&self) -> String {
        format!("https://tzkt.io/{}", self.address)
    }

    /// B.A.F.O. performance analysis page for this validator.
    pub fn analysis_url(&self) -> String {
        format!("https://bafo.fafolab.xyz/?address={}", self.address)
    }
}

/// Find `address` in `directory`, or synthesize a placeholder.
pub fn lookup_or_placeholder(directory: &[Validator], address: &str) -> Validator {
    directory
        .iter()
        .find(|v| v.address == address)
        .cloned()
        .unwrap_or_else(|| Validator::placeholder(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(capacity: f64, free_space: f64) -> CapacityProfile {
        CapacityProfile {
            enabled: true,
            capacity,
            free_space,
            ..CapacityProfile::default()
        }
    }

    #[test]
    fn utilization_of_half_full_profile() {
        let p = profile(1000.0, 500.0);
        assert!((p.used() - 500.0).abs() < f64::EPSILON);
        assert!((p.utilization_pct() - 50.0).abs() < f64::EPSILON);
        assert!(!p.is_over_capacity());
    }

    #[test]
    fn negative_free_space_is_over_capacity() {
        let p = profile(1000.0, -100.0);
        assert!(p.is_over_capacity());
        assert!((p.utilization_pct() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_has_zero_utilization() {
        let p = profile(0.0, 0.0);
        assert!(p.utilization_pct().abs() < f64::EPSILON);
    }

    #[test]
    fn placeholder_is_zeroed() {
        let v = Validator::placeholder("tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx");
        assert!(v.placeholder);
        assert_eq!(v.name, PLACEHOLDER_NAME);
        assert_eq!(v.status, "unknown");
        assert_eq!(v.delegation, CapacityProfile::default());
        assert_eq!(v.staking, CapacityProfile::default());
    }

    #[test]
    fn matches_name_or_address_case_insensitively() {
        let mut v = Validator::placeholder("tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx");
        v.name = "Everstake".into();
        assert!(v.matches("EVER"));
        assert!(v.matches("t1frj"));
        assert!(v.matches(""));
        assert!(!v.matches("coinbase"));
    }

    #[test]
    fn lookup_falls_back_to_placeholder() {
        let mut listed = Validator::placeholder("tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        listed.placeholder = false;
        listed.name = "Listed".into();
        let directory = vec![listed];

        assert_eq!(
            lookup_or_placeholder(&directory, "tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").name,
            "Listed"
        );
        assert!(lookup_or_placeholder(&directory, "tz1other").placeholder);
    }
}
