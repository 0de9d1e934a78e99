// ── Initial selection ──
//
// Precedence: a valid fragment address listed in the directory, then the
// persisted address, then the configured default. The result always holds
// a validator, synthesized when the address is not listed.

use tracing::debug;

use crate::model::{Validator, is_valid_address, lookup_or_placeholder};

#[derive(Debug, Clone, PartialEq)]
pub struct InitialSelection {
    pub validator: Validator,
    /// The selection came from the navigation fragment; persist it.
    pub from_fragment: bool,
    /// The fragment was invalid or unresolvable; clear it.
    pub clear_fragment: bool,
}

/// Resolve the validator to show first.
///
/// `directory` is `None` when the directory failed to load, in which case
/// no fragment address can be confirmed and the fragment is cleared.
/// A persisted address that is not a valid Tezos address is ignored.
pub fn resolve_initial_selection(
    fragment: Option<&str>,
    persisted: Option<&str>,
    default_address: &str,
    directory: Option<&[Validator]>,
) -> InitialSelection {
    let fragment = fragment
        .map(|f| f.trim().trim_start_matches('#'))
        .filter(|f| !f.is_empty());
    let listed = directory.unwrap_or_default();

    let from_fragment = fragment
        .filter(|f| is_valid_address(f))
        .filter(|f| listed.iter().any(|v| v.address == *f));
    let clear_fragment = fragment.is_some() && from_fragment.is_none();

    let address = from_fragment
        .or_else(|| persisted.filter(|p| is_valid_address(p)))
        .unwrap_or(default_address);
    debug!(
        address,
        from_fragment = from_fragment.is_some(),
        clear_fragment,
        "resolved initial selection"
    );

    InitialSelection {
        validator: lookup_or_placeholder(listed, address),
        from_fragment: from_fragment.is_some(),
        clear_fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CapacityProfile;

    const DEFAULT: &str = "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx";
    const LISTED: &str = "tz1aRoaRhSpRYvFdyvgWLL6TGyRoGF51wDjM";
    const PERSISTED: &str = "tz1Zt8QQ9aBznYNk5LUBjtME9DuExomw9YRs";
    const UNLISTED: &str = "tz3bvNMQ95vfAYtG8193ymshqjSvmxiCUuR5";

    fn listed(address: &str, name: &str) -> Validator {
        let mut v = Validator::placeholder(address);
        v.placeholder = false;
        v.name = name.into();
        v.status = "active".into();
        v
    }

    fn directory() -> Vec<Validator> {
        vec![listed(LISTED, "Listed"), listed(DEFAULT, "Default")]
    }

    #[test]
    fn fragment_in_directory_wins_and_persists() {
        let dir = directory();
        let sel = resolve_initial_selection(Some(LISTED), Some(PERSISTED), DEFAULT, Some(&dir));
        assert_eq!(sel.validator.address, LISTED);
        assert_eq!(sel.validator.name, "Listed");
        assert!(sel.from_fragment);
        assert!(!sel.clear_fragment);
    }

    #[test]
    fn fragment_with_hash_prefix_is_accepted() {
        let dir = directory();
        let sel = resolve_initial_selection(Some(&format!("#{LISTED}")), None, DEFAULT, Some(&dir));
        assert_eq!(sel.validator.address, LISTED);
    }

    #[test]
    fn unlisted_fragment_is_cleared_and_persisted_used() {
        let dir = directory();
        let sel = resolve_initial_selection(Some(UNLISTED), Some(PERSISTED), DEFAULT, Some(&dir));
        assert_eq!(sel.validator.address, PERSISTED);
        assert!(sel.validator.placeholder);
        assert!(!sel.from_fragment);
        assert!(sel.clear_fragment);
    }

    #[test]
    fn malformed_fragment_is_cleared() {
        let dir = directory();
        let sel = resolve_initial_selection(Some("tz1short"), None, DEFAULT, Some(&dir));
        assert_eq!(sel.validator.address, DEFAULT);
        assert_eq!(sel.validator.name, "Default");
        assert!(sel.clear_fragment);
    }

    #[test]
    fn empty_fragment_is_left_alone() {
        let dir = directory();
        let sel = resolve_initial_selection(Some(""), None, DEFAULT, Some(&dir));
        assert!(!sel.clear_fragment);
        assert!(!sel.from_fragment);
    }

    #[test]
    fn directory_failure_falls_back_to_default_placeholder() {
        let sel = resolve_initial_selection(None, None, DEFAULT, None);
        assert_eq!(sel.validator.address, DEFAULT);
        assert!(sel.validator.placeholder);
        assert_eq!(sel.validator.status, "unknown");
        assert_eq!(sel.validator.delegation, CapacityProfile::default());
        assert_eq!(sel.validator.staking, CapacityProfile::default());
        assert!(!sel.from_fragment);
    }

    #[test]
    fn directory_failure_clears_fragment() {
        let sel = resolve_initial_selection(Some(LISTED), Some(PERSISTED), DEFAULT, None);
        assert_eq!(sel.validator.address, PERSISTED);
        assert!(sel.clear_fragment);
        assert!(!sel.from_fragment);
    }

    #[test]
    fn invalid_persisted_address_is_ignored() {
        let dir = directory();
        let sel = resolve_initial_selection(None, Some("garbage"), DEFAULT, Some(&dir));
        assert_eq!(sel.validator.address, DEFAULT);
    }
}
