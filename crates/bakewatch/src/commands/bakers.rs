//! Validator directory search.

use tabled::Tabled;

use bakewatch_core::format::{format_ratio, format_tez};
use bakewatch_core::{ApiSource, CapacityProfile, Dashboard, DataSource, Validator};

use crate::cli::{BakersArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

#[derive(Tabled)]
struct BakerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Staking Free")]
    staking: String,
    #[tabled(rename = "Delegation Free")]
    delegation: String,
    #[tabled(rename = "Fee")]
    fee: String,
}

fn free_space(profile: &CapacityProfile) -> String {
    if profile.enabled {
        format_tez(profile.free_space)
    } else {
        "-".into()
    }
}

impl From<&Validator> for BakerRow {
    fn from(v: &Validator) -> Self {
        Self {
            name: v.name.clone(),
            address: v.address.clone(),
            status: v.status.clone(),
            balance: format_tez(v.balance),
            staking: free_space(&v.staking),
            delegation: free_space(&v.delegation),
            fee: format_ratio(v.staking.fee),
        }
    }
}

/// Case-insensitive name/address filter, first `limit` matches.
pub fn search<'a>(
    directory: &'a [Validator],
    query: Option<&str>,
    limit: usize,
) -> Vec<&'a Validator> {
    directory
        .iter()
        .filter(|v| query.is_none_or(|q| v.matches(q)))
        .take(limit)
        .collect()
}

pub async fn handle(
    dashboard: &Dashboard<ApiSource>,
    args: &BakersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let directory = dashboard.source().validators().await?;
    let matches = search(&directory, args.search.as_deref(), args.limit);

    Printer::new(global).list(&matches, |v| BakerRow::from(*v), |v| v.address.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baker(name: &str, address: &str) -> Validator {
        Validator {
            name: name.into(),
            status: "active".into(),
            placeholder: false,
            ..Validator::placeholder(address)
        }
    }

    #[test]
    fn search_matches_name_or_address_and_limits() {
        let directory = vec![
            baker("Alpha Bakery", "tz1aRoaRhSpRYvFdyvgWLL6TGyRoGF51wDjM"),
            baker("Bravo", "tz1Zt8QQ9aBznYNk5LUBjtME9DuExomw9YRs"),
            baker("alphabet", "tz3bvNMQ95vfAYtG8193ymshqjSvmxiCUuR5"),
        ];

        let names: Vec<_> = search(&directory, Some("ALPHA"), 50)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, ["Alpha Bakery", "alphabet"]);

        assert_eq!(search(&directory, Some("tz1Zt8"), 50).len(), 1);
        assert_eq!(search(&directory, None, 2).len(), 2);
    }
}
