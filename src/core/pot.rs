use super::account::{Account, Client, Pot};
use super::allowance::AllowanceError;
use super::uk::TaxYear;
use super::usage::{account_usage, checked_add};
use rust_decimal::Decimal;

/// Allowance used across a client's shared pot in one tax year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PotUsage {
    /// Usage of every account drawing from the primary pot
    pub primary_pot_used: Decimal,
    /// Usage of sub-capped accounts only (included in `primary_pot_used`)
    pub sub_cap_used: Decimal,
}

impl PotUsage {
    /// Primary pot usage from accounts without a sub-cap
    pub fn other_members_used(&self) -> Decimal {
        self.primary_pot_used - self.sub_cap_used
    }
}

/// Usage of a single account within the tax year
pub fn usage_in_year(account: &Account, tax_year: TaxYear) -> Result<Decimal, AllowanceError> {
    account_usage(
        account.account_type,
        account
            .transactions
            .iter()
            .filter(|t| tax_year.contains(t.date)),
    )
}

/// Sum allowance usage over all of a client's accounts
pub fn aggregate(client: &Client, tax_year: TaxYear) -> Result<PotUsage, AllowanceError> {
    let mut usage = PotUsage::default();

    for account in &client.accounts {
        let used = usage_in_year(account, tax_year)?;
        usage.primary_pot_used = checked_add(usage.primary_pot_used, used)?;
        if account.account_type.rule().pot == Pot::PrimaryWithSubCap {
            usage.sub_cap_used = checked_add(usage.sub_cap_used, used)?;
        }
        log::debug!(
            "Client {} account {} ({}) used {} in {}",
            client.id,
            account.id,
            account.account_type,
            used,
            tax_year
        );
    }

    log::debug!(
        "Client {} pot usage in {}: primary={}, sub-cap={}",
        client.id,
        tax_year,
        usage.primary_pot_used,
        usage.sub_cap_used
    );
    Ok(usage)
}
