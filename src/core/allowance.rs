use super::account::{Account, AccountType, Client, Pot};
use super::limits::{CapTable, LimitTable};
use super::pot::{aggregate, usage_in_year, PotUsage};
use super::uk::TaxYear;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AllowanceError {
    #[error("ISA limits not defined for the tax year: {0}")]
    UnsupportedTaxYear(TaxYear),
    #[error("account {account_id} does not belong to client {client_id}")]
    InvalidAccountMembership { client_id: u64, account_id: u64 },
    #[error("duplicate tax year in limit table: {0}")]
    DuplicateTaxYear(TaxYear),
    #[error("tax year out of range: {0} (expected {min} to {max})", min = TaxYear::MIN.0, max = TaxYear::MAX.0)]
    TaxYearOutOfRange(i32),
    #[error("negative cap for {account_type}: {cap}")]
    NegativeCap {
        account_type: AccountType,
        cap: Decimal,
    },
    #[error("amount overflow while summing subscriptions")]
    AmountOverflow,
}

/// Annual and remaining allowance of one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllowanceResult {
    pub annual_allowance: Decimal,
    pub remaining_allowance: Decimal,
}

/// Allowance of one account along with the account's own usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountAllowance {
    pub account_id: u64,
    pub account_type: AccountType,
    pub used: Decimal,
    pub annual_allowance: Decimal,
    pub remaining_allowance: Decimal,
}

/// Calculate the ISA allowance for one of a client's accounts.
///
/// Every account of the client draws from the same primary pot, so
/// subscriptions to any of them reduce the remaining allowance of all.
/// The Lifetime ISA cap is further limited to what is left of the primary
/// pot after the client's other accounts.
///
/// `cap_override` replaces the statutory limits entirely (e.g. additional
/// permitted subscriptions from an inherited ISA); it is not merged.
pub fn resolve_allowance(
    limits: &LimitTable,
    client: &Client,
    account: &Account,
    tax_year: TaxYear,
    cap_override: Option<&CapTable>,
) -> Result<AllowanceResult, AllowanceError> {
    if !client.holds(account) {
        return Err(AllowanceError::InvalidAccountMembership {
            client_id: client.id,
            account_id: account.id,
        });
    }
    let tax_year = TaxYear::new(tax_year.0)?;

    let caps = match cap_override {
        Some(caps) => caps,
        None => limits.limits_for(tax_year)?,
    };
    caps.validate()?;
    let usage = aggregate(client, tax_year)?;

    Ok(allowance_for(account.account_type, caps, &usage))
}

/// Resolve every account of a client, in input order
pub fn resolve_client_allowances(
    limits: &LimitTable,
    client: &Client,
    tax_year: TaxYear,
    cap_override: Option<&CapTable>,
) -> Result<Vec<AccountAllowance>, AllowanceError> {
    client
        .accounts
        .iter()
        .map(|account| account_allowance(limits, client, account, tax_year, cap_override))
        .collect()
}

/// Resolve one account, reporting its own usage alongside the allowance
pub fn account_allowance(
    limits: &LimitTable,
    client: &Client,
    account: &Account,
    tax_year: TaxYear,
    cap_override: Option<&CapTable>,
) -> Result<AccountAllowance, AllowanceError> {
    let result = resolve_allowance(limits, client, account, tax_year, cap_override)?;
    Ok(AccountAllowance {
        account_id: account.id,
        account_type: account.account_type,
        used: usage_in_year(account, tax_year)?,
        annual_allowance: result.annual_allowance,
        remaining_allowance: result.remaining_allowance,
    })
}

fn allowance_for(account_type: AccountType, caps: &CapTable, usage: &PotUsage) -> AllowanceResult {
    let cap = caps.cap(account_type);

    match account_type.rule().pot {
        Pot::Primary => AllowanceResult {
            annual_allowance: cap,
            remaining_allowance: floor_zero(cap - usage.primary_pot_used),
        },
        Pot::PrimaryWithSubCap => {
            let headroom = caps.primary_pot_cap() - usage.other_members_used();
            let annual_allowance = floor_zero(cap.min(headroom));
            AllowanceResult {
                annual_allowance,
                remaining_allowance: floor_zero(annual_allowance - usage.sub_cap_used),
            }
        }
    }
}

fn floor_zero(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
