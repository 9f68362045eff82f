use super::account::{AccountType, Pot};
use super::allowance::AllowanceError;
use super::uk::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// ISA subscription limit, 2017/18 onwards
pub const ISA_ANNUAL_ALLOWANCE: Decimal = dec!(20000);
/// Lifetime ISA subscription limit, 2017/18 onwards
pub const LISA_ANNUAL_ALLOWANCE: Decimal = dec!(4000);

const FIRST_STATUTORY_YEAR: i32 = 2017;
const LAST_STATUTORY_YEAR: i32 = 2025;

/// Annual cap per account type.
///
/// Used either as a year's statutory limits or as a caller-supplied override.
/// An override replaces the statutory table outright: any type it does not
/// list has a zero cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CapTable(
    #[schemars(with = "BTreeMap<AccountType, String>")] BTreeMap<AccountType, Decimal>,
);

impl CapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, account_type: AccountType, cap: Decimal) -> Self {
        self.insert(account_type, cap);
        self
    }

    pub fn insert(&mut self, account_type: AccountType, cap: Decimal) {
        self.0.insert(account_type, cap);
    }

    /// Cap for an account type, zero when absent
    pub fn cap(&self, account_type: AccountType) -> Decimal {
        self.0.get(&account_type).copied().unwrap_or(Decimal::ZERO)
    }

    /// Reject tables carrying a negative cap
    pub fn validate(&self) -> Result<(), AllowanceError> {
        match self.0.iter().find(|(_, cap)| **cap < Decimal::ZERO) {
            Some((account_type, cap)) => Err(AllowanceError::NegativeCap {
                account_type: *account_type,
                cap: *cap,
            }),
            None => Ok(()),
        }
    }

    /// Cap of the shared pot: the largest cap among the types with no sub-cap
    pub fn primary_pot_cap(&self) -> Decimal {
        AccountType::ALL
            .iter()
            .filter(|t| t.rule().pot == Pot::Primary)
            .map(|t| self.cap(*t))
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl FromIterator<(AccountType, Decimal)> for CapTable {
    fn from_iter<I: IntoIterator<Item = (AccountType, Decimal)>>(iter: I) -> Self {
        CapTable(iter.into_iter().collect())
    }
}

/// Entry of a limit table file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LimitRecord {
    /// Starting year of the tax year (e.g., 2024 for 2024/25)
    pub tax_year: TaxYear,
    pub caps: CapTable,
}

/// Caps for each supported tax year
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitTable {
    years: BTreeMap<TaxYear, CapTable>,
}

impl LimitTable {
    /// HMRC subscription limits
    pub fn statutory() -> Self {
        let standard = CapTable::new()
            .with(AccountType::NonFlexible, ISA_ANNUAL_ALLOWANCE)
            .with(AccountType::Flexible, ISA_ANNUAL_ALLOWANCE)
            .with(AccountType::FlexibleWithSubCap, LISA_ANNUAL_ALLOWANCE);

        let years = (FIRST_STATUTORY_YEAR..=LAST_STATUTORY_YEAR)
            .map(|y| (TaxYear(y), standard.clone()))
            .collect();
        LimitTable { years }
    }

    pub fn from_records(records: Vec<LimitRecord>) -> Result<Self, AllowanceError> {
        let mut years = BTreeMap::new();
        for record in records {
            TaxYear::new(record.tax_year.0)?;
            record.caps.validate()?;
            if years.insert(record.tax_year, record.caps).is_some() {
                return Err(AllowanceError::DuplicateTaxYear(record.tax_year));
            }
        }
        Ok(LimitTable { years })
    }

    /// Read a limit table from a JSON list of `LimitRecord`s
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let records: Vec<LimitRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records)?)
    }

    pub fn limits_for(&self, tax_year: TaxYear) -> Result<&CapTable, AllowanceError> {
        self.years
            .get(&tax_year)
            .ok_or(AllowanceError::UnsupportedTaxYear(tax_year))
    }

    pub fn years(&self) -> impl Iterator<Item = (TaxYear, &CapTable)> {
        self.years.iter().map(|(y, c)| (*y, c))
    }
}
