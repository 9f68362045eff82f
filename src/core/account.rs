use super::allowance::AllowanceError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISA product type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum AccountType {
    /// Withdrawals never restore allowance
    #[serde(alias = "ISA", alias = "Non_Flexible_ISA")]
    NonFlexible,
    #[serde(alias = "Flexible_ISA")]
    Flexible,
    /// Lifetime ISA: flexible, with its own cap inside the primary pot
    #[serde(alias = "LISA", alias = "Flexible_Lifetime_ISA")]
    FlexibleWithSubCap,
}

/// Whether withdrawals give allowance back within the tax year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flexibility {
    Flexible,
    NonFlexible,
}

/// Which allowance pot an account type draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pot {
    Primary,
    /// Draws from the primary pot and is also bounded by its own sub-cap
    PrimaryWithSubCap,
}

/// Allowance rules carried by an account type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRule {
    pub flexibility: Flexibility,
    pub pot: Pot,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [
        AccountType::NonFlexible,
        AccountType::Flexible,
        AccountType::FlexibleWithSubCap,
    ];

    pub fn rule(self) -> AccountRule {
        match self {
            AccountType::NonFlexible => AccountRule {
                flexibility: Flexibility::NonFlexible,
                pot: Pot::Primary,
            },
            AccountType::Flexible => AccountRule {
                flexibility: Flexibility::Flexible,
                pot: Pot::Primary,
            },
            AccountType::FlexibleWithSubCap => AccountRule {
                flexibility: Flexibility::Flexible,
                pot: Pot::PrimaryWithSubCap,
            },
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            AccountType::NonFlexible => "NonFlexible",
            AccountType::Flexible => "Flexible",
            AccountType::FlexibleWithSubCap => "FlexibleWithSubCap",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "nonflexible" | "isa" | "nonflexibleisa" => Ok(AccountType::NonFlexible),
            "flexible" | "flexibleisa" => Ok(AccountType::Flexible),
            "flexiblewithsubcap" | "lisa" | "flexiblelifetimeisa" => {
                Ok(AccountType::FlexibleWithSubCap)
            }
            _ => Err(format!("unknown account type: {s}")),
        }
    }
}

/// A subscription (positive) or withdrawal (negative)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub date: NaiveDate,
    #[schemars(with = "String")]
    pub amount: Decimal,
}

#[cfg(test)]
impl Transaction {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Transaction { date, amount }
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Account {
    pub id: u64,
    pub account_type: AccountType,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
impl Account {
    pub fn new(id: u64, account_type: AccountType) -> Self {
        Account {
            id,
            account_type,
            transactions: Vec::new(),
        }
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }
}

/// A client and every ISA account they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Client {
    pub id: u64,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Client {
    #[cfg(test)]
    pub fn new(id: u64, accounts: Vec<Account>) -> Self {
        Client { id, accounts }
    }

    /// Look up one of this client's accounts
    pub fn account(&self, account_id: u64) -> Result<&Account, AllowanceError> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or(AllowanceError::InvalidAccountMembership {
                client_id: self.id,
                account_id,
            })
    }

    /// Whether `account` is one of this client's accounts as held, type and
    /// transactions included
    pub fn holds(&self, account: &Account) -> bool {
        self.accounts.contains(account)
    }
}
