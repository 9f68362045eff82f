//! Allowance command - annual and remaining ISA allowance per account

use super::{format_gbp, parse_tax_year, read_client, read_limits};
use crate::core::{
    account_allowance, resolve_client_allowances, AccountAllowance, AccountType, CapTable,
    TaxYear,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct AllowanceCommand {
    /// Client JSON file. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Tax year by starting year (e.g., 2024 for 2024/25). Defaults to the current tax year.
    #[arg(short, long, value_parser = parse_tax_year)]
    year: Option<TaxYear>,

    /// Only report this account
    #[arg(short, long)]
    account: Option<u64>,

    /// Override caps as TYPE=AMOUNT (repeatable). Replaces the statutory
    /// limits entirely: types not listed have a zero cap.
    #[arg(long = "cap", value_name = "TYPE=AMOUNT", value_parser = parse_cap)]
    caps: Vec<(AccountType, Decimal)>,

    /// JSON limit table to use instead of the statutory limits
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

/// Table row, amounts formatted to pence
#[derive(Debug, Clone, Tabled)]
struct AllowanceRow {
    #[tabled(rename = "Account")]
    account_id: u64,

    #[tabled(rename = "Type")]
    account_type: String,

    #[tabled(rename = "Used")]
    used: String,

    #[tabled(rename = "Annual Allowance")]
    annual_allowance: String,

    #[tabled(rename = "Remaining")]
    remaining_allowance: String,
}

impl From<&AccountAllowance> for AllowanceRow {
    fn from(a: &AccountAllowance) -> Self {
        AllowanceRow {
            account_id: a.account_id,
            account_type: a.account_type.to_string(),
            used: format_gbp(a.used),
            annual_allowance: format_gbp(a.annual_allowance),
            remaining_allowance: format_gbp(a.remaining_allowance),
        }
    }
}

#[derive(Debug, Serialize)]
struct AllowanceOutput<'a> {
    client_id: u64,
    tax_year: String,
    cap_override: bool,
    accounts: &'a [AccountAllowance],
}

impl AllowanceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let client = read_client(&self.file)?;
        let limits = read_limits(self.limits.as_deref())?;
        let tax_year = self.year.unwrap_or_else(TaxYear::current);
        let cap_override = self.cap_override();

        let allowances = match self.account {
            Some(account_id) => {
                let account = client.account(account_id)?;
                vec![account_allowance(
                    &limits,
                    &client,
                    account,
                    tax_year,
                    cap_override.as_ref(),
                )?]
            }
            None => resolve_client_allowances(&limits, &client, tax_year, cap_override.as_ref())?,
        };
        log::info!(
            "Resolved {} account(s) for client {} in {}",
            allowances.len(),
            client.id,
            tax_year
        );

        if self.json {
            let output = AllowanceOutput {
                client_id: client.id,
                tax_year: tax_year.display(),
                cap_override: cap_override.is_some(),
                accounts: &allowances,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        } else if self.csv {
            write_csv(&allowances)
        } else {
            self.print_table(client.id, tax_year, &allowances);
            Ok(())
        }
    }

    fn cap_override(&self) -> Option<CapTable> {
        if self.caps.is_empty() {
            None
        } else {
            Some(self.caps.iter().copied().collect())
        }
    }

    fn print_table(&self, client_id: u64, tax_year: TaxYear, allowances: &[AccountAllowance]) {
        println!();
        println!("ISA ALLOWANCE (client {}, {})", client_id, tax_year);
        if !self.caps.is_empty() {
            println!("Caps overridden: statutory limits not applied");
        }
        println!();

        if allowances.is_empty() {
            println!("No accounts found");
            return;
        }

        let display_rows: Vec<AllowanceRow> = allowances.iter().map(Into::into).collect();

        let table = Table::new(display_rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
}

fn write_csv(rows: &[AccountAllowance]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a `TYPE=AMOUNT` cap override
fn parse_cap(s: &str) -> Result<(AccountType, Decimal), String> {
    let (account_type, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=AMOUNT, got '{s}'"))?;
    let account_type = AccountType::from_str(account_type.trim())?;
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| format!("invalid amount '{}': {e}", amount.trim()))?;
    if amount.is_sign_negative() {
        return Err(format!("cap must not be negative: {amount}"));
    }
    Ok((account_type, amount))
}
