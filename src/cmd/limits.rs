//! Limits command - subscription caps per tax year

use super::{format_gbp, parse_tax_year, read_limits};
use crate::core::{AccountType, CapTable, TaxYear};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct LimitsCommand {
    /// Only show this tax year (e.g., 2024 for 2024/25)
    #[arg(short, long, value_parser = parse_tax_year)]
    year: Option<TaxYear>,

    /// JSON limit table to use instead of the statutory limits
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct LimitRow {
    #[tabled(rename = "Tax Year")]
    tax_year: String,

    #[tabled(rename = "From")]
    start_date: String,

    #[tabled(rename = "To")]
    end_date: String,

    #[tabled(rename = "NonFlexible")]
    non_flexible: String,

    #[tabled(rename = "Flexible")]
    flexible: String,

    #[tabled(rename = "FlexibleWithSubCap")]
    flexible_with_sub_cap: String,
}

impl LimitRow {
    fn new(tax_year: TaxYear, caps: &CapTable, format: fn(Decimal) -> String) -> Self {
        let (start, end) = tax_year.window();
        LimitRow {
            tax_year: tax_year.display(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            non_flexible: format(caps.cap(AccountType::NonFlexible)),
            flexible: format(caps.cap(AccountType::Flexible)),
            flexible_with_sub_cap: format(caps.cap(AccountType::FlexibleWithSubCap)),
        }
    }
}

impl LimitsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = read_limits(self.limits.as_deref())?;

        let years: Vec<(TaxYear, &CapTable)> = match self.year {
            Some(year) => vec![(year, table.limits_for(year)?)],
            None => table.years().collect(),
        };

        if self.json {
            let rows: Vec<LimitRow> = years
                .iter()
                .map(|(y, caps)| LimitRow::new(*y, caps, |d| d.to_string()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if years.is_empty() {
            println!("No tax years defined");
            return Ok(());
        }

        let rows: Vec<LimitRow> = years
            .iter()
            .map(|(y, caps)| LimitRow::new(*y, caps, format_gbp))
            .collect();

        println!();
        println!("ISA SUBSCRIPTION LIMITS");
        println!();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
