pub mod allowance;
pub mod limits;
pub mod schema;

use crate::core::{Client, LimitTable, TaxYear};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a client (JSON) from a file, or stdin with "-"
pub fn read_client(path: &Path) -> anyhow::Result<Client> {
    let client: Client = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing client from {}", path.display()))?
    };
    log::info!(
        "Read client {} with {} account(s)",
        client.id,
        client.accounts.len()
    );
    Ok(client)
}

fn read_from_stdin() -> anyhow::Result<Client> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    serde_json::from_slice(&buffer).context("parsing client from stdin")
}

/// Statutory limits, or a custom table from a JSON file
pub fn read_limits(path: Option<&Path>) -> anyhow::Result<LimitTable> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let table = LimitTable::read_json(BufReader::new(file))
                .with_context(|| format!("reading limit table from {}", path.display()))?;
            log::info!(
                "Loaded {} tax year(s) from {}",
                table.years().count(),
                path.display()
            );
            Ok(table)
        }
        None => Ok(LimitTable::statutory()),
    }
}

/// Amounts are rounded to pence for display only; JSON and CSV carry them exactly
pub(crate) fn format_gbp(amount: rust_decimal::Decimal) -> String {
    format!("£{:.2}", amount)
}

/// Parse a `--year` argument, rejecting years outside the supported range
pub(crate) fn parse_tax_year(s: &str) -> Result<TaxYear, String> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid tax year '{s}': {e}"))?;
    TaxYear::new(year).map_err(|e| e.to_string())
}
