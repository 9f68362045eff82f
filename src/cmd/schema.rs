//! Schema command - print expected input formats

use crate::core::{Client, LimitRecord};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which input format to describe
    #[arg(value_enum, default_value = "client")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// Client with accounts and transactions
    Client,
    /// Custom limit table (--limits)
    Limits,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.format {
            SchemaFormat::Client => schema_for!(Client),
            SchemaFormat::Limits => schema_for!(Vec<LimitRecord>),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
