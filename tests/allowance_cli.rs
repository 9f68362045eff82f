//! E2E tests for the allowance, limits and schema commands

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::process::{Command, Output};
use std::str::FromStr;

fn isac(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_isac"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command")
}

fn json_output(args: &[&str]) -> Value {
    let output = isac(args);
    assert!(output.status.success(), "Command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("valid JSON output")
}

fn amount(value: &Value) -> Decimal {
    let s = value.as_str().expect("amount serialized as a string");
    Decimal::from_str(s).expect("valid decimal amount")
}

/// Non-flexible withdrawals do not give allowance back
#[test]
fn non_flexible_withdrawal_ignored() {
    let output = json_output(&[
        "allowance",
        "tests/data/non_flexible_withdrawal.json",
        "-y",
        "2024",
        "--json",
    ]);

    assert_eq!(output["tax_year"], "2024/25");
    assert_eq!(output["cap_override"], false);
    let account = &output["accounts"][0];
    assert_eq!(account["account_type"], "NonFlexible");
    assert_eq!(amount(&account["used"]), dec!(15000));
    assert_eq!(amount(&account["annual_allowance"]), dec!(20000));
    assert_eq!(amount(&account["remaining_allowance"]), dec!(5000));
}

/// ISA subscriptions shrink the Lifetime ISA cap
#[test]
fn isa_and_lisa_share_the_pot() {
    let output = json_output(&[
        "allowance",
        "tests/data/isa_and_lisa.json",
        "--year",
        "2024",
        "--json",
    ]);

    let accounts = output["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);

    // The December 2023 subscription belongs to 2023/24
    assert_eq!(amount(&accounts[0]["used"]), dec!(17000));
    assert_eq!(amount(&accounts[0]["annual_allowance"]), dec!(20000));
    assert_eq!(amount(&accounts[0]["remaining_allowance"]), dec!(3000));

    assert_eq!(accounts[1]["account_type"], "FlexibleWithSubCap");
    assert_eq!(amount(&accounts[1]["annual_allowance"]), dec!(3000));
    assert_eq!(amount(&accounts[1]["remaining_allowance"]), dec!(3000));
}

/// Filtering to a single account
#[test]
fn single_account() {
    let output = json_output(&[
        "allowance",
        "tests/data/isa_and_lisa.json",
        "-y",
        "2023",
        "-a",
        "2",
        "--json",
    ]);

    let accounts = output["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["account_id"], 2);
    assert_eq!(amount(&accounts[0]["annual_allowance"]), dec!(4000));
}

/// Unknown account is rejected rather than computed against the pot
#[test]
fn unknown_account_fails() {
    let output = isac(&[
        "allowance",
        "tests/data/isa_and_lisa.json",
        "-y",
        "2024",
        "-a",
        "9",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("account 9 does not belong to client 1"));
}

/// Inherited allowance supplied as a cap override
#[test]
fn cap_override_replaces_statutory_limits() {
    let output = json_output(&[
        "allowance",
        "tests/data/inherited_isa.json",
        "-y",
        "2024",
        "--cap",
        "Flexible=45000",
        "--json",
    ]);

    assert_eq!(output["cap_override"], true);
    let account = &output["accounts"][0];
    assert_eq!(amount(&account["annual_allowance"]), dec!(45000));
    assert_eq!(amount(&account["remaining_allowance"]), dec!(41000));
}

/// Override works for years the statutory table does not cover
#[test]
fn cap_override_for_unsupported_year() {
    let output = json_output(&[
        "allowance",
        "tests/data/inherited_isa.json",
        "-y",
        "2010",
        "--cap",
        "flexible_isa=7200",
        "--json",
    ]);

    let account = &output["accounts"][0];
    assert_eq!(amount(&account["used"]), dec!(0));
    assert_eq!(amount(&account["remaining_allowance"]), dec!(7200));
}

#[test]
fn unsupported_tax_year_fails() {
    let output = isac(&["allowance", "tests/data/inherited_isa.json", "-y", "2010"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ISA limits not defined for the tax year: 2010/11"));
}

#[test]
fn malformed_cap_rejected() {
    let output = isac(&[
        "allowance",
        "tests/data/inherited_isa.json",
        "--cap",
        "Flexible",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected TYPE=AMOUNT"));
}

/// Custom limit table for a year not yet in the statutory table
#[test]
fn custom_limit_table() {
    let output = json_output(&[
        "allowance",
        "tests/data/isa_and_lisa.json",
        "-y",
        "2026",
        "--limits",
        "tests/data/limits_2026.json",
        "--json",
    ]);

    let accounts = output["accounts"].as_array().unwrap();
    assert_eq!(amount(&accounts[0]["remaining_allowance"]), dec!(20000));
    assert_eq!(amount(&accounts[1]["annual_allowance"]), dec!(4000));
}

#[test]
fn allowance_table_output() {
    let output = isac(&["allowance", "tests/data/isa_and_lisa.json", "-y", "2024"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ISA ALLOWANCE (client 1, 2024/25)"));
    assert!(stdout.contains("Annual Allowance"));
    assert!(stdout.contains("FlexibleWithSubCap"));
    assert!(stdout.contains("£3000.00"));
}

/// Sub-penny amounts are kept exactly in JSON and only rounded in the table
#[test]
fn sub_penny_amounts_are_exact() {
    let output = json_output(&[
        "allowance",
        "tests/data/sub_penny.json",
        "-y",
        "2024",
        "--json",
    ]);

    let account = &output["accounts"][0];
    assert_eq!(account["used"], "100.125");
    assert_eq!(account["remaining_allowance"], "19899.875");

    let output = isac(&["allowance", "tests/data/sub_penny.json", "-y", "2024"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("£100.12") || stdout.contains("£100.13"));
}

#[test]
fn out_of_range_year_rejected() {
    let output = isac(&[
        "allowance",
        "tests/data/inherited_isa.json",
        "-y",
        "300000",
        "--cap",
        "Flexible=1000",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tax year out of range: 300000"));
}

#[test]
fn invalid_limit_tables_rejected() {
    let output = isac(&["limits", "--limits", "tests/data/limits_far_future.json"]);
    assert!(!output.status.success());

    let output = isac(&[
        "allowance",
        "tests/data/inherited_isa.json",
        "-y",
        "2024",
        "--limits",
        "tests/data/limits_negative.json",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("negative cap for Flexible: -100"));
}

#[test]
fn allowance_csv_output() {
    let output = isac(&[
        "allowance",
        "tests/data/non_flexible_withdrawal.json",
        "-y",
        "2024",
        "--csv",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("account_id,account_type,used,annual_allowance,remaining_allowance")
    );
    assert_eq!(lines.next(), Some("1,NonFlexible,15000,20000,5000"));
}

#[test]
fn limits_json_output() {
    let output = json_output(&["limits", "-y", "2024", "--json"]);

    let rows = output.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["tax_year"], "2024/25");
    assert_eq!(rows[0]["start_date"], "2024-04-06");
    assert_eq!(rows[0]["end_date"], "2025-04-05");
    assert_eq!(amount(&rows[0]["flexible"]), dec!(20000));
    assert_eq!(amount(&rows[0]["flexible_with_sub_cap"]), dec!(4000));
}

#[test]
fn schema_describes_client_input() {
    let output = json_output(&["schema"]);

    assert_eq!(output["title"], "Client");
    assert!(output["properties"]["accounts"].is_object());
}
