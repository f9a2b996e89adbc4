use assert_cmd::Command;
use predicates::prelude::*;

const MORTGAGE_DATA: &str = "tests/fixtures/mortgage_data.json";
const NO_LOANS: &str = "tests/fixtures/no_loans.json";

fn mra() -> Command {
    Command::cargo_bin("mra").unwrap()
}

#[test]
fn restructure_ranks_lowest_fixed_pair_first() {
    mra()
        .args(["restructure", "--input", MORTGAGE_DATA])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scenarios\""))
        .stdout(predicate::str::contains("36_months_fixed + 36_months_fixed"))
        .stdout(predicate::str::contains("\"candidates_evaluated\": 100"));
}

#[test]
fn restructure_ignores_nonstandard_rates_by_default() {
    mra()
        .args(["restructure", "--input", MORTGAGE_DATA, "--top", "55"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cashback_special").not());
}

#[test]
fn restructure_all_rate_types_includes_extras() {
    mra()
        .args([
            "restructure",
            "--input",
            MORTGAGE_DATA,
            "--all-rate-types",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cashback_special + cashback_special: "));
}

#[test]
fn restructure_csv_has_one_row_per_scenario() {
    let out = mra()
        .args(["restructure", "--input", MORTGAGE_DATA, "--top", "3", "--output", "csv"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().next().unwrap().contains("monthly_savings"));
}

#[test]
fn restructure_reads_stdin() {
    let data = std::fs::read_to_string(MORTGAGE_DATA).unwrap();
    mra()
        .args(["restructure", "--top", "1", "--restructure-cost", "2000"])
        .write_stdin(data)
        .assert()
        .success()
        .stdout(predicate::str::contains("break_even_months"));
}

#[test]
fn loans_aggregates_the_book() {
    mra()
        .args(["loans", "--input", MORTGAGE_DATA])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"loan_count\": 2"))
        .stdout(predicate::str::contains("\"total_balance\": \"450000"));
}

#[test]
fn empty_loan_book_fails() {
    mra()
        .args(["restructure", "--input", NO_LOANS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No loans found"));
}

#[test]
fn payment_minimal_rounds_to_cents() {
    mra()
        .args([
            "payment",
            "--principal",
            "100000",
            "--rate",
            "6",
            "--term-months",
            "360",
            "--output",
            "minimal",
        ])
        .assert()
        .success()
        .stdout("599.55\n");
}

#[test]
fn payment_rejects_negative_principal() {
    mra()
        .args(["payment", "--principal", "-5", "--rate", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("principal"));
}

#[test]
fn payment_beyond_decimal_range_is_an_error() {
    mra()
        .args([
            "payment",
            "--principal",
            "70000000000000000000000000000",
            "--rate",
            "12000",
            "--term-months",
            "12",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("principal"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn restructure_rejects_runaway_split_on_one_rate() {
    mra()
        .args(["restructure", "--split-count", "5000000", "--all-rate-types"])
        .write_stdin(
            r#"{"existing_loans": [{"balance": 400000, "rate": 7.0, "monthly_payment": 2900}],
                "market_conditions": {"current_rates": {"floating": 6.5}}}"#,
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("split_count"));
}

#[test]
fn schedule_table_lists_rows() {
    mra()
        .args([
            "schedule",
            "--principal",
            "12000",
            "--rate",
            "0",
            "--term-months",
            "12",
            "--output",
            "table",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("rows:"))
        .stdout(predicate::str::contains("closing_balance"));
}

#[test]
fn missing_input_file_is_reported() {
    mra()
        .args(["loans", "--input", "tests/fixtures/does_not_exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
