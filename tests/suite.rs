// Centralized integration suite for the extraction tooling; drives the compiled
// binaries over on-disk fixtures so the CLI contract, report shape, and failure
// policy all surface in one place.
mod support;

use anyhow::{Context, Result};
use athia_extract::ReportSchema;
use serde_json::Value;
use std::process::Command;
use support::{
    Fixture, extract_abilities_bin, resolve_order_bin, run_command, run_command_expect_failure,
    schema_path,
};

const TWO_ABILITY_TEXT: &str =
    "intro prose\nAccurate I\nRogue\nDoes a thing.\nAmbusher\nRogue\nDoes another thing.\n";
const TWO_ABILITY_ANCHOR: &str = "\nAccurate I\nRogue\n";

fn extract_cmd(fixture: &Fixture, anchor: &str) -> Command {
    let mut cmd = Command::new(extract_abilities_bin());
    cmd.arg("--names")
        .arg(&fixture.names)
        .arg("--text")
        .arg(&fixture.text)
        .arg("--anchor")
        .arg(anchor);
    cmd
}

fn parse_report(stdout: &[u8]) -> Result<Value> {
    serde_json::from_slice(stdout).context("parsing report JSON from stdout")
}

#[test]
fn extracts_two_abilities_with_zero_errors() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I", "Ambusher"], TWO_ABILITY_TEXT)?;
    let output = run_command(extract_cmd(&fixture, TWO_ABILITY_ANCHOR))?;
    let report = parse_report(&output.stdout)?;

    assert_eq!(report["attempted"], 2);
    assert_eq!(report["succeeded"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["errors"].as_array().unwrap().len(), 0);

    let abilities = report["abilities"].as_array().unwrap();
    assert_eq!(abilities[0]["codeName"], "Accurate I");
    assert_eq!(abilities[0]["class"], "Rogue");
    assert_eq!(abilities[0]["prerequisites"], "");
    assert_eq!(abilities[0]["description"], "Does a thing.");
    assert_eq!(abilities[1]["codeName"], "Ambusher");
    assert_eq!(abilities[1]["description"], "Does another thing.");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("attempted 2, succeeded 2, failed 0"));
    Ok(())
}

#[test]
fn emitted_report_satisfies_shipped_schema() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I", "Ambusher", "Ghost Step"], TWO_ABILITY_TEXT)?;
    let mut cmd = extract_cmd(&fixture, TWO_ABILITY_ANCHOR);
    cmd.arg("--check-schema");
    let output = run_command(cmd)?;

    // Validate against the on-disk schema too, so the embedded copy and the
    // shipped file cannot drift apart silently.
    let report = parse_report(&output.stdout)?;
    ReportSchema::load(&schema_path())?.validate(&report)?;
    Ok(())
}

#[test]
fn runs_are_idempotent() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I", "Ambusher", "Ghost Step"], TWO_ABILITY_TEXT)?;
    let first = run_command(extract_cmd(&fixture, TWO_ABILITY_ANCHOR))?;
    let second = run_command(extract_cmd(&fixture, TWO_ABILITY_ANCHOR))?;
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn out_flag_writes_report_file() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I", "Ambusher"], TWO_ABILITY_TEXT)?;
    let out_path = fixture.path("report.json");
    let mut cmd = extract_cmd(&fixture, TWO_ABILITY_ANCHOR);
    cmd.arg("--out").arg(&out_path).arg("--pretty");
    let output = run_command(cmd)?;

    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(&out_path)?;
    let report: Value = serde_json::from_str(&written)?;
    assert_eq!(report["succeeded"], 2);
    Ok(())
}

#[test]
fn class_line_splits_on_first_comma() -> Result<()> {
    let text = "START\nChosen Vessel II\nAcolyte, Chosen Vessel I\nChannels harder.\n";
    let fixture = Fixture::new(&["Chosen Vessel II"], text)?;
    let output = run_command(extract_cmd(&fixture, "START"))?;
    let report = parse_report(&output.stdout)?;
    let ability = &report["abilities"][0];
    assert_eq!(ability["class"], "Acolyte");
    assert_eq!(ability["prerequisites"], "Chosen Vessel I");
    Ok(())
}

#[test]
fn short_block_fails_without_aborting_batch() -> Result<()> {
    let text = "START\nAccurate I\nRogue\nDoes a thing.\nGhost Step\nRogue\nAmbusher\nRogue\nDoes another thing.\n";
    let fixture = Fixture::new(&["Accurate I", "Ghost Step", "Ambusher"], text)?;
    let output = run_command(extract_cmd(&fixture, "START"))?;
    let report = parse_report(&output.stdout)?;

    assert_eq!(report["succeeded"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["failuresByKind"]["TextTooShort"], 1);
    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors[0]["abilityName"], "Ghost Step");
    assert_eq!(errors[0]["kind"], "TextTooShort");
    Ok(())
}

#[test]
fn pre_anchor_occurrence_reported_as_found_before_section_start() -> Result<()> {
    let text = "Ambusher\ntable of contents\nSTART\nAccurate I\nRogue\nDoes a thing.\n";
    let fixture = Fixture::new(&["Accurate I", "Ambusher", "Ghost Step"], text)?;
    let mut cmd = extract_cmd(&fixture, "START");
    cmd.arg("--anchor-tolerance").arg("5");
    let output = run_command(cmd)?;
    let report = parse_report(&output.stdout)?;

    let kinds: std::collections::BTreeMap<String, String> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["abilityName"].as_str().unwrap().to_string(),
                e["kind"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(kinds["Ambusher"], "FoundBeforeSectionStart");
    assert_eq!(kinds["Ghost Step"], "NotFoundInSource");
    Ok(())
}

#[test]
fn mapping_resolves_divergent_pdf_spelling() -> Result<()> {
    let text = "START\nAccurate 1\nRogue\nDoes a thing.\n";
    let fixture = Fixture::new(&["Accurate I"], text)?;
    let mapping = fixture.write_mapping(&[("Accurate I", "Accurate 1")])?;
    let mut cmd = extract_cmd(&fixture, "START");
    cmd.arg("--mapping").arg(&mapping);
    let output = run_command(cmd)?;
    let report = parse_report(&output.stdout)?;

    assert_eq!(report["succeeded"], 1);
    let ability = &report["abilities"][0];
    assert_eq!(ability["codeName"], "Accurate I");
    assert_eq!(ability["pdfName"], "Accurate 1");
    Ok(())
}

#[test]
fn duplicate_heading_surfaces_as_warning() -> Result<()> {
    let text = "START\nAccurate I\nRogue\nRequires one of:\nAmbusher\n\nAmbusher\nRogue\nDoes another thing.\n";
    let fixture = Fixture::new(&["Accurate I", "Ambusher"], text)?;
    let output = run_command(extract_cmd(&fixture, "START"))?;
    let report = parse_report(&output.stdout)?;

    assert_eq!(report["failed"], 0);
    let warnings = report["warnings"].as_array().unwrap();
    assert!(
        warnings
            .iter()
            .any(|w| w["kind"] == "DuplicateHeading" && w["abilityName"] == "Ambusher"),
        "expected DuplicateHeading warning, got {warnings:?}"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN Ambusher [DuplicateHeading]"));
    Ok(())
}

#[test]
fn missing_anchor_aborts_with_nonzero_exit() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I"], "no marker anywhere\n")?;
    let output = run_command_expect_failure(extract_cmd(&fixture, "ABILITY DESCRIPTIONS"))?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("section anchor not found"));
    Ok(())
}

#[test]
fn unknown_flag_is_rejected() -> Result<()> {
    let mut cmd = Command::new(extract_abilities_bin());
    cmd.arg("--frobnicate");
    let output = run_command_expect_failure(cmd)?;
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown flag"));
    Ok(())
}

#[test]
fn anchor_and_anchor_file_are_mutually_exclusive() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I"], TWO_ABILITY_TEXT)?;
    let anchor_file = fixture.path("anchor.txt");
    std::fs::write(&anchor_file, TWO_ABILITY_ANCHOR)?;
    let mut cmd = extract_cmd(&fixture, TWO_ABILITY_ANCHOR);
    cmd.arg("--anchor-file").arg(&anchor_file);
    let output = run_command_expect_failure(cmd)?;
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("--anchor/--anchor-file may only be provided once")
    );
    Ok(())
}

#[test]
fn anchor_file_contents_are_used_verbatim() -> Result<()> {
    let fixture = Fixture::new(&["Accurate I", "Ambusher"], TWO_ABILITY_TEXT)?;
    let anchor_file = fixture.path("anchor.txt");
    std::fs::write(&anchor_file, TWO_ABILITY_ANCHOR)?;
    let mut cmd = Command::new(extract_abilities_bin());
    cmd.arg("--names")
        .arg(&fixture.names)
        .arg("--text")
        .arg(&fixture.text)
        .arg("--anchor-file")
        .arg(&anchor_file);
    let output = run_command(cmd)?;
    let report = parse_report(&output.stdout)?;
    assert_eq!(report["succeeded"], 2);
    Ok(())
}

#[test]
fn resolve_order_reports_document_order_and_repeats() -> Result<()> {
    let text = "contents:\nAmbusher\nSTART\nBackstab\nRogue\nx\nAccurate I\nRogue\ny\nAmbusher\nRogue\nz\nAmbusher\n";
    let fixture = Fixture::new(&["Accurate I", "Ambusher", "Backstab"], text)?;
    let mut cmd = Command::new(resolve_order_bin());
    cmd.arg("--names")
        .arg(&fixture.names)
        .arg("--text")
        .arg(&fixture.text)
        .arg("--anchor")
        .arg("START")
        .arg("--anchor-tolerance")
        .arg("0");
    let output = run_command(cmd)?;
    let value: Value = serde_json::from_slice(&output.stdout)?;

    let order: Vec<&str> = value["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["codeName"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["Backstab", "Accurate I", "Ambusher"]);

    let repeats = value["repeats"].as_array().unwrap();
    assert_eq!(repeats.len(), 1);
    assert_eq!(repeats[0]["codeName"], "Ambusher");
    Ok(())
}
