use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn extract_abilities_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_extract-abilities"))
}

pub fn resolve_order_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_resolve-order"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {cmd:?}"))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command that is expected to fail; returns its output for assertions.
pub fn run_command_expect_failure(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {cmd:?}"))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}

/// On-disk fixture set for one extraction run.
pub struct Fixture {
    pub dir: TempDir,
    pub names: PathBuf,
    pub text: PathBuf,
}

impl Fixture {
    pub fn new(names: &[&str], text: &str) -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate fixture dir")?;
        let names_path = dir.path().join("names.json");
        let text_path = dir.path().join("abilities.txt");
        let names_vec: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        std::fs::write(&names_path, serde_json::to_string(&names_vec)?)?;
        std::fs::write(&text_path, text)?;
        Ok(Self {
            dir,
            names: names_path,
            text: text_path,
        })
    }

    pub fn write_mapping(&self, mapping: &[(&str, &str)]) -> Result<PathBuf> {
        let path = self.dir.path().join("mapping.json");
        let map: std::collections::BTreeMap<String, String> = mapping
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        std::fs::write(&path, serde_json::to_string(&map)?)?;
        Ok(path)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn schema_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("schema/extraction_report.json")
}
