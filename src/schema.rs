//! JSON Schema validation for the emitted report.
//!
//! The canonical schema ships in `schema/extraction_report.json` and is
//! embedded at compile time so the CLI can check its own output without a
//! schema path flag. The compiled validator borrows the schema document, so
//! the raw value is pinned behind an `Arc` for the validator's lifetime.

use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const EMBEDDED_SCHEMA: &str = include_str!("../schema/extraction_report.json");

/// Compiled report schema plus the pinned raw document.
pub struct ReportSchema {
    compiled: JSONSchema,
    #[allow(dead_code)]
    raw: Arc<Value>,
}

impl ReportSchema {
    /// Compile the schema shipped with this binary.
    pub fn embedded() -> Result<Self> {
        let value: Value =
            serde_json::from_str(EMBEDDED_SCHEMA).context("parsing embedded report schema")?;
        Self::from_value(value)
    }

    /// Compile a schema from an on-disk copy (tests use this to confirm the
    /// shipped file and the embedded copy stay in sync).
    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self> {
        let raw = Arc::new(value);
        // JSONSchema::compile borrows the schema document; the Arc above keeps
        // it alive for as long as the compiled validator.
        let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
        let compiled = JSONSchema::compile(raw_static).context("compiling report schema")?;
        Ok(Self { compiled, raw })
    }

    /// Validate a serialized report, aggregating every violation into one
    /// readable error.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{} (at {})", err, err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("report failed schema validation:\n{details}");
        }
        Ok(())
    }
}
