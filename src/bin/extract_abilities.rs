//! Batch extractor for Athia ability descriptions.
//!
//! Reads the authoritative name list, an optional PDF-name mapping, and the
//! plain-text rulebook dump; locates every ability's text span between
//! successive heading lines; and writes the full extraction report as JSON to
//! stdout or `--out`. A human-readable summary goes to stderr. Per-ability
//! failures are report entries, not exit codes; the run only fails outright
//! on bad inputs or a missing section anchor.

use anyhow::{Context, Result, bail};
use athia_extract::{
    AbilityCatalog, DEFAULT_ANCHOR_TOLERANCE, ReportSchema, SectionAnchor, read_source_text,
    run_extraction,
};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;

    let catalog = AbilityCatalog::load(&args.names, args.mapping.as_deref())?;
    let text = read_source_text(&args.text)?;
    let anchor = args.anchor.resolve()?;

    let report = run_extraction(&catalog, &text, &anchor, args.anchor_tolerance)?;

    let value = serde_json::to_value(&report).context("serializing report")?;
    if args.check_schema {
        ReportSchema::embedded()?.validate(&value)?;
    }

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    match &args.out {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("writing report to {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }

    eprint!("{}", report.render_summary());
    Ok(())
}

/// Section anchor source: inline flag or file, never both.
enum AnchorSource {
    Inline(String),
    File(PathBuf),
    Unset,
}

impl AnchorSource {
    fn set_inline(&mut self, value: String) -> Result<()> {
        if !matches!(self, AnchorSource::Unset) {
            bail!("--anchor/--anchor-file may only be provided once");
        }
        *self = AnchorSource::Inline(value);
        Ok(())
    }

    fn set_file(&mut self, path: PathBuf) -> Result<()> {
        if !matches!(self, AnchorSource::Unset) {
            bail!("--anchor/--anchor-file may only be provided once");
        }
        *self = AnchorSource::File(path);
        Ok(())
    }

    fn resolve(&self) -> Result<SectionAnchor> {
        match self {
            AnchorSource::Inline(value) => SectionAnchor::new(value.clone()),
            AnchorSource::File(path) => {
                // File contents are the literal, byte for byte; a trailing
                // newline in the file is part of the anchor.
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading anchor file {}", path.display()))?;
                SectionAnchor::new(raw)
            }
            AnchorSource::Unset => bail!("one of --anchor or --anchor-file is required"),
        }
    }
}

struct CliArgs {
    names: PathBuf,
    mapping: Option<PathBuf>,
    text: PathBuf,
    anchor: AnchorSource,
    anchor_tolerance: usize,
    out: Option<PathBuf>,
    pretty: bool,
    check_schema: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut names: Option<PathBuf> = None;
        let mut mapping: Option<PathBuf> = None;
        let mut text: Option<PathBuf> = None;
        let mut anchor = AnchorSource::Unset;
        let mut anchor_tolerance = DEFAULT_ANCHOR_TOLERANCE;
        let mut out: Option<PathBuf> = None;
        let mut pretty = false;
        let mut check_schema = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--names" => names = Some(PathBuf::from(next_value(&mut args, "--names")?)),
                "--mapping" => mapping = Some(PathBuf::from(next_value(&mut args, "--mapping")?)),
                "--text" => text = Some(PathBuf::from(next_value(&mut args, "--text")?)),
                "--anchor" => anchor.set_inline(next_value(&mut args, "--anchor")?)?,
                "--anchor-file" => {
                    anchor.set_file(PathBuf::from(next_value(&mut args, "--anchor-file")?))?
                }
                "--anchor-tolerance" => {
                    let raw = next_value(&mut args, "--anchor-tolerance")?;
                    anchor_tolerance = raw.parse().with_context(|| {
                        format!("--anchor-tolerance must be a non-negative integer, got {raw:?}")
                    })?;
                }
                "--out" => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
                "--pretty" => pretty = true,
                "--check-schema" => check_schema = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        Ok(CliArgs {
            names: names.ok_or_else(|| anyhow::anyhow!("--names is required"))?,
            mapping,
            text: text.ok_or_else(|| anyhow::anyhow!("--text is required"))?,
            anchor,
            anchor_tolerance,
            out,
            pretty,
            check_schema,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    r#"Usage: extract-abilities --names PATH --text PATH (--anchor STRING|--anchor-file PATH)
                         [--mapping PATH] [--anchor-tolerance N] [--out PATH]
                         [--pretty] [--check-schema]

Extracts ability records from an OCR'd rulebook text dump by goalpost search
between heading lines, and emits a JSON report for manual review.

  --names PATH             JSON array of authoritative ability names
  --mapping PATH           JSON object mapping ability name to its PDF spelling
  --text PATH              plain-text rendering of the ability pages
  --anchor STRING          literal marking the start of the descriptions section
  --anchor-file PATH       read the anchor literal from a file (verbatim)
  --anchor-tolerance N     admit headings up to N bytes before the anchor (default 10)
  --out PATH               write the report JSON here instead of stdout
  --pretty                 pretty-print the report JSON
  --check-schema           validate the report against the shipped schema
"#
}
