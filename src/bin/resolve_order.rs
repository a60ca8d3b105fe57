//! Prints the canonical heading order for operator inspection.
//!
//! Useful before a full extraction run: shows which headings were found in
//! the valid region, in the order the source text actually presents them,
//! plus any repeated standalone-line occurrences the goalpost heuristic will
//! have to guess between. Output is a single JSON object on stdout.

use anyhow::{Context, Result, bail};
use athia_extract::{
    AbilityCatalog, DEFAULT_ANCHOR_TOLERANCE, SectionAnchor, read_source_text, resolve_order,
};
use serde_json::json;
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
    let anchor = match (&args.anchor, &args.anchor_file) {
        (Some(literal), None) => SectionAnchor::new(literal.clone())?,
        (None, Some(path)) => SectionAnchor::new(
            fs::read_to_string(path)
                .with_context(|| format!("reading anchor file {}", path.display()))?,
        )?,
        (Some(_), Some(_)) => bail!("--anchor and --anchor-file are mutually exclusive"),
        (None, None) => bail!("one of --anchor or --anchor-file is required"),
    };

    let section_start = anchor.locate(&text)?;
    let resolved = resolve_order(&catalog, &text, section_start, args.anchor_tolerance)?;

    let output = json!({
        "sectionStart": section_start,
        "order": resolved.refs,
        "repeats": resolved.repeats,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    eprintln!(
        "resolved {} of {} catalog entries ({} repeated heading line(s))",
        resolved.refs.len(),
        catalog.names().len(),
        resolved.repeats.len()
    );
    Ok(())
}

struct CliArgs {
    names: PathBuf,
    mapping: Option<PathBuf>,
    text: PathBuf,
    anchor: Option<String>,
    anchor_file: Option<PathBuf>,
    anchor_tolerance: usize,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut names: Option<PathBuf> = None;
        let mut mapping: Option<PathBuf> = None;
        let mut text: Option<PathBuf> = None;
        let mut anchor: Option<String> = None;
        let mut anchor_file: Option<PathBuf> = None;
        let mut anchor_tolerance = DEFAULT_ANCHOR_TOLERANCE;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--names" => names = Some(PathBuf::from(next_value(&mut args, "--names")?)),
                "--mapping" => mapping = Some(PathBuf::from(next_value(&mut args, "--mapping")?)),
                "--text" => text = Some(PathBuf::from(next_value(&mut args, "--text")?)),
                "--anchor" => anchor = Some(next_value(&mut args, "--anchor")?),
                "--anchor-file" => {
                    anchor_file = Some(PathBuf::from(next_value(&mut args, "--anchor-file")?))
                }
                "--anchor-tolerance" => {
                    let raw = next_value(&mut args, "--anchor-tolerance")?;
                    anchor_tolerance = raw.parse().with_context(|| {
                        format!("--anchor-tolerance must be a non-negative integer, got {raw:?}")
                    })?;
                }
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
            anchor_file,
            anchor_tolerance,
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
    r#"Usage: resolve-order --names PATH --text PATH (--anchor STRING|--anchor-file PATH)
                     [--mapping PATH] [--anchor-tolerance N]

Scans the source text for standalone ability heading lines and prints the
order they occur in, with repeated occurrences flagged for review.
"#
}
