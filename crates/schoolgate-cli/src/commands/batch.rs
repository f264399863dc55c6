//! Batch command

use super::{configured, print_json, FAIL, PASS};
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use schoolgate_validate::config::GuardConfig;
use schoolgate_validate::{validate_json_with, FieldKind, NumericOptions, Validators};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON file holding one object; `-` reads stdin
    pub file: PathBuf,

    /// Field validator as `name=kind`, numeric bounds as `name=numeric:MIN..MAX`
    #[arg(long = "field", short = 'f', value_parser = parse_field_spec)]
    pub fields: Vec<(String, FieldKind)>,
}

/// Parse `name=kind` with an optional `:MIN..MAX` suffix for numeric kinds.
fn parse_field_spec(spec: &str) -> Result<(String, FieldKind), String> {
    let (name, kind) = spec
        .split_once('=')
        .ok_or_else(|| format!("expected name=kind, got `{}`", spec))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{}`", spec));
    }

    let (tag, bounds) = match kind.split_once(':') {
        Some((tag, bounds)) => (tag, Some(bounds)),
        None => (kind, None),
    };

    let kind = match (tag.parse::<FieldKind>().unwrap_or_default(), bounds) {
        (FieldKind::Numeric(_), Some(bounds)) => FieldKind::Numeric(parse_bounds(bounds)?),
        (_, Some(_)) => return Err(format!("bounds are only allowed on numeric fields: `{}`", spec)),
        (kind, None) => kind,
    };

    Ok((name.to_string(), kind))
}

fn parse_bounds(bounds: &str) -> Result<NumericOptions, String> {
    let (min, max) = bounds
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got `{}`", bounds))?;

    let parse = |s: &str| -> Result<Option<f64>, String> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse::<f64>()
                .map(Some)
                .map_err(|e| format!("invalid bound `{}`: {}", s, e))
        }
    };

    let mut options = NumericOptions::new();
    if let Some(min) = parse(min)? {
        options = options.min(min);
    }
    if let Some(max) = parse(max)? {
        options = options.max(max);
    }
    Ok(options)
}

fn read_record(file: &Path) -> Result<serde_json::Value> {
    let contents = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let record: serde_json::Value =
        serde_json::from_str(&contents).context("Record is not valid JSON")?;
    if !record.is_object() {
        anyhow::bail!("Record must be a JSON object");
    }
    Ok(record)
}

pub fn batch(args: BatchArgs, config: &GuardConfig, json: bool) -> Result<bool> {
    let record = read_record(&args.file)?;
    let validators: Validators = args
        .fields
        .into_iter()
        .map(|(name, kind)| (name, configured(kind, config)))
        .collect();
    let logger = config
        .security_logger()
        .context("Failed to open the security event log")?;

    tracing::debug!(fields = validators.len(), "validating record");
    let result = validate_json_with(&record, &validators, &logger);

    if json {
        print_json(&result)?;
    } else {
        for (field, value) in &result.sanitized {
            match result.error(field) {
                Some(error) => println!("{}{}: {}", FAIL, style(field).bold(), style(error).red()),
                None => println!("{}{} = {}", PASS, style(field).bold(), value),
            }
        }
        if result.is_valid {
            println!("{}", style("Record is valid").green());
        } else {
            println!("{}", style("Record was rejected").red());
        }
    }

    Ok(result.is_valid)
}
