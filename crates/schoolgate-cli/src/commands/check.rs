//! Check command

use super::{configured, print_json, FAIL, PASS};
use anyhow::Result;
use clap::Args;
use console::style;
use schoolgate_validate::config::GuardConfig;
use schoolgate_validate::{FieldKind, NumericOptions, RawInput, ValidationVerdict};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Field kind: login, password, search, numeric or text
    pub kind: String,

    /// Value to validate
    pub input: String,

    /// Lower bound for numeric values
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,

    /// Upper bound for numeric values
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Require an integral numeric value
    #[arg(long)]
    pub integer: bool,
}

impl CheckArgs {
    fn field_kind(&self, config: &GuardConfig) -> FieldKind {
        match self.kind.parse::<FieldKind>().unwrap_or_default() {
            FieldKind::Numeric(_) => {
                let mut options = NumericOptions::new().integer_only(self.integer);
                if let Some(min) = self.min {
                    options = options.min(min);
                }
                if let Some(max) = self.max {
                    options = options.max(max);
                }
                FieldKind::Numeric(options)
            }
            other => configured(other, config),
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    kind: &'a str,
    #[serde(flatten)]
    verdict: &'a ValidationVerdict,
}

pub fn check(args: CheckArgs, config: &GuardConfig, json: bool) -> Result<bool> {
    let kind = args.field_kind(config);
    if kind == FieldKind::Text && !args.kind.eq_ignore_ascii_case("text") {
        tracing::warn!(kind = %args.kind, "unknown field kind, treating as text");
    }

    let verdict = kind.validate(&RawInput::from(args.input.as_str()));

    if json {
        print_json(&CheckReport {
            kind: kind.tag(),
            verdict: &verdict,
        })?;
    } else if verdict.is_valid {
        println!("{}{} {}", PASS, style("valid").green().bold(), style(kind).dim());
        if let Some(value) = &verdict.sanitized_value {
            println!("   sanitized: {}", value);
        }
    } else {
        println!("{}{} {}", FAIL, style("rejected").red().bold(), style(kind).dim());
        if let Some(message) = verdict.error_message() {
            println!("   error: {}", message);
        }
    }

    Ok(verdict.is_valid)
}
