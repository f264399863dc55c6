//! CLI commands

mod batch;
mod check;
mod scan;
mod text;

pub use batch::{batch, BatchArgs};
pub use check::{check, CheckArgs};
pub use scan::scan;
pub use text::{escape, sanitize, TextArgs};

use console::Emoji;
use schoolgate_validate::config::GuardConfig;
use schoolgate_validate::FieldKind;

pub(crate) static PASS: Emoji<'_, '_> = Emoji("✅ ", "+ ");
pub(crate) static WARN: Emoji<'_, '_> = Emoji("⚠️ ", "! ");
pub(crate) static FAIL: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Apply configured policies to a kind parsed from the command line.
pub(crate) fn configured(kind: FieldKind, config: &GuardConfig) -> FieldKind {
    match kind {
        FieldKind::Password(_) => FieldKind::Password(config.password_policy()),
        other => other,
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
