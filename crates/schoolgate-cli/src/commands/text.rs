//! Escape and sanitize commands

use super::print_json;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Value to process
    pub input: String,
}

#[derive(Serialize)]
struct Transformed<'a> {
    input: &'a str,
    output: String,
}

fn emit(input: &str, output: String, json: bool) -> Result<bool> {
    if json {
        print_json(&Transformed { input, output })?;
    } else {
        println!("{}", output);
    }
    Ok(true)
}

pub fn escape(args: TextArgs, json: bool) -> Result<bool> {
    let output = schoolgate_validate::escape_html(&args.input);
    emit(&args.input, output, json)
}

pub fn sanitize(args: TextArgs, json: bool) -> Result<bool> {
    let output = schoolgate_validate::sanitize(&args.input);
    emit(&args.input, output, json)
}
