/// `sysinfo` command: operating system product and build details.
use std::process::Command as Process;

use anyhow::{Context, bail};
use clap::ArgMatches;

use crate::cli::output::write_fields;
use crate::dispatch::{CommandUnit, InvocationContext};

const SW_VERS: &str = "/usr/bin/sw_vers";

/// `multitool sysinfo`.
pub struct SysInfo;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(SysInfo)
}

impl CommandUnit for SysInfo {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn help(&self) -> &'static str {
        "Print macOS product name, version and build"
    }

    fn run(&self, _args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let raw = read_sw_vers()?;
        let mut fields = parse_sw_vers(&raw);
        if fields.is_empty() {
            bail!("{SW_VERS} produced no recognisable output");
        }
        fields.push(("Architecture".to_owned(), std::env::consts::ARCH.to_owned()));
        write_fields(&mut ctx.out, &fields, ctx.format)?;
        Ok(0)
    }
}

#[tracing::instrument]
fn read_sw_vers() -> anyhow::Result<String> {
    let output = Process::new(SW_VERS)
        .output()
        .with_context(|| format!("failed to run {SW_VERS}"))?;
    if !output.status.success() {
        bail!("{SW_VERS} exited with {}", output.status);
    }
    String::from_utf8(output.stdout).context("sw_vers output is not UTF-8")
}

/// Parse `Key:<tab>Value` lines; lines without a colon are skipped.
#[tracing::instrument(skip(raw))]
fn parse_sw_vers(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
