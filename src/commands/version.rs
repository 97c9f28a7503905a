/// `version` command.
use std::io::Write;

use clap::ArgMatches;

use crate::cli::output::write_fields;
use crate::dispatch::{CommandUnit, InvocationContext};

/// `multitool version`.
pub struct Version;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(Version)
}

impl CommandUnit for Version {
    fn name(&self) -> &'static str {
        "version"
    }

    fn help(&self) -> &'static str {
        "Print version information"
    }

    fn run(&self, _args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let config = ctx.group.config();
        if ctx.wants_json() {
            let fields = vec![
                ("name".to_owned(), config.name.to_owned()),
                ("version".to_owned(), config.version.to_owned()),
            ];
            write_fields(&mut ctx.out, &fields, ctx.format)?;
        } else {
            writeln!(ctx.out, "{}, version {}", config.name, config.version)?;
        }
        Ok(0)
    }
}
