/// `about` command: program description and licensing notice.
use std::io::Write;

use clap::ArgMatches;

use crate::cli::output::write_fields;
use crate::dispatch::{CommandUnit, InvocationContext};

/// `multitool about`.
pub struct About;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(About)
}

impl CommandUnit for About {
    fn name(&self) -> &'static str {
        "about"
    }

    fn help(&self) -> &'static str {
        "Print information about this program, including license"
    }

    fn run(&self, _args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let config = ctx.group.config();
        let fields = vec![
            ("name".to_owned(), config.name.to_owned()),
            ("version".to_owned(), config.version.to_owned()),
            ("license".to_owned(), env!("CARGO_PKG_LICENSE").to_owned()),
            ("description".to_owned(), env!("CARGO_PKG_DESCRIPTION").to_owned()),
        ];
        write_fields(&mut ctx.out, &fields, ctx.format)?;
        if !ctx.wants_json() {
            writeln!(
                ctx.out,
                "\nThis software is provided \"as is\", without warranty of any kind."
            )?;
        }
        Ok(0)
    }
}
