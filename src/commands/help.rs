/// `help` command: root help, or help for one command.
use std::io::Write;

use clap::{Arg, ArgMatches, Command};

use crate::dispatch::{CommandUnit, InvocationContext};

/// `multitool help [COMMAND]`.
pub struct Help;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(Help)
}

impl CommandUnit for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn help(&self) -> &'static str {
        "Print help for the program or for a command"
    }

    fn command(&self) -> Command {
        Command::new(self.name()).arg(
            Arg::new("command")
                .value_name("COMMAND")
                .help("Command to describe"),
        )
    }

    fn run(&self, args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let name = args.get_one::<String>("command").map(String::as_str);
        // `UnknownCommand` passes through to the dispatcher as a usage error.
        let text = ctx.group.render_help(name)?;
        write!(ctx.out, "{text}")?;
        Ok(0)
    }
}
