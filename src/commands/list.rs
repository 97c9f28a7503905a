/// `commands` command: list registered commands.
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::is_restricted;
use crate::cli::output::write_commands;
use crate::dispatch::{CommandUnit, InvocationContext};
use crate::types::CommandInfoOutput;

/// `multitool commands`.
pub struct List;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(List)
}

impl CommandUnit for List {
    fn name(&self) -> &'static str {
        "commands"
    }

    fn help(&self) -> &'static str {
        "List the commands available on this system"
    }

    fn command(&self) -> Command {
        Command::new(self.name()).arg(
            Arg::new("all")
                .long("all")
                .short('a')
                .action(ArgAction::SetTrue)
                .help("Include hidden commands"),
        )
    }

    fn run(&self, args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let all = args.get_flag("all") || ctx.group.config().show_hidden;
        let commands: Vec<CommandInfoOutput> = ctx
            .group
            .registry()
            .all()
            .filter(|unit| all || !unit.hidden())
            .map(|unit| CommandInfoOutput {
                name: unit.name().to_owned(),
                help: unit.help().to_owned(),
                restricted: is_restricted(unit.name()),
                hidden: unit.hidden(),
            })
            .collect();
        tracing::debug!(count = commands.len(), all, "listing commands");
        write_commands(&mut ctx.out, &commands, ctx.format)?;
        Ok(0)
    }
}
