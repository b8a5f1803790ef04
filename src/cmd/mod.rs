use std::process::ExitCode;

mod check;
mod clear;
mod describe;
mod end;
mod mv;
mod new;
mod set;

const USAGE: &'static str = "\
A utility for building, editing, validating and describing recurrence rules.

USAGE:
    recur <command> ...

COMMANDS:
    check     Validate rules and report every field level problem
    clear     Turn recurrence off entirely
    describe  Render rules as human readable sentences
    end       Change when a series ends
    move      Recompute rules after the start date of their series moves
    new       Emit the default rule for a new series
    set       Edit the repeat pattern of existing rules
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<ExitCode> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "check" => check::run(p),
        "clear" => clear::run(p),
        "describe" => describe::run(p),
        "end" => end::run(p),
        "move" | "mv" => mv::run(p),
        "new" => new::run(p),
        "set" => set::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
