use clap::Parser;

mod cli;
mod cmd;
mod error;
mod format;
mod io;
mod logging;
mod tool;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin, PostProcessArgs, ToolArgs, Verbosity};

use cmd::Context;
use error::CliError;
use tool::SystemRunner;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity());

    if let Err(e) = dispatch(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let ctx = Context {
        format: cli.format,
        verbosity: cli.verbosity(),
        max_file_size: cli.max_file_size,
        no_color: cli.no_color,
    };

    match &cli.command {
        Command::Run {
            assemblies,
            output,
            tool,
            post,
        } => cmd::run::run(&ctx, &SystemRunner, assemblies, output, tool, post),
        Command::Process {
            reports,
            output,
            post,
        } => cmd::process::run(&ctx, reports, output, post),
        Command::Merge {
            files,
            output,
            no_condense,
        } => cmd::merge::run(&ctx, files, output.as_deref(), *no_condense),
        Command::Condense { file, output } => cmd::condense::run(&ctx, file, output.as_deref()),
    }
}
