mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // rsrcfork warnings on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        env_logger::Builder::new()
            .filter_module("rsrcfork", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Info { path } => commands::info::run(path, &cli.global),
        Command::List { path, r#type } => {
            commands::list::run(path, r#type.as_deref(), &cli.global)
        }
        Command::Extract {
            path,
            r#type,
            id,
            name,
            output,
        } => commands::extract::run(
            path,
            r#type,
            commands::extract::Selector::new(*id, name.as_deref())?,
            output.as_deref(),
        ),
        Command::Rewrite { path, in_place } => commands::rewrite::run(path, *in_place),
        Command::SaveAs { path, output } => commands::save_as::run(path, output),
    }
}
