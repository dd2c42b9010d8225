mod app;
mod cli;
mod control;
mod logging;
mod simulate;

use clap::Parser;
use ratatui::DefaultTerminal;
use warpfield_config::Config;

use crate::app::App;
use crate::cli::{Cli, Command, RunArgs};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Command::Simulate(args)) => {
            logging::init_stderr(cli.verbose)?;
            simulate::execute(&args, &config)
        }
        Some(Command::InitConfig) => {
            let path = match &cli.config {
                Some(path) => {
                    config.save_to(path)?;
                    path.clone()
                }
                None => config.save()?,
            };
            println!("wrote {}", path.display());
            Ok(())
        }
        Some(Command::Run(args)) => run(config, args, cli.verbose),
        None => run(config, RunArgs::default(), cli.verbose),
    }
}

fn run(config: Config, args: RunArgs, verbose: u8) -> color_eyre::Result<()> {
    logging::init_file(verbose, config.log_file.as_deref())?;

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, config, args);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, config: Config, args: RunArgs) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    App::new(config, size, args.speed, args.seed).run(terminal)
}
