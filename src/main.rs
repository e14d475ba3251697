use clap::Parser;
use dirclean::cli::{Cli, run_cli};
use dirclean::output::OutputFormatter;
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run_cli(&cli) {
        OutputFormatter::error(&format!("Error: {}", e));
        std::process::exit(e.exit_code());
    }
}
