use clap::Parser;

use kerf::cmd::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Show(args) => args.run(),
        Commands::Cuts(args) => args.run(),
        Commands::Npn(args) => args.run(),
        Commands::Dot(args) => args.run(),
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
