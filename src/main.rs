use clap::Parser;
use firmsite::cli::{self, Cli};
use firmsite::logging::init_logger;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logger(args.log_level());
    cli::run(args)
}
