mod commands;
mod terminal;

use commands::{CommandLine, Commands, cables, links};
use ibpdc_common::config::Config;
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.debug);

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
        debug: commands.debug,
    };

    print::banner(cfg.no_banner, cfg.quiet);

    let result = match &commands.command {
        Commands::Links(args) => {
            print::header("checking switch links", cfg.quiet);
            links::links(args, &cfg)
        }
        Commands::Cables(args) => {
            print::header("collecting cable information", cfg.quiet);
            cables::cables(args, &cfg)
        }
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    result
}
