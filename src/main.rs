use clap::Parser;
use skintrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
