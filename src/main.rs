use clap::Parser;
use etfrank::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
