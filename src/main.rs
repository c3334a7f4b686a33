use clap::Parser;
use signaltester::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
