use clap::Parser;
use rangetrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    rangetrader::logging::init_tracing();
    run(Cli::parse())
}
