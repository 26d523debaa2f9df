use benchplot::run::Mode;
use std::process::ExitCode;

fn main() -> ExitCode {
    benchplot::cli::main(Mode::Interactive)
}
