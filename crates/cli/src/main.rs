use std::process::ExitCode;

fn main() -> ExitCode {
    tickertalk_cli::run()
}
