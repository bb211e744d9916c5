use std::process::ExitCode;

fn main() -> ExitCode {
    survival::app::run()
}
