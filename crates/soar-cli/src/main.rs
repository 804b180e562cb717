//! Binary entrypoint for the soar CLI.

fn main() {
    std::process::exit(soar_cli::run());
}
