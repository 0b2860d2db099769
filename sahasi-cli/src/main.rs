//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on standard error"
)]
fn main() {
    if let Err(err) = run() {
        eprintln!("sahasi: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> eyre::Result<()> {
    sahasi_cli::run().wrap_err("scoring failed")
}
