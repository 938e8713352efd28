use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    awr_sheet::cli::run_convert()
}
