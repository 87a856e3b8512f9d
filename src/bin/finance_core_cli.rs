use finance_core::{cli::run_cli, init, utils::error_log};

fn main() {
    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        if let Ok(path) = error_log::log_error(&err) {
            eprintln!("Details written to {}", path.display());
        }
        std::process::exit(1);
    }
}
