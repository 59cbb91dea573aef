//! tilegraph - drive the layout graph from the command line
//!
//! Runs layout scripts, the built-in demo and settings checks. Errors are
//! reported by `run_cli`; the exit status only signals failure.

fn main() {
    if tilegraph::cli::run_cli().is_err() {
        std::process::exit(1);
    }
}
