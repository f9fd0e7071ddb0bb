fn main() {
    if let Err(err) = stratagen::cli::run_cli() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
