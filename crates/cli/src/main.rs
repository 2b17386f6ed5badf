fn main() {
    if let Err(e) = assetscope_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
