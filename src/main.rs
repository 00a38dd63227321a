fn main() {
    if let Err(e) = chatdock::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
