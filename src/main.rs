fn main() {
    if let Err(err) = tiered_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
