fn main() {
    if let Err(err) = capvis::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
