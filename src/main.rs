fn main() {
    if let Err(err) = matchstats::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
