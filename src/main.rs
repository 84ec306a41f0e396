fn main() {
    if let Err(err) = moa_target::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
