fn main() {
    if let Err(e) = opticiandb_lib::run() {
        eprintln!("opticiandb: {e}");
        std::process::exit(1);
    }
}
