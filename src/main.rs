fn main() {
    if let Err(error) = tasklist_lib::run() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
