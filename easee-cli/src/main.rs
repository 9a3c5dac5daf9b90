fn main() {
    if let Err(err) = easee_cloud::app::run() {
        eprintln!("easee cli failed: {err}");
        std::process::exit(1);
    }
}
