fn main() {
    if let Err(e) = clinicdesk_lib::run() {
        eprintln!("clinicdesk: {e}");
        std::process::exit(1);
    }
}
