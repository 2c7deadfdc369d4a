fn main() {
    if let Err(err) = initcheck::cli::run() {
        initcheck::ui::eprintln_error(&err);
        std::process::exit(initcheck::exit::exit_code(&err));
    }
}
