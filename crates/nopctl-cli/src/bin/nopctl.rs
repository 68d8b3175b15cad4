fn main() {
    let code = nopctl_cli::run_from_env();
    std::process::exit(code);
}
