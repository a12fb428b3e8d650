fn report(err: &bikeshare_stats::CliError, json: bool) {
    if err.code == 0 {
        // --help / --version
        print!("{}", err.message);
    } else if json {
        eprintln!("{}", err.to_json());
    } else {
        eprintln!("{err}");
    }
}

fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    let raw_args: Vec<String> = std::env::args().collect();
    let json_requested = raw_args.iter().any(|arg| arg == "--json");
    let parsed = match bikeshare_stats::parse_cli(raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            report(&err, json_requested);
            std::process::exit(err.code);
        }
    };

    let json = parsed.wants_json();
    if let Err(err) = bikeshare_stats::run_with_parsed(parsed) {
        report(&err, json);
        std::process::exit(err.code);
    }
}
