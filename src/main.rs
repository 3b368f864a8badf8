use asciivision::app;
use asciivision::cli::Args;
use asciivision::describe::API_KEY_ENV;
use clap::Parser;

/// Load environment variables from a .env file if present.
fn load_env() {
    // Existing env vars win; a missing .env is fine
    let _ = dotenv::dotenv();

    if std::env::var(API_KEY_ENV).is_err() {
        log::debug!("{} not set; image descriptions are unavailable", API_KEY_ENV);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    load_env();

    let args = Args::parse();
    if let Err(e) = app::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
