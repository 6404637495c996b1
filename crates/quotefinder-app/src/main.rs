//! Find My Quote binary - composition root.
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from TOML and apply overrides
//! 3. Wire the HTTP lookup, pagination engine and dispatcher
//! 4. Run a one-shot search or an interactive console

mod cli;
mod console;

use std::io::Write;

use clap::Parser;

use quotefinder_core::QuoteFinderConfig;
use quotefinder_skill::dispatcher::{FIRST_MOVIE_INTENT, NEXT_MOVIE_INTENT, SLOT_PHRASE};
use quotefinder_skill::{
    load_cursor, Dispatcher, HttpQuoteLookup, IntentRequest, LocalHost, SessionAttributes,
    SkillRequest,
};

use cli::{CliArgs, Command};

/// Print matches for one phrase, optionally paging to the end.
fn run_search(
    dispatcher: &Dispatcher<HttpQuoteLookup>,
    phrase: &str,
    all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut session = SessionAttributes::new();

    let find = IntentRequest::new(FIRST_MOVIE_INTENT).with_slot(SLOT_PHRASE, phrase);
    let output = dispatcher.handle(&SkillRequest::Intent(find), &mut session)?;
    console::print_output(&mut out, &output)?;

    let next = SkillRequest::Intent(IntentRequest::new(NEXT_MOVIE_INTENT));
    while all && load_cursor(&session).is_some_and(|c| !c.is_exhausted()) {
        let output = dispatcher.handle(&next, &mut session)?;
        console::print_output(&mut out, &output)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = if config_file.exists() {
        match QuoteFinderConfig::load(&config_file) {
            Ok(config) => (config, None),
            Err(e) => (QuoteFinderConfig::default(), Some(e)),
        }
    } else {
        (QuoteFinderConfig::default(), None)
    };
    args.apply_overrides(&mut config);

    // Tracing. --log-level wins over RUST_LOG, which wins over the config file.
    let filter = match args.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting quotefinder v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Failed to load config, using defaults")
        }
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let dispatcher = match Dispatcher::from_config(&config) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build dispatcher");
            return Err(e.into());
        }
    };
    tracing::info!(
        base_url = %config.lookup.base_url,
        page_size = config.paging.page_size,
        "Dispatcher ready"
    );

    let result = match args.command {
        Command::Search { ref phrase, all } => run_search(&dispatcher, &phrase.join(" "), all),
        Command::Console => {
            let host = LocalHost::new(dispatcher, config.session.timeout_minutes);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            console::run(&host, stdin.lock(), &mut stdout.lock()).map_err(Into::into)
        }
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "quotefinder failed");
    }
    result
}
