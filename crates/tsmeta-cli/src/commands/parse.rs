use crate::cli::ParseArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::utils::paths::expand_user;
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use tsmeta::core::report;
use tsmeta::engine::progress::ProgressReporter;
use tsmeta::workflows;

pub fn run(args: ParseArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new(true);
    run_in_session(&args.pattern, args.json, settings, &mut session)
}

/// Parses everything matching `pattern` and prints one summary (or JSON
/// record) per matched file. Results land in the session cache keyed by
/// basename stem.
pub fn run_in_session(
    pattern: &str,
    json: bool,
    settings: &Settings,
    session: &mut Session,
) -> Result<()> {
    let pattern = expand_user(pattern).to_string_lossy().into_owned();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let entries = workflows::parse::run(
        &pattern,
        settings.max_header_lines,
        &mut session.cache,
        &reporter,
    )?;
    info!("parsed {} file(s) for pattern '{}'", entries.len(), pattern);

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::Other(e.into()))?;
        println!("{rendered}");
        return Ok(());
    }

    for entry in &entries {
        print!("{}", report::render_summary(&entry.key, entry.record.as_ref()));
    }
    Ok(())
}
