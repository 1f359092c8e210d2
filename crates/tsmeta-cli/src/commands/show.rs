use crate::cli::ShowArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::utils::paths::expand_user;
use std::path::Path;
use tsmeta::engine::host::HostEnvironment;
use tsmeta::workflows;
use tsmeta::workflows::show::{ShowOutcome, ShowSource};

pub fn run(args: ShowArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new(true);
    run_in_session(
        args.key.as_deref(),
        args.ts.as_deref(),
        args.json,
        settings,
        &mut session,
    )
}

/// Shows metadata for a key, selecting one interactively when no key was
/// given and the session has several registered models.
pub fn run_in_session(
    key: Option<&str>,
    ts: Option<&Path>,
    json: bool,
    settings: &Settings,
    session: &mut Session,
) -> Result<()> {
    let key = match key {
        Some(key) => key.to_string(),
        None => {
            let handles = session.registry.list_handles();
            if handles.is_empty() {
                println!(
                    "show: no models are registered. Load one first or pass a key, e.g. `show H0232`."
                );
                return Ok(());
            }
            match session.select_key() {
                Some(selected) => {
                    if handles.len() == 1 {
                        println!("show: one model registered, using: {selected}");
                    }
                    selected
                }
                None => {
                    println!("show: selection cancelled. Re-run with the chosen model name.");
                    return Ok(());
                }
            }
        }
    };

    let ts = ts.map(|p| expand_user(&p.to_string_lossy()));
    let outcome = workflows::show::run(
        &key,
        ts.as_deref(),
        &session.registry,
        &settings.discovery,
        settings.max_header_lines,
        &mut session.cache,
    )?;

    match outcome {
        ShowOutcome::Shown {
            key,
            source,
            summary,
            record,
        } => {
            match &source {
                ShowSource::Explicit(path) => println!(
                    "show: parsed and cached TS from: {} -> key: {}",
                    path.display(),
                    key
                ),
                ShowSource::Discovered(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    println!("show: found TS '{name}', parsed and cached under key: {key}");
                }
                ShowSource::Cache => {}
            }
            if json {
                let rendered = serde_json::to_string_pretty(&record)
                    .map_err(|e| CliError::Other(e.into()))?;
                println!("{rendered}");
            } else {
                print!("{summary}");
            }
        }
        ShowOutcome::NotFound { key } => {
            println!("show: no cached metadata for '{key}' and no TS file found automatically.");
            println!("Options:");
            println!("  1) Run `parse /path/to/that_TS.txt` (caches under the TS basename).");
            println!("  2) Pass an explicit TS path to parse and attach now:");
            println!("       show {key} --ts /full/path/to/that_TS.txt");
        }
    }
    Ok(())
}
