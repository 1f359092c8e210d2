use crate::cli::AttachArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::session::Session;
use crate::utils::paths::expand_user;
use std::path::Path;
use tsmeta::workflows;

pub fn run(args: AttachArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new(true);
    // One-shot invocation: no models have been loaded, so the target name
    // itself becomes the handle the record is stored under.
    session.registry.register(&args.target);
    run_in_session(&args.ts, &args.target, settings, &mut session)
}

/// Parses a TS file and force-stores the record under the model named (or
/// uniquely abbreviated) by `target`.
pub fn run_in_session(
    ts: &Path,
    target: &str,
    settings: &Settings,
    session: &mut Session,
) -> Result<()> {
    let ts = expand_user(&ts.to_string_lossy());
    let outcome = workflows::attach::run(
        &ts,
        target,
        &session.registry,
        settings.max_header_lines,
        &mut session.cache,
    )?;

    let source = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.path.display().to_string());
    println!("attach: attached metadata from {} to '{}'", source, outcome.handle);
    print!("{}", outcome.summary);
    Ok(())
}
