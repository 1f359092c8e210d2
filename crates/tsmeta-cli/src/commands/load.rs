use crate::cli::LoadArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::utils::paths::expand_user;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tsmeta::core::io::ts;
use tsmeta::core::report;
use tsmeta::engine::discovery;
use tsmeta::engine::host::{HostEnvironment, Resolution};
use tsmeta::workflows::parse::key_for_path;

pub struct LoadOutcome {
    pub handle: String,
    pub model_path: Option<PathBuf>,
    pub ts_path: Option<PathBuf>,
    pub summary: String,
}

pub fn run(args: LoadArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new(true);
    run_in_session(&args.model, args.ts.as_deref(), settings, &mut session)
}

pub fn run_in_session(
    model: &str,
    ts: Option<&Path>,
    settings: &Settings,
    session: &mut Session,
) -> Result<()> {
    let outcome = load_model(model, ts, settings, session)?;

    match &outcome.model_path {
        Some(path) => println!(
            "load: model: {} (structure from: {})",
            outcome.handle,
            path.display()
        ),
        None => println!("load: model: {} (already registered)", outcome.handle),
    }
    match &outcome.ts_path {
        Some(path) => println!("TS used: {}", path.display()),
        None => println!("TS file: not found (searched common candidates)."),
    }
    print!("{}", outcome.summary);
    Ok(())
}

/// Registers a model handle from a structure file path (or an existing
/// handle), locates its TS file, parses it, and caches the result under
/// the handle. A missing TS is cached as an absence so a later bare `show`
/// answers from the cache instead of re-discovering.
pub fn load_model(
    model: &str,
    ts: Option<&Path>,
    settings: &Settings,
    session: &mut Session,
) -> Result<LoadOutcome> {
    let (handle, model_path) = match session.registry.resolve(model) {
        Resolution::Path(path) => (key_for_path(&path), Some(path)),
        Resolution::Handle(handle) => (handle, None),
        Resolution::None => {
            return Err(CliError::Argument(format!(
                "neither a structure file nor a registered model: {model}"
            )));
        }
    };
    session.registry.register(&handle);

    let ts_path = match ts {
        Some(path) => {
            let path = expand_user(&path.to_string_lossy());
            if path.is_file() {
                Some(path)
            } else {
                warn!("provided TS not found: {}", path.display());
                None
            }
        }
        None => model_path.as_deref().and_then(discovery::sibling_ts_for),
    };

    let record = match &ts_path {
        Some(path) => match ts::parse_path(path, settings.max_header_lines) {
            Ok(record) => {
                info!("parsed TS {} for model '{}'", path.display(), handle);
                Some(record)
            }
            Err(e) => {
                warn!("failed to parse {}: {}", path.display(), e);
                None
            }
        },
        None => None,
    };

    let summary = report::render_summary(&handle, record.as_ref());
    session.cache.store(handle.as_str(), record);

    Ok(LoadOutcome {
        handle,
        model_path,
        ts_path,
        summary,
    })
}
