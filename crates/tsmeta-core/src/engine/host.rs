use std::path::PathBuf;

/// Classification of a user-supplied identifier by the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier names a structure file on disk.
    Path(PathBuf),
    /// The identifier names (or uniquely abbreviates) a registered handle.
    Handle(String),
    /// Neither a file nor a known handle.
    None,
}

/// The surrounding host environment the workflows delegate to.
///
/// The host owns the registry of loaded model handles and whatever
/// interaction surface it has (a console, a prompt, nothing at all). The
/// workflows only ever consult it through this trait.
pub trait HostEnvironment {
    /// Classifies `identifier` as a filesystem path, a registered handle,
    /// or nothing.
    fn resolve(&self, identifier: &str) -> Resolution;

    /// Currently registered handle names, in registration order.
    fn list_handles(&self) -> Vec<String>;

    /// Asks the host to pick one of `candidates`. Returning `None` means
    /// the selection was cancelled, which callers treat as a normal
    /// outcome, not an error.
    fn choose_handle(&self, candidates: &[String]) -> Option<String>;
}

/// Matches `identifier` against `handles`: an exact match wins, otherwise
/// a substring match. Returns every handle that matched.
pub fn matching_handles(identifier: &str, handles: &[String]) -> Vec<String> {
    if handles.iter().any(|h| h == identifier) {
        return vec![identifier.to_string()];
    }
    handles
        .iter()
        .filter(|h| h.contains(identifier))
        .cloned()
        .collect()
}
