use crate::utils::paths::expand_user;
use inquire::Select;
use std::path::Path;
use tracing::debug;
use tsmeta::engine::cache::MetaCache;
use tsmeta::engine::host::{HostEnvironment, Resolution, matching_handles};

/// Structure file extensions accepted by `load`.
const STRUCTURE_EXTENSIONS: [&str; 2] = ["pdb", "ent"];

fn has_structure_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let lower = e.to_string_lossy().to_lowercase();
            STRUCTURE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// The registry of model handles known to this process, in registration
/// order. This is the CLI's implementation of the host side of the
/// workflow contract.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    names: Vec<String>,
    interactive: bool,
}

impl HandleRegistry {
    pub fn new(interactive: bool) -> Self {
        Self {
            names: Vec::new(),
            interactive,
        }
    }

    pub fn register(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            debug!("registering model handle '{name}'");
            self.names.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl HostEnvironment for HandleRegistry {
    fn resolve(&self, identifier: &str) -> Resolution {
        let path = expand_user(identifier);
        if path.is_file() && has_structure_extension(&path) {
            return Resolution::Path(path);
        }
        let matches = matching_handles(identifier, &self.names);
        match matches.as_slice() {
            [single] => Resolution::Handle(single.clone()),
            _ => Resolution::None,
        }
    }

    fn list_handles(&self) -> Vec<String> {
        self.names.clone()
    }

    fn choose_handle(&self, candidates: &[String]) -> Option<String> {
        if !self.interactive || candidates.is_empty() {
            return None;
        }
        match Select::new("Select a model:", candidates.to_vec()).prompt() {
            Ok(choice) => Some(choice),
            Err(e) => {
                debug!("model selection cancelled: {e}");
                None
            }
        }
    }
}

/// One process-lifetime session: the handle registry plus the metadata
/// cache. The fields stay separate so workflows can borrow the registry
/// immutably while mutating the cache.
#[derive(Debug, Default)]
pub struct Session {
    pub registry: HandleRegistry,
    pub cache: MetaCache,
}

impl Session {
    pub fn new(interactive: bool) -> Self {
        Self {
            registry: HandleRegistry::new(interactive),
            cache: MetaCache::new(),
        }
    }

    /// Selects the model to show when no key was given: the sole
    /// registered model wins automatically, several trigger the
    /// interactive chooser, none yields `None`.
    pub fn select_key(&self) -> Option<String> {
        let handles = self.registry.list_handles();
        match handles.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            _ => self.registry.choose_handle(&handles),
        }
    }
}
