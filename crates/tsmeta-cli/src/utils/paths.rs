use directories::BaseDirs;
use std::path::PathBuf;

/// Expands a leading `~` to the user's home directory, leaving every other
/// input untouched.
pub fn expand_user(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().to_path_buf();
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(input)
}
