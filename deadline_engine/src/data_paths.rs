use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Cached path to the directory containing the engine's runtime data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the runtime data directory.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("deadline_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("deadline_engine/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("deadline_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    // the crate's own data directory, for `cargo run` from anywhere in the workspace
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"));

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("deadline_engine/data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_appends_to_root() {
        let path = data_path("world.json");
        assert!(path.ends_with("world.json"));
        assert!(path.parent().is_some_and(Path::is_dir));
    }
}
