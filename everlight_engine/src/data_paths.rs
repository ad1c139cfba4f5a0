use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory holding `world.ron` and `config.toml`, resolved once.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Path of a file inside the data directory.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Look for the data directory from the working directory first, then next to the binary.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("everlight_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.extend(
            [Some(dir), dir.parent()]
                .into_iter()
                .flatten()
                .flat_map(|base| [base.join("everlight_engine/data"), base.join("data")]),
        );
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("everlight_engine/data"))
}
