//! Platform-specific locations for machine files.
//!
//! - **User machines**: `~/.config/arcadia/machines/` (Linux),
//!   `~/Library/Application Support/arcadia/machines/` (macOS),
//!   `%APPDATA%\arcadia\machines\` (Windows)

use std::path::{Path, PathBuf};

const APP_NAME: &str = "arcadia";

const MACHINES_SUBDIR: &str = "machines";

/// Returns the user-specific machines directory.
///
/// Falls back to `./arcadia/machines` if the config directory cannot be
/// determined.
pub fn user_machines_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(MACHINES_SUBDIR)
}

/// Finds a machine file by path or by name.
///
/// An existing file path wins; otherwise `name` (with `.toml` appended if
/// missing) is looked up in [`user_machines_dir()`].
pub fn find_machine(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = user_machines_dir().join(filename);
    user_path.is_file().then_some(user_path)
}

/// Creates the user machines directory if needed and returns it.
pub fn ensure_user_machines_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_machines_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Lists `.toml` files in the user machines directory, sorted.
pub fn list_user_machines() -> Vec<PathBuf> {
    list_machines_in_dir(&user_machines_dir())
}

fn list_machines_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut machines: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    machines.sort();
    machines
}

/// Machine name from a file path (the file stem).
pub fn machine_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn user_dir_ends_with_app_and_subdir() {
        let dir = user_machines_dir();
        assert!(dir.ends_with("arcadia/machines"));
    }

    #[test]
    fn find_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.toml");
        std::fs::write(&path, "name = \"board\"").unwrap();

        assert_eq!(find_machine(path.to_str().unwrap()), Some(path));
        assert_eq!(find_machine("definitely_not_a_machine_9f3a"), None);
    }

    #[test]
    fn list_only_toml_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.toml"), "").unwrap();
        std::fs::write(temp.path().join("a.toml"), "").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();

        let found = list_machines_in_dir(temp.path());
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| machine_name_from_path(p))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(list_machines_in_dir(&temp.path().join("missing")).is_empty());
    }
}
