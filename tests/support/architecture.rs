use std::fs;
use std::path::{Path, PathBuf};

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn relative(path: &Path) -> String {
    path.strip_prefix(root())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read dir {}: {e}", dir.display()));
    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            walk(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}

/// Every `.rs` file under `relative_dir`, sorted.
pub fn rust_files(relative_dir: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(&root().join(relative_dir), &mut files);
    files.sort();
    files
}

/// `(file, line number, line)` for each line containing any of `patterns`.
pub fn lines_containing(relative_dir: &str, patterns: &[&str]) -> Vec<(String, usize, String)> {
    let mut hits = Vec::new();
    for file in rust_files(relative_dir) {
        let content = fs::read_to_string(&file)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
        for (idx, line) in content.lines().enumerate() {
            if patterns.iter().any(|p| line.contains(p)) {
                hits.push((relative(&file), idx + 1, line.to_string()));
            }
        }
    }
    hits
}

/// Lines in `mod.rs` files that are neither module declarations,
/// re-exports, attributes nor comments.
pub fn non_export_lines_in_mod_files(relative_dir: &str) -> Vec<(String, usize, String)> {
    let mut violations = Vec::new();
    for file in rust_files(relative_dir) {
        if file.file_name().and_then(|s| s.to_str()) != Some("mod.rs") {
            continue;
        }
        let content = fs::read_to_string(&file)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));

        let mut in_use_block = false;
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if in_use_block {
                in_use_block = !line.ends_with(';');
                continue;
            }
            let allowed = line.is_empty()
                || line.starts_with("//")
                || line.starts_with("pub mod ")
                || line.starts_with("mod ")
                || line.starts_with("#[cfg")
                || line.starts_with("pub use ");
            if line.starts_with("pub use ") && !line.ends_with(';') {
                in_use_block = true;
            }
            if !allowed {
                violations.push((relative(&file), idx + 1, raw.to_string()));
            }
        }
    }
    violations
}

pub fn path_exists(relative_path: &str) -> bool {
    root().join(relative_path).exists()
}
