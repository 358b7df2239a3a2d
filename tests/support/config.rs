use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temp `.toml` file that lives as long as the handle.
pub fn temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("cryptogap-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file.flush().expect("flush temp config");
    file
}
