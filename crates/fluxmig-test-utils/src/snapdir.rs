//! Render a whole directory tree as one deterministic string.
//! - Respects `.gitignore` and `.ignore` files
//! - Only includes UTF-8 text files (CRLF→LF), ignores binary files
//! - Deterministic path order
//!
//! Comparing two manifests of the same tree shows whether any file changed
//! byte-for-byte between them.

use ignore::WalkBuilder;
use std::{fs, io::Read, path::Path};

/// Build a `=== <relative path>` headed dump of every text file under `root`.
pub fn dir_manifest(root: impl AsRef<Path>) -> String {
    let base = fs::canonicalize(root.as_ref()).expect("failed to canonicalize root path");

    // Gitignore-aware file walker, but deterministic and confined to `base`
    let mut wb = WalkBuilder::new(&base);
    wb.hidden(true)
        .git_ignore(true)
        .ignore(true)
        .git_exclude(true)
        .git_global(false)
        .parents(false);

    let mut entries: Vec<(String, String)> = Vec::new();

    for dent in wb.build().filter_map(Result::ok) {
        let p = dent.path();
        if p == base {
            continue;
        }

        let Some(ft) = dent.file_type() else { continue };
        if !ft.is_file() {
            continue;
        }

        let rel = p
            .strip_prefix(&base)
            .expect("path should be within base")
            .to_string_lossy()
            .replace('\\', "/");

        let mut buf = Vec::new();
        fs::File::open(p)
            .expect("failed to open file")
            .read_to_end(&mut buf)
            .expect("failed to read file");

        if let Ok(s) = std::str::from_utf8(&buf) {
            entries.push((rel, s.replace("\r\n", "\n")));
        }
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (rel, body) in entries {
        out.push_str(&format!("=== {rel}\n"));
        out.push_str(&body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
