use std::path::{Path, PathBuf};

/// Read a UTF-8 text file and return its lines verbatim.
///
/// Line terminators (`\n` or `\r\n`) are removed; nothing else is filtered.
pub fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    tracing::debug!("Read {} line(s) from {}", lines.len(), path.display());
    Ok(lines)
}

/// Returns the path to the ypip data directory (`~/.ypip/`).
pub fn ypip_home() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".ypip")
}
