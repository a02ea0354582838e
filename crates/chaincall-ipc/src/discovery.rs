//! Platform-default IPC socket locations.

use std::path::PathBuf;

/// Candidate socket paths, most likely first: the geth data directory, then
/// the Parity/OpenEthereum one. Empty if the home directory is unknown.
pub fn default_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    if cfg!(target_os = "macos") {
        vec![
            home.join("Library/Ethereum/geth.ipc"),
            home.join("Library/Application Support/io.parity.ethereum/jsonrpc.ipc"),
        ]
    } else {
        vec![
            home.join(".ethereum/geth.ipc"),
            home.join(".local/share/io.parity.ethereum/jsonrpc.ipc"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geth_path_comes_first() {
        let paths = default_paths();
        if let Some(first) = paths.first() {
            assert!(first.ends_with("geth.ipc"));
            assert_eq!(paths.len(), 2);
        }
    }
}
