use std::path::PathBuf;

/// The daemon binary is installed next to the cli one, only the file name
/// differs.
pub fn to_daemon_path(mut path: PathBuf) -> PathBuf {
    path.set_file_name("memento-daemon");
    #[cfg(windows)]
    {
        path.set_extension("exe");
    }
    path
}
