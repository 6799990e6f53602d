//! Platform-specific module for operating system features.

use std::io;
use std::path::Path;

/// Check whether a file carries an OS-level immutable flag.
///
/// On macOS this inspects `st_flags` for `UF_IMMUTABLE`/`SF_IMMUTABLE`
/// (the `uchg`/`schg` flags set by `chflags`). Platforms without
/// `st_flags` report no flag.
#[cfg(target_os = "macos")]
pub fn is_immutable(path: &Path) -> io::Result<bool> {
    use nix::libc::{SF_IMMUTABLE, UF_IMMUTABLE};
    use nix::sys::stat::lstat;

    let st = lstat(path).map_err(|e| io::Error::from_raw_os_error(e as i32))?;
    Ok(st.st_flags & (UF_IMMUTABLE | SF_IMMUTABLE) != 0)
}

#[cfg(not(target_os = "macos"))]
pub fn is_immutable(_path: &Path) -> io::Result<bool> {
    Ok(false)
}
