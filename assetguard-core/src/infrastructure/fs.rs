use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replaces `path` with `content` in one step: readers see either the old file or the new one.
///
/// Missing parent directories are created first. The temporary file lives next to
/// the target so the final rename never crosses filesystems.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_ref())?;
    staged.flush()?;
    staged
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}
