use crate::infrastructure::error::InfrastructureError;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Read a script (or any text asset) in one go, as UTF-8.
///
/// A missing file maps to `ScriptNotFound`; anything else that stops a full
/// read (permissions, invalid UTF-8) maps to `ScriptRead`. Never returns
/// partial content.
pub fn read_script(path: &Path) -> Result<String, InfrastructureError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InfrastructureError::ScriptNotFound {
            path: path.display().to_string(),
        },
        _ => InfrastructureError::ScriptRead {
            path: path.display().to_string(),
            source: e,
        },
    })
}

/// Write content to a file atomically using a temporary file.
///
/// This function:
/// 1. Creates a temporary file in the same directory as the target path.
/// 2. Writes the content to the temporary file.
/// 3. Persists (renames) the temporary file to the target path.
///
/// The target file is either fully written or not written at all.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Same directory, so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_script_returns_full_text() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("clean.sql");
        fs::write(&path, "DROP TABLE IF EXISTS sale;\nDROP TABLE IF EXISTS store;\n")?;

        let text = read_script(&path)?;
        assert_eq!(text.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_read_script_missing_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let err = read_script(&dir.path().join("nope.sql")).unwrap_err();
        assert!(matches!(err, InfrastructureError::ScriptNotFound { .. }));
        assert!(err.to_string().contains("nope.sql"));
        Ok(())
    }

    #[test]
    fn test_read_script_rejects_invalid_utf8() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("latin1.sql");
        fs::write(&path, [0x53, 0x45, 0xff, 0xfe])?;

        let err = read_script(&path).unwrap_err();
        assert!(matches!(err, InfrastructureError::ScriptRead { .. }));
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.txt");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, "Updated");
        Ok(())
    }
}
