use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

use crate::setting::SettingsError;

pub fn path_to_str(path: &Path) -> Result<String, SettingsError> {
    path.to_str()
        .map(String::from)
        .ok_or_else(|| SettingsError::Path(PathBuf::from(path)))
}

pub fn mkdirp<P: AsRef<Path>>(path: P) -> io::Result<()> {
    if let Err(e) = create_dir_all(path) {
        if e.kind() != io::ErrorKind::AlreadyExists {
            return Err(e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mkdirp_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        mkdirp(&nested).unwrap();
        mkdirp(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn path_to_str_roundtrips_utf8() {
        let path = PathBuf::from("/tmp/fyyur.db");
        assert_eq!(path_to_str(&path).unwrap(), "/tmp/fyyur.db");
    }
}
