use std::fmt::Debug;

/// Where a [`TomlStore`](crate::TomlStore) keeps its serialized document.
pub trait Backend: Send + Sync + Debug {
    /// Reads the document stored under `key`, `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, std::io::Error>;

    /// Replaces the document stored under `key`.
    fn write(&self, key: &str, data: &str) -> Result<(), std::io::Error>;

    /// Human-readable location of `key`, also used to identify shared instances.
    fn location(&self, key: &str) -> String;
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::Backend;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    /// Documents as files in one directory, replaced atomically on write.
    #[derive(Debug)]
    pub struct FileBackend {
        base_dir: PathBuf,
    }

    impl FileBackend {
        pub fn new(directory: impl AsRef<Path>) -> Self {
            Self {
                base_dir: directory.as_ref().to_path_buf(),
            }
        }
    }

    impl Backend for FileBackend {
        fn read(&self, key: &str) -> Result<Option<String>, std::io::Error> {
            match std::fs::read_to_string(self.base_dir.join(key)) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        }

        fn write(&self, key: &str, data: &str) -> Result<(), std::io::Error> {
            let path = self.base_dir.join(key);
            let parent_dir = path.parent().unwrap_or(&self.base_dir);
            std::fs::create_dir_all(parent_dir)?;

            // A crash mid-write leaves the previous document in place.
            let mut tmp_file = tempfile::NamedTempFile::new_in(parent_dir)?;
            tmp_file.write_all(data.as_bytes())?;
            tmp_file.as_file().sync_all()?;
            tmp_file.persist(&path).map_err(|e| e.error)?;
            Ok(())
        }

        fn location(&self, key: &str) -> String {
            self.base_dir.join(key).display().to_string()
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm {
    use super::Backend;
    use web_sys::{window, Storage as WebStorage};

    /// Documents as browser `localStorage` items under an app-specific prefix.
    #[derive(Debug)]
    pub struct LocalStorageBackend {
        prefix: String,
    }

    impl LocalStorageBackend {
        pub fn new(app_id: &str) -> Self {
            Self {
                prefix: format!("typed_prefs_{}_", app_id.replace(['/', '.'], "_")),
            }
        }

        fn storage() -> Result<WebStorage, std::io::Error> {
            window()
                .ok_or_else(|| std::io::Error::other("window not available"))?
                .local_storage()
                .map_err(|_| std::io::Error::other("localStorage not available"))?
                .ok_or_else(|| std::io::Error::other("localStorage is null"))
        }

        fn full_key(&self, key: &str) -> String {
            format!("{}{}", self.prefix, key)
        }
    }

    impl Backend for LocalStorageBackend {
        fn read(&self, key: &str) -> Result<Option<String>, std::io::Error> {
            Self::storage()?
                .get_item(&self.full_key(key))
                .map_err(|_| std::io::Error::other("failed to read from localStorage"))
        }

        fn write(&self, key: &str, data: &str) -> Result<(), std::io::Error> {
            Self::storage()?
                .set_item(&self.full_key(key), data)
                .map_err(|_| std::io::Error::other("failed to write to localStorage"))
        }

        fn location(&self, key: &str) -> String {
            format!("localStorage::{}", self.full_key(key))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::native::FileBackend;
    use super::Backend;

    #[test]
    fn test_missing_document_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        assert_eq!(backend.read("absent.toml").unwrap(), None);
    }

    #[test]
    fn test_write_creates_directories_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested").join("deep"));

        backend.write("prefs.toml", "first").unwrap();
        backend.write("prefs.toml", "second").unwrap();

        assert_eq!(backend.read("prefs.toml").unwrap(), Some("second".to_string()));
        let location = backend.location("prefs.toml");
        assert!(location.contains("deep"));
        assert!(location.ends_with("prefs.toml"));
    }
}
