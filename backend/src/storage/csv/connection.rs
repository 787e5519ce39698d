use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// CsvConnection manages the data directory layout: one base directory with
/// a `global_config.yaml` plus one sub-directory per user.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl CsvConnection {
    /// Create a new connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a new connection in the default data directory,
    /// `~/Documents/Pregnancy Tracker`.
    pub fn new_default() -> Result<Self> {
        let documents_dir = dirs::document_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine documents directory"))?;
        let data_dir = documents_dir.join("Pregnancy Tracker");
        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Generate a safe filesystem identifier from a username.
    /// Converts "Anna Lena" -> "anna_lena", "José" -> "jose", etc.
    pub fn safe_directory_name(username: &str) -> String {
        let mapped = username
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    '_'
                } else {
                    match c {
                        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
                        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
                        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
                        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
                        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
                        'ñ' | 'Ñ' => 'n',
                        'ç' | 'Ç' => 'c',
                        c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
                        _ => '_',
                    }
                }
            })
            .collect::<String>();

        // Collapse consecutive underscores
        let mut collapsed = String::new();
        let mut last_was_underscore = false;
        for c in mapped.chars() {
            if c == '_' {
                if !last_was_underscore {
                    collapsed.push('_');
                }
                last_was_underscore = true;
            } else {
                collapsed.push(c);
                last_was_underscore = false;
            }
        }
        collapsed.trim_matches('_').to_string()
    }

    /// Get the directory path for a user's data
    pub fn get_user_directory(&self, directory_name: &str) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.join(directory_name)
    }

    /// Ensure a user's directory exists, creating it if needed
    pub fn ensure_user_directory(&self, directory_name: &str) -> Result<PathBuf> {
        let dir = self.get_user_directory(directory_name);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created user directory: {}", dir.display());
        }
        Ok(dir)
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.clone()
    }

    /// Path of the global configuration file
    pub fn global_config_path(&self) -> PathBuf {
        self.base_directory().join("global_config.yaml")
    }
}

/// Atomic write pattern used by every repository: write to a temp file in the
/// same directory, then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(CsvConnection::safe_directory_name("Anna Lena"), "anna_lena");
        assert_eq!(CsvConnection::safe_directory_name("José"), "jose");
        assert_eq!(CsvConnection::safe_directory_name("mom#1!"), "mom_1");
        assert_eq!(CsvConnection::safe_directory_name("a  b"), "a_b");
    }

    #[test]
    fn test_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");
        let conn = CsvConnection::new(&base).unwrap();
        assert!(base.exists());
        assert_eq!(conn.base_directory(), base);
    }

    #[test]
    fn test_ensure_user_directory() {
        let temp_dir = TempDir::new().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();
        let dir = conn.ensure_user_directory("anna").unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with("anna"));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.yaml");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }
}
