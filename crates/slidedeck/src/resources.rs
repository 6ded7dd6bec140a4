use std::path::{Path, PathBuf};

/// Directories searched, in registration order, for assets referenced by a
/// relative path in the slide description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePaths {
    dirs: Vec<PathBuf>,
}

impl ResourcePaths {
    /// Register a search directory. Re-registering is a no-op.
    pub fn add(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.dirs.contains(&dir) {
            tracing::debug!(dir = %dir.display(), "registered resource path");
            self.dirs.push(dir);
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.exists())
    }
}
