use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DatasetCache – explicit load-once handle
// ---------------------------------------------------------------------------

/// Owns the source path and the loaded dataset.
///
/// The dataset is read on first access and then shared read-only through
/// `Arc` until [`reload`](Self::reload), [`open`](Self::open) or
/// [`invalidate`](Self::invalidate) is called. A failed load never replaces
/// a dataset that is already held.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    max_rows: usize,
    dataset: Option<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, max_rows: usize) -> Self {
        Self {
            path: path.into(),
            max_rows,
            dataset: None,
        }
    }

    /// Source file of the cached dataset.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get_or_load(&mut self) -> Result<Arc<Dataset>> {
        if let Some(dataset) = &self.dataset {
            return Ok(Arc::clone(dataset));
        }
        self.reload()
    }

    /// Read the source file again and replace the cached dataset.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(load_file(&self.path, self.max_rows)?);
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Switch to another source file. On failure the previous path and
    /// dataset stay in place.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<Arc<Dataset>> {
        let path = path.into();
        let dataset = Arc::new(load_file(&path, self.max_rows)?);
        self.path = path;
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the cached dataset; the next access reads the file again.
    pub fn invalidate(&mut self) {
        self.dataset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::Builder;

    fn listings_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    const LINE_A: &str = r#"{"business_id":"a","name":"A","stars":4.0,"review_count":1}"#;
    const LINE_B: &str = r#"{"business_id":"b","name":"B","stars":3.0,"review_count":2}"#;

    #[test]
    fn test_loads_once() {
        let mut file = listings_file(&[LINE_A]);
        let mut cache = DatasetCache::new(file.path(), 100);
        assert!(!cache.is_loaded());

        let first = cache.get_or_load().unwrap();
        writeln!(file, "{LINE_B}").unwrap();
        let second = cache.get_or_load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        let reloaded = cache.reload().unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let file = listings_file(&[LINE_A]);
        let mut cache = DatasetCache::new(file.path(), 100);
        let first = cache.get_or_load().unwrap();
        cache.invalidate();
        assert!(!cache.is_loaded());
        let second = cache.get_or_load().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_open_keeps_previous_dataset() {
        let file = listings_file(&[LINE_A, LINE_B]);
        let mut cache = DatasetCache::new(file.path(), 100);
        cache.get_or_load().unwrap();

        assert!(cache.open("/nonexistent/other.json").is_err());
        assert_eq!(cache.path(), file.path());
        assert_eq!(cache.get_or_load().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_fails() {
        let mut cache = DatasetCache::new("/nonexistent/listings.json", 100);
        assert!(cache.get_or_load().is_err());
        assert!(!cache.is_loaded());
    }
}
