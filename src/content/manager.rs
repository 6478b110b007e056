//! Content library on disk
//!
//! Manages the directory of .txt source files that cards can be generated
//! from. The directory is seeded with sample files on first use so the
//! file-based workflow works out of the box.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ContentError;

/// Sample files written into an empty content directory
const SAMPLE_FILES: &[(&str, &str)] = &[
    ("azure_openai.txt", include_str!("../../content-samples/azure_openai.txt")),
    ("azure_functions.txt", include_str!("../../content-samples/azure_functions.txt")),
    ("custom_content.txt", include_str!("../../content-samples/custom_content.txt")),
];

/// Topics with a canned content file
const PREDEFINED_TOPICS: &[(&str, &str)] = &[
    ("azure openai", "azure_openai.txt"),
    ("azure functions", "azure_functions.txt"),
];

/// Manages content source files for flashcard generation
pub struct ContentManager {
    content_dir: PathBuf,
}

impl ContentManager {
    /// Create a manager rooted at the given directory, seeding samples
    ///
    /// Sample files are only written when missing, so user edits survive.
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Result<Self, ContentError> {
        let content_dir = content_dir.as_ref().to_path_buf();
        debug!(dir = %content_dir.display(), "ContentManager::new: called");

        fs::create_dir_all(&content_dir)?;

        for (filename, content) in SAMPLE_FILES {
            let path = content_dir.join(filename);
            if !path.exists() {
                debug!(%filename, "ContentManager::new: seeding sample file");
                fs::write(&path, content.trim())?;
            }
        }

        Ok(Self { content_dir })
    }

    /// List available .txt content files, sorted by name
    pub fn list_files(&self) -> Result<Vec<String>, ContentError> {
        debug!("ContentManager::list_files: called");
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.content_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read a content file by name
    pub fn read_file(&self, filename: &str) -> Result<String, ContentError> {
        debug!(%filename, "ContentManager::read_file: called");
        let path = self.content_dir.join(filename);
        if !path.exists() {
            return Err(ContentError::FileNotFound(filename.to_string()));
        }
        Ok(fs::read_to_string(&path)?.trim().to_string())
    }

    /// Write a new content file
    pub fn create_file(&self, filename: &str, content: &str) -> Result<(), ContentError> {
        debug!(%filename, "ContentManager::create_file: called");
        fs::write(self.content_dir.join(filename), content)?;
        Ok(())
    }

    /// Content for a topic with a canned file, if one matches
    ///
    /// Matching is a case-insensitive substring check against the topic.
    pub fn predefined_for_topic(&self, topic: &str) -> Option<String> {
        debug!(%topic, "ContentManager::predefined_for_topic: called");
        let topic_lower = topic.to_lowercase();
        for (key, filename) in PREDEFINED_TOPICS {
            if topic_lower.contains(key) {
                match self.read_file(filename) {
                    Ok(content) => return Some(content),
                    Err(_) => continue,
                }
            }
        }
        None
    }

    /// Absolute path of the content directory, for display
    pub fn dir_path(&self) -> PathBuf {
        self.content_dir
            .canonicalize()
            .unwrap_or_else(|_| self.content_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_seeds_sample_files() {
        let dir = TempDir::new().unwrap();
        let manager = ContentManager::new(dir.path().join("content")).unwrap();

        let files = manager.list_files().unwrap();
        assert!(files.contains(&"azure_openai.txt".to_string()));
        assert!(files.contains(&"azure_functions.txt".to_string()));
        assert!(files.contains(&"custom_content.txt".to_string()));
    }

    #[test]
    fn test_seeding_preserves_existing_files() {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(&content_dir).unwrap();
        fs::write(content_dir.join("azure_openai.txt"), "user edited").unwrap();

        let manager = ContentManager::new(&content_dir).unwrap();
        assert_eq!(manager.read_file("azure_openai.txt").unwrap(), "user edited");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let manager = ContentManager::new(dir.path().join("content")).unwrap();

        let result = manager.read_file("nope.txt");
        assert!(matches!(result, Err(ContentError::FileNotFound(_))));
    }

    #[test]
    fn test_create_and_read_file() {
        let dir = TempDir::new().unwrap();
        let manager = ContentManager::new(dir.path().join("content")).unwrap();

        manager.create_file("notes.txt", "MQTT broker notes").unwrap();
        assert_eq!(manager.read_file("notes.txt").unwrap(), "MQTT broker notes");
    }

    #[test]
    fn test_list_files_ignores_non_txt() {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        let manager = ContentManager::new(&content_dir).unwrap();
        fs::write(content_dir.join("notes.md"), "markdown").unwrap();

        let files = manager.list_files().unwrap();
        assert!(!files.iter().any(|f| f.ends_with(".md")));
    }

    #[test]
    fn test_predefined_for_topic() {
        let dir = TempDir::new().unwrap();
        let manager = ContentManager::new(dir.path().join("content")).unwrap();

        assert!(manager.predefined_for_topic("Azure OpenAI Service").is_some());
        assert!(manager.predefined_for_topic("Kubernetes").is_none());
    }
}
