//! @ai:module:intent JSON loader for benchmark question suites
//! @ai:module:layer infrastructure
//! @ai:module:public_api SuiteLoader, SuiteLoaderTrait
//! @ai:module:stateless true

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::suite::question::{BenchmarkQuestion, QuestionSuite};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// @ai:intent Trait for loading question suites
pub trait SuiteLoaderTrait: Send + Sync {
    /// @ai:intent Load a whole suite from a file
    fn load(&self, path: &Path) -> Result<QuestionSuite>;

    /// @ai:intent Load a suite keeping only questions that match the filter
    fn load_filtered(&self, path: &Path, filter: &FilterConfig) -> Result<QuestionSuite>;
}

/// @ai:intent On-disk shapes accepted for a suite; bare arrays are tried first
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuiteFile {
    Bare(Vec<BenchmarkQuestion>),
    Wrapped(QuestionSuite),
}

/// @ai:intent Loads question suites from JSON files
pub struct SuiteLoader;

impl SuiteLoader {
    /// @ai:intent Create a new suite loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse suite JSON, naming bare arrays after the file stem
    /// @ai:effects pure
    fn parse(content: &str, fallback_name: &str) -> Result<QuestionSuite> {
        let suite = match serde_json::from_str::<SuiteFile>(content) {
            Ok(SuiteFile::Bare(questions)) => QuestionSuite {
                name: fallback_name.to_string(),
                description: String::new(),
                questions,
                pvs_path: None,
            },
            Ok(SuiteFile::Wrapped(suite)) => suite,
            Err(e) => {
                return Err(Error::UnsupportedSuiteFormat(format!(
                    "expected a question array or {{name, questions}} object: {}",
                    e
                )))
            }
        };

        Self::check_unique_ids(&suite.questions)?;
        Ok(suite)
    }

    fn check_unique_ids(questions: &[BenchmarkQuestion]) -> Result<()> {
        let mut seen = HashSet::new();

        for question in questions {
            if !seen.insert(question.id.as_str()) {
                return Err(Error::UnsupportedSuiteFormat(format!(
                    "duplicate question id '{}'",
                    question.id
                )));
            }
        }

        Ok(())
    }
}

impl Default for SuiteLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteLoaderTrait for SuiteLoader {
    /// @ai:intent Load a suite from a .json file
    /// @ai:pre path has a .json extension
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<QuestionSuite> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if !is_json {
            return Err(Error::UnsupportedSuiteFormat(format!(
                "{} is not a .json file",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("questions");

        let suite = Self::parse(&content, stem)?;
        tracing::debug!("Loaded suite '{}' with {} questions", suite.name, suite.questions.len());
        Ok(suite)
    }

    /// @ai:intent Load a suite and apply the category/id filter
    /// @ai:effects fs:read
    fn load_filtered(&self, path: &Path, filter: &FilterConfig) -> Result<QuestionSuite> {
        let mut suite = self.load(path)?;

        suite
            .questions
            .retain(|q| filter.matches(q.category.as_str(), &q.id));

        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::question::QuestionCategory;
    use tempfile::TempDir;

    const BARE: &str = r#"[
        {"id": "tech-1", "category": "technical", "prompt": "How do I index a JSONB column?", "expected_style": ["technical", "direct"]},
        {"id": "advice-1", "category": "advice", "prompt": "Should I learn Go or Rust next?"}
    ]"#;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_bare_array_named_after_file() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "core-questions.json", BARE);

        let suite = SuiteLoader::new().load(&path).unwrap();
        assert_eq!(suite.name, "core-questions");
        assert_eq!(suite.questions.len(), 2);
        assert_eq!(suite.questions[0].expected_style, vec!["technical", "direct"]);
    }

    #[test]
    fn test_load_wrapped_suite() {
        let temp = TempDir::new().unwrap();
        let content = r#"{
            "name": "Developer suite",
            "description": "Questions for engineers",
            "pvs_path": "profiles/ada.json",
            "questions": [{"id": "p-1", "category": "personal", "prompt": "Plan my week"}]
        }"#;
        let path = write(temp.path(), "suite.json", content);

        let suite = SuiteLoader::new().load(&path).unwrap();
        assert_eq!(suite.name, "Developer suite");
        assert_eq!(suite.questions[0].category, QuestionCategory::Personal);
        assert_eq!(suite.pvs_path.as_deref(), Some(Path::new("profiles/ada.json")));
    }

    #[test]
    fn test_rejects_non_json_extension() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "suite.yaml", BARE);

        let err = SuiteLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSuiteFormat(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let content = r#"[
            {"id": "dup", "category": "technical", "prompt": "a"},
            {"id": "dup", "category": "creative", "prompt": "b"}
        ]"#;

        let err = SuiteLoader::parse(content, "x").unwrap_err();
        assert!(err.to_string().contains("duplicate question id 'dup'"));
    }

    #[test]
    fn test_load_filtered_by_category() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "questions.json", BARE);
        let filter = FilterConfig {
            categories: Some(vec!["advice".to_string()]),
            ..Default::default()
        };

        let suite = SuiteLoader::new().load_filtered(&path, &filter).unwrap();
        assert_eq!(suite.questions.len(), 1);
        assert_eq!(suite.questions[0].id, "advice-1");
    }
}
