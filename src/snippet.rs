use chrono::Local;
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

static SNIPPET_DIR: Dir = include_dir!("src/snippets");

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum SupportedLanguage {
    Python,
    Javascript,
    Rust,
}

impl SupportedLanguage {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

/// A named piece of code to practice against. `code` is the target text the
/// session reconciles keystrokes with.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub id: String,
    pub name: String,
    pub code: String,
}

impl Snippet {
    /// Builds a practice snippet from a user-supplied text file. Files that
    /// are unreadable or empty after trimming are rejected here so the
    /// session never sees an empty target.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let code = fs::read_to_string(path)?;

        if code.trim().is_empty() {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("{} is empty", path.display()),
            ));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "uploaded".to_string());

        Ok(Self {
            id: unique_id("custom"),
            name,
            code,
        })
    }
}

/// Timestamp-qualified unique id for uploaded snippets.
pub fn unique_id(prefix: &str) -> String {
    let suffix = rand::thread_rng().gen_range(0..1000);
    format!("{prefix}-{}-{suffix}", Local::now().timestamp_millis())
}

/// Built-in snippets for one language plus anything uploaded during the run.
#[derive(Clone, Debug)]
pub struct SnippetLibrary {
    language: SupportedLanguage,
    uploaded: Vec<Snippet>,
}

impl SnippetLibrary {
    pub fn new(language: SupportedLanguage) -> Self {
        Self {
            language,
            uploaded: Vec::new(),
        }
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Built-ins first, uploads after, in insertion order.
    pub fn available(&self) -> Vec<Snippet> {
        let mut snippets = built_in(self.language);
        snippets.extend(self.uploaded.iter().cloned());
        snippets
    }

    pub fn find(&self, id: &str) -> Option<Snippet> {
        self.available().into_iter().find(|s| s.id == id)
    }

    /// First snippet of the library; every language file has at least one.
    pub fn default_snippet(&self) -> Option<Snippet> {
        self.available().into_iter().next()
    }

    /// The snippet following `id`, wrapping around at the end.
    pub fn next_after(&self, id: &str) -> Option<Snippet> {
        let all = self.available();
        let idx = all.iter().position(|s| s.id == id)?;
        all.into_iter().cycle().nth(idx + 1)
    }

    pub fn add_uploaded(&mut self, snippet: Snippet) {
        self.uploaded.push(snippet);
    }
}

/// Embedded snippet set for a language, from `src/snippets/<lang>.json`.
/// The files ship inside the binary; a missing or malformed one is a build
/// mistake, so this panics like any other broken static asset.
pub fn built_in(language: SupportedLanguage) -> Vec<Snippet> {
    let file = SNIPPET_DIR
        .get_file(language.file_name())
        .expect("snippet file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("unable to interpret snippet file as a string");

    from_str(file_as_str).expect("unable to deserialize snippet json")
}
