//! Practice-text generation boundary.
//!
//! The core only ever sees `TextGenerator::generate`, which is total:
//! whatever goes wrong inside an implementation, the caller gets a
//! typeable string back. The shipped implementation serves passages
//! embedded in the binary; a remote service can be slotted in behind
//! the same trait.

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

static PASSAGE_DIR: Dir = include_dir!("src/passages");

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display, Serialize, Deserialize,
)]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Portuguese,
    Dutch,
}

impl Language {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

/// Interpreted as a length and vocabulary hint only; the core never
/// assumes anything about the shape of the returned text.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display, Serialize, Deserialize,
)]
pub enum Difficulty {
    /// simple vocabulary, roughly 20-30 words
    Easy,
    /// standard vocabulary, roughly 40-60 words
    Medium,
    /// complex vocabulary, roughly 70-100 words
    Hard,
}

pub trait TextGenerator {
    /// Produce a practice passage. Never fails: implementations resolve
    /// internal errors to `fallback_text`.
    fn generate(&self, language: Language, difficulty: Difficulty) -> String;
}

/// Degraded-content message shown (and typed against) when no passage
/// could be produced.
pub fn fallback_text(language: Language) -> String {
    format!("Could not generate text for {language}. Please check your connection and try again.")
}

#[derive(Deserialize, Clone, Debug)]
struct PassageSet {
    #[allow(dead_code)]
    name: String,
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

/// Passages embedded at build time, one JSON file per language.
pub struct BuiltinGenerator;

impl BuiltinGenerator {
    fn load(language: Language) -> Option<PassageSet> {
        let file = PASSAGE_DIR.get_file(language.file_name())?;
        serde_json::from_str(file.contents_utf8()?).ok()
    }
}

impl TextGenerator for BuiltinGenerator {
    fn generate(&self, language: Language, difficulty: Difficulty) -> String {
        let Some(set) = Self::load(language) else {
            return fallback_text(language);
        };
        let pool = match difficulty {
            Difficulty::Easy => &set.easy,
            Difficulty::Medium => &set.medium,
            Difficulty::Hard => &set.hard,
        };
        match pool.choose(&mut rand::thread_rng()) {
            Some(passage) => passage.clone(),
            None => fallback_text(language),
        }
    }
}
