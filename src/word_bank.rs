use crate::error::{GameError, GameResult};
use include_dir::{include_dir, Dir};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::fs;
use std::io;
use std::path::Path;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

/// Flavor text shown after a wrong guess; `{}` is replaced by the language name.
pub const FAREWELL_TEMPLATES: [&str; 12] = [
    "Farewell, {}",
    "Adios, {}",
    "R.I.P., {}",
    "We'll miss you, {}",
    "Oh no, not {}!",
    "{} bites the dust",
    "Gone but not forgotten, {}",
    "The end of {} as we know it",
    "Off into the sunset, {}",
    "{}, it's been real",
    "{}, your watch has ended",
    "{} has left the building",
];

/// A language label. Each one stands for a wrong guess the player can afford.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    /// Chip background colour as `#RRGGBB`
    pub background: String,
    /// Chip text colour as `#RRGGBB`
    pub foreground: String,
}

impl Language {
    pub fn new(name: &str, background: &str, foreground: &str) -> Self {
        Self {
            name: name.to_string(),
            background: background.to_string(),
            foreground: foreground.to_string(),
        }
    }

    pub fn background_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_colour(&self.background)
    }

    pub fn foreground_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_colour(&self.foreground)
    }
}

fn parse_hex_colour(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Deserialize, Debug)]
struct WordFile {
    name: String,
    size: u32,
    words: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct LanguageFile {
    name: String,
    size: u32,
    languages: Vec<Language>,
}

fn embedded_str(file_name: &str) -> &'static str {
    DATA_DIR
        .get_file(file_name)
        .expect("Data file not found")
        .contents_utf8()
        .expect("Unable to interpret data file as a string")
}

/// The built-in candidate word list.
pub fn default_words() -> Vec<String> {
    let file: WordFile =
        from_str(embedded_str("words.json")).expect("Unable to deserialize word list json");
    log::debug!("loaded {} words from the {} list", file.size, file.name);
    file.words
}

/// The built-in language labels, in the order they are lost.
pub fn default_languages() -> Vec<Language> {
    let file: LanguageFile = from_str(embedded_str("languages.json"))
        .expect("Unable to deserialize language list json");
    log::debug!("loaded {} {} labels", file.size, file.name);
    file.languages
}

/// Parse a newline-delimited word list. Blank lines are skipped and words are
/// lowercased; validation happens when the list reaches [`WordBank::new`].
pub fn load_words_from_str(data: &str) -> Vec<String> {
    data.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let data = fs::read_to_string(path)?;
    Ok(load_words_from_str(&data))
}

pub(crate) fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase())
}

/// Candidate words, language labels and the generator that picks from them.
#[derive(Debug)]
pub struct WordBank {
    words: Vec<String>,
    languages: Vec<Language>,
    rng: StdRng,
}

impl WordBank {
    /// Validates the lists and seeds the generator. `None` seeds from entropy.
    pub fn new(words: Vec<String>, languages: Vec<Language>, seed: Option<u64>) -> GameResult<Self> {
        if words.is_empty() {
            return Err(GameError::EmptyWordList);
        }
        if languages.is_empty() {
            return Err(GameError::EmptyLabelList);
        }
        let words = words
            .into_iter()
            .map(|w| {
                let w = w.trim().to_string();
                if is_valid_word(&w) {
                    Ok(w)
                } else {
                    Err(GameError::InvalidWord(w))
                }
            })
            .collect::<GameResult<Vec<String>>>()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            words,
            languages,
            rng,
        })
    }

    /// Uniform pick from the word list.
    pub fn pick_random_word(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.words.len());
        self.words[idx].clone()
    }

    /// Farewell text for the language at `index`, with a randomly chosen template.
    pub fn farewell_for(&mut self, index: usize) -> GameResult<String> {
        let language = self
            .languages
            .get(index)
            .ok_or(GameError::IndexOutOfRange {
                index,
                len: self.languages.len(),
            })?;
        let template = FAREWELL_TEMPLATES[self.rng.gen_range(0..FAREWELL_TEMPLATES.len())];
        Ok(template.replace("{}", &language.name))
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn label_count(&self) -> usize {
        self.languages.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
