use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::from_str;

use crate::error::{KeycoachError, Result};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(name: &str) -> Result<Self> {
        read_asset(&format!("{name}.json"))
    }

    /// `num` words drawn with replacement
    pub fn get_random(&self, num: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();

        (0..num)
            .filter_map(|_| self.words.choose(&mut rng).cloned())
            .collect()
    }
}

pub(crate) fn read_asset<T: DeserializeOwned>(file_name: &str) -> Result<T> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| KeycoachError::MissingAsset(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| KeycoachError::MissingAsset(format!("{file_name} is not utf-8")))?;

    Ok(from_str(file_as_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_load() {
        let lang = Language::load("english").unwrap();

        assert_eq!(lang.name, "english");
        assert_eq!(lang.size as usize, lang.words.len());
        assert!(lang.words.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn test_get_random_allows_more_than_vocabulary() {
        let lang = Language {
            name: "tiny".to_string(),
            size: 2,
            words: vec!["hello".to_string(), "world".to_string()],
        };

        let words = lang.get_random(7);

        assert_eq!(words.len(), 7);
        assert!(words.iter().all(|w| lang.words.contains(w)));
    }

    #[test]
    fn test_missing_asset() {
        let err = Language::load("klingon").unwrap_err();
        assert!(matches!(err, KeycoachError::MissingAsset(_)));
    }

    #[test]
    fn test_language_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let lang: Language = from_str(json_data).expect("Failed to deserialize test language");

        assert_eq!(lang.name, "test");
        assert_eq!(lang.words.len(), 3);
    }
}
