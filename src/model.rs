use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A single shared file within a room. Serialized field names match what
/// the browser client renders (`fileName`, `code`, `language`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomFile {
    pub file_name: String,
    pub code: String,
    pub language: Language,
}

impl RoomFile {
    /// Build a fresh file: language inferred from the extension, contents
    /// seeded with that language's default template.
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let language = Language::from_file_name(&file_name);
        Self {
            code: language.template().to_string(),
            language,
            file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_infers_language_and_template() {
        let file = RoomFile::new("script.py");
        assert_eq!(file.language, Language::Python);
        assert_eq!(file.code, Language::Python.template());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let file = RoomFile::new("a.js");
        let v = serde_json::to_value(&file).unwrap();
        assert_eq!(v["fileName"], "a.js");
        assert_eq!(v["language"], "javascript");
        assert!(v.get("file_name").is_none());
    }
}
