use serde::{Deserialize, Serialize};

/// Editor language labels understood by the client. Inferred once from the
/// file extension when a file is created; never re-derived afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
    Java,
    Cpp,
    Html,
    Plaintext,
}

impl Default for Language {
    fn default() -> Self {
        Language::Javascript
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Javascript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
            Language::Cpp => write!(f, "cpp"),
            Language::Html => write!(f, "html"),
            Language::Plaintext => write!(f, "plaintext"),
        }
    }
}

impl Language {
    /// Infer the language from the substring after the last `.` in the file
    /// name, lower-cased. Names without an extension fall back to plaintext.
    pub fn from_file_name(file_name: &str) -> Self {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => match ext.to_ascii_lowercase().as_str() {
                "js" => Language::Javascript,
                "py" => Language::Python,
                "java" => Language::Java,
                "cpp" => Language::Cpp,
                "html" => Language::Html,
                _ => Language::Plaintext,
            },
            None => Language::Plaintext,
        }
    }

    /// Starter contents a freshly created file of this language receives.
    pub fn template(self) -> &'static str {
        match self {
            Language::Javascript => "console.log('Hello, world!')",
            Language::Python => "def greet():\n    print(\"Hello!\")",
            Language::Java => {
                "public class Main {\npublic static void main(String[] args) {\nSystem.out.println(\"Hello, world!\");\n// You can call other methods here\ngreetUser(\"Alice\");\n}\n\npublic static void greetUser(String name) {\nSystem.out.println(\"Hello, \" + name + \"!\");\n}\n}"
            }
            Language::Cpp => {
                "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, world!\" << std::endl;\n    return 0;\n}"
            }
            Language::Html => {
                "<!DOCTYPE html>\n<html>\n  <body>\n    <h1>Hello!</h1>\n  </body>\n</html>"
            }
            Language::Plaintext => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(Language::from_file_name("a.js"), Language::Javascript);
        assert_eq!(Language::from_file_name("a.py"), Language::Python);
        assert_eq!(Language::from_file_name("Main.java"), Language::Java);
        assert_eq!(Language::from_file_name("a.cpp"), Language::Cpp);
        assert_eq!(Language::from_file_name("index.html"), Language::Html);
    }

    #[test]
    fn extension_match_is_lowercased() {
        assert_eq!(Language::from_file_name("A.PY"), Language::Python);
        assert_eq!(Language::from_file_name("a.Js"), Language::Javascript);
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(Language::from_file_name("a.unknownext"), Language::Plaintext);
        assert_eq!(Language::from_file_name("a"), Language::Plaintext);
        assert_eq!(Language::from_file_name("a."), Language::Plaintext);
        assert_eq!(Language::from_file_name(".env"), Language::Plaintext);
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(Language::from_file_name("archive.tar.py"), Language::Python);
    }

    #[test]
    fn wire_labels_match_client_strings() {
        assert_eq!(
            serde_json::to_string(&Language::Javascript).unwrap(),
            "\"javascript\""
        );
        assert_eq!(
            serde_json::to_string(&Language::Plaintext).unwrap(),
            "\"plaintext\""
        );
        let lang: Language = serde_json::from_str("\"python\"").unwrap();
        assert_eq!(lang, Language::Python);
    }

    #[test]
    fn templates_exist_for_code_languages() {
        assert!(!Language::Javascript.template().is_empty());
        assert!(!Language::Python.template().is_empty());
        assert!(Language::Plaintext.template().is_empty());
    }
}
