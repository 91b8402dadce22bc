use crate::app::models::ParsedFile;
use regex::Regex;
use std::sync::LazyLock;

/// Turns raw text into the file blocks it carries.
pub trait ContentParser {
    fn parse(&self, content: &str) -> Vec<ParsedFile>;
}

/// Block format:
///
/// ```text
/// ---FILE_PATH: path/to/file.ext
/// ```lang
/// file content
/// ```
/// ---END_FILE
/// ```
static FILE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---FILE_PATH:\s*(.*?)\s*\n```(?:\w*\n)?(.*?)```\s*\n---END_FILE")
        .expect("file block pattern is valid")
});

/// Parser for file blocks emitted in LLM prompt output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptOutputParser;

impl ContentParser for PromptOutputParser {
    fn parse(&self, content: &str) -> Vec<ParsedFile> {
        FILE_BLOCK
            .captures_iter(content)
            .map(|caps| ParsedFile {
                path: caps[1].trim().to_string(),
                content: caps[2].to_string(),
            })
            .collect()
    }
}

/// Returns the parser registered under `kind`, falling back to the prompt parser.
pub fn get_parser(kind: &str) -> Box<dyn ContentParser> {
    match kind {
        "prompt" => Box::new(PromptOutputParser),
        other => {
            log::debug!("Unknown parser kind {other:?}, using prompt parser");
            Box::new(PromptOutputParser)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_blocks_with_language_tags() {
        let input = indoc! {r#"
            ---FILE_PATH: src/main.js
            ```javascript
            console.log('Hello World');
            ```
            ---END_FILE

            ---FILE_PATH: src/styles.css
            ```css
            body {
                font-family: sans-serif;
            }
            ```
            ---END_FILE
        "#};

        let files = PromptOutputParser.parse(input);

        assert_eq!(
            files,
            vec![
                ParsedFile {
                    path: "src/main.js".into(),
                    content: "console.log('Hello World');\n".into(),
                },
                ParsedFile {
                    path: "src/styles.css".into(),
                    content: "body {\n    font-family: sans-serif;\n}\n".into(),
                },
            ]
        );
    }

    #[test]
    fn language_tag_is_optional() {
        let input = indoc! {"
            ---FILE_PATH:   notes.txt
            ```
            plain
            ```
            ---END_FILE
        "};

        let files = get_parser("prompt").parse(input);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "notes.txt");
        assert_eq!(files[0].content, "plain\n");
    }

    #[test]
    fn text_outside_blocks_is_ignored() {
        let input = indoc! {"
            Here is the change you asked for.

            ---FILE_PATH: a.rs
            ```rust
            fn a() {}
            ```
            ---END_FILE

            Unterminated:
            ---FILE_PATH: b.rs
            ```rust
            fn b() {}
        "};

        let files = get_parser("anything").parse(input);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.rs");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(PromptOutputParser.parse("").is_empty());
    }
}
