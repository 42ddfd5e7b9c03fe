//! Text analyzers for tokenizing project input.
//!
//! Analyzers are resolved from a specification string such as `simple`
//! or `simple(2)` through `get_analyzer`. Factory errors are plain
//! strings; the owning project turns them into configuration errors
//! carrying the project id.

mod simple;

pub use simple::{SimpleAnalyzer, WhitespaceAnalyzer};

use crate::util::parse_spec;

/// A language analyzer splitting text into sentences and word tokens.
pub trait Analyzer: std::fmt::Debug {
    fn name(&self) -> &str;

    /// Split text into normalized word tokens.
    fn tokenize_words(&self, text: &str) -> Vec<String>;

    /// Split text into sentences.
    fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        text.split_inclusive(['.', '!', '?'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Resolve an analyzer specification into an analyzer instance.
pub fn get_analyzer(spec: &str) -> std::result::Result<Box<dyn Analyzer>, String> {
    let (name, arg) = parse_spec(spec)
        .ok_or_else(|| format!("invalid analyzer specification '{}'", spec))?;
    match name.as_str() {
        "simple" => {
            let min_token_length = match arg {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| format!("invalid minimum token length '{}'", raw))?,
                None => simple::MIN_TOKEN_LENGTH,
            };
            Ok(Box::new(SimpleAnalyzer::new(min_token_length)))
        }
        "whitespace" => Ok(Box::new(WhitespaceAnalyzer)),
        other => Err(format!("no analyzer called '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_analyzer_simple() {
        let analyzer = get_analyzer("simple").unwrap();
        assert_eq!(analyzer.name(), "simple");
    }

    #[test]
    fn test_get_analyzer_with_arg() {
        let analyzer = get_analyzer("simple(2)").unwrap();
        assert_eq!(analyzer.tokenize_words("an ox ate it"), vec!["an", "ox", "ate", "it"]);
    }

    #[test]
    fn test_get_analyzer_bad_arg() {
        assert!(get_analyzer("simple(lots)").is_err());
    }

    #[test]
    fn test_get_analyzer_unknown() {
        let err = get_analyzer("voikko(fi)").unwrap_err();
        assert!(err.contains("voikko"));
    }

    #[test]
    fn test_tokenize_sentences_default() {
        let analyzer = get_analyzer("simple").unwrap();
        let sentences = analyzer.tokenize_sentences("First one. Second one! Third?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "First one.");
    }
}
