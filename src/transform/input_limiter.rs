//! Input length limiting transform.

use super::Transform;

/// Truncates input text to a fixed character budget.
#[derive(Debug)]
pub struct InputLimiter {
    limit: usize,
}

impl InputLimiter {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub(crate) fn from_arg(arg: Option<&str>) -> std::result::Result<Self, String> {
        let raw = arg.ok_or_else(|| "limit transform requires a character count".to_string())?;
        let limit = raw
            .parse()
            .map_err(|_| format!("invalid character count '{}'", raw))?;
        Ok(Self::new(limit))
    }
}

impl Transform for InputLimiter {
    fn name(&self) -> &str {
        "limit"
    }

    fn apply(&self, text: &str) -> String {
        match text.char_indices().nth(self.limit) {
            Some((index, _)) => text[..index].to_string(),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_long_text() {
        let limiter = InputLimiter::new(4);
        assert_eq!(limiter.apply("abcdefgh"), "abcd");
    }

    #[test]
    fn test_keeps_short_text() {
        let limiter = InputLimiter::new(100);
        assert_eq!(limiter.apply("short"), "short");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let limiter = InputLimiter::new(2);
        assert_eq!(limiter.apply("äöü"), "äö");
    }

    #[test]
    fn test_from_arg_requires_count() {
        assert!(InputLimiter::from_arg(None).is_err());
        assert!(InputLimiter::from_arg(Some("many")).is_err());
        assert!(InputLimiter::from_arg(Some("10")).is_ok());
    }
}
