use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::tokenize::{Token, Tokenizer};

/// One source file, tokenized once and then shared read-only between comparisons.
#[derive(Debug, Clone)]
pub struct Submission {
    path: Arc<str>,
    tokens: Vec<Token>,
}

impl Submission {
    pub fn from_tokens(path: impl Into<Arc<str>>, tokens: Vec<Token>) -> Self {
        Self {
            path: path.into(),
            tokens,
        }
    }

    pub fn from_source(path: impl Into<Arc<str>>, source: &str, tokenizer: &Tokenizer) -> Self {
        Self::from_tokens(path, tokenizer.split(source))
    }

    pub fn parse(path: &Path, tokenizer: &Tokenizer) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_source(
            path.to_string_lossy().as_ref(),
            &text,
            tokenizer,
        ))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_arc(&self) -> Arc<str> {
        Arc::clone(&self.path)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn extension(&self) -> Option<&str> {
        Path::new(self.path.as_ref())
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

impl PartialEq for Submission {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Submission {}

impl Hash for Submission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_path() {
        let tokenizer = Tokenizer::default();
        let a = Submission::from_source("x/a.c", "int a;", &tokenizer);
        let b = Submission::from_source("x/a.c", "float b = 2;", &tokenizer);
        let c = Submission::from_source("x/c.c", "int a;", &tokenizer);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 3);
        assert_eq!(a.extension(), Some("c"));
    }

    #[test]
    fn parse_reads_file_with_lossy_utf8() -> io::Result<()> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("plagcheck-core-parse-{nanos}.c"));
        fs::write(&path, b"int \xff x;")?;

        let s = Submission::parse(&path, &Tokenizer::default())?;
        let texts: Vec<&str> = s.tokens().iter().map(Token::text).collect();
        assert_eq!(texts, vec!["int", "\u{fffd}", "x", ";"]);
        Ok(())
    }

    #[test]
    fn empty_source_has_no_tokens() {
        let s = Submission::from_source("empty.c", "  // nothing here\n", &Tokenizer::default());
        assert!(s.is_empty());
    }
}
