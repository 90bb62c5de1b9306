use std::fmt;

/// Symbol characters that always form a token of their own.
pub const DEFAULT_SYMBOLS: &[char] = &[
    ',', ';', '(', ')', '[', ']', '{', '}', '&', '|', '=', '<', '>', '!', '~', '+', '-', '/', '*',
];

/// A lexeme and its byte span in the source text. Matching compares `text` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    start: usize,
    end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self { text, start, end }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug)]
pub struct TokenBuilder {
    text: String,
    start: usize,
}

impl TokenBuilder {
    pub fn new(start: usize) -> Self {
        Self {
            text: String::new(),
            start,
        }
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn finish(self) -> Token {
        Token::new(self.text, self.start)
    }
}

/// Per-language hooks for comment and quote detection.
///
/// `comment_start` and `comment_end` look at the unread remainder of the source and return the
/// number of bytes the marker occupies. Everything between the markers is dropped.
pub trait LanguageRules {
    fn comment_start(&self, rest: &str) -> Option<(&'static str, usize)>;

    fn comment_end(&self, rest: &str, terminator: &str) -> Option<usize> {
        rest.starts_with(terminator).then_some(terminator.len())
    }

    fn quote_start(&self, c: char) -> Option<char>;

    fn quote_end(&self, c: char, terminator: char) -> bool {
        c == terminator
    }

    fn is_separator(&self, c: char) -> bool {
        c.is_whitespace()
    }

    fn is_symbol(&self, c: char) -> bool {
        DEFAULT_SYMBOLS.contains(&c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// `//` and `/* */` comments, `"` and `'` literals.
    #[default]
    CLike,
    /// `#` line comments (shell, Python, Ruby, ...).
    Hash,
    /// No comments, no literals.
    Plain,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyw" | "sh" | "bash" | "zsh" | "rb" | "pl" | "r" | "yaml" | "yml" | "toml"
            | "cmake" | "mk" => Language::Hash,
            "txt" | "md" | "rst" => Language::Plain,
            _ => Language::CLike,
        }
    }
}

impl LanguageRules for Language {
    fn comment_start(&self, rest: &str) -> Option<(&'static str, usize)> {
        match self {
            Language::CLike => {
                if rest.starts_with("//") {
                    Some(("\n", 2))
                } else if rest.starts_with("/*") {
                    Some(("*/", 2))
                } else {
                    None
                }
            }
            Language::Hash => rest.starts_with('#').then_some(("\n", 1)),
            Language::Plain => None,
        }
    }

    fn quote_start(&self, c: char) -> Option<char> {
        match self {
            Language::CLike | Language::Hash => matches!(c, '"' | '\'').then_some(c),
            Language::Plain => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    language: Language,
}

impl Tokenizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn split(&self, text: &str) -> Vec<Token> {
        split_with(&self.language, text)
    }
}

pub fn split_with<R: LanguageRules + ?Sized>(rules: &R, text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<TokenBuilder> = None;
    let mut comment: Option<&'static str> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let flush = |current: &mut Option<TokenBuilder>, tokens: &mut Vec<Token>| {
        if let Some(builder) = current.take() {
            tokens.push(builder.finish());
        }
    };

    let mut pos = 0usize;
    while let Some(c) = text[pos..].chars().next() {
        let width = c.len_utf8();
        let rest = &text[pos..];

        if let Some(terminator) = comment {
            match rules.comment_end(rest, terminator) {
                Some(n) => {
                    comment = None;
                    pos += n;
                }
                None => pos += width,
            }
            continue;
        }

        if let Some(terminator) = quote {
            if let Some(builder) = current.as_mut() {
                builder.push(c);
            }
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if rules.quote_end(c, terminator) {
                quote = None;
                flush(&mut current, &mut tokens);
            }
            pos += width;
            continue;
        }

        if let Some((terminator, n)) = rules.comment_start(rest) {
            flush(&mut current, &mut tokens);
            comment = Some(terminator);
            pos += n;
            continue;
        }

        if let Some(terminator) = rules.quote_start(c) {
            flush(&mut current, &mut tokens);
            let mut builder = TokenBuilder::new(pos);
            builder.push(c);
            current = Some(builder);
            quote = Some(terminator);
            pos += width;
            continue;
        }

        if rules.is_separator(c) {
            flush(&mut current, &mut tokens);
        } else if rules.is_symbol(c) {
            flush(&mut current, &mut tokens);
            let mut builder = TokenBuilder::new(pos);
            builder.push(c);
            tokens.push(builder.finish());
        } else {
            current.get_or_insert_with(|| TokenBuilder::new(pos)).push(c);
        }
        pos += width;
    }

    flush(&mut current, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn splits_on_whitespace_and_symbols() {
        let tokens = Tokenizer::default().split("int main(void) {\n\treturn a+b;\n}");
        assert_eq!(
            texts(&tokens),
            vec!["int", "main", "(", "void", ")", "{", "return", "a", "+", "b", ";", "}"]
        );
    }

    #[test]
    fn records_byte_offsets() {
        let src = "let  xy=1;";
        let tokens = Tokenizer::default().split(src);
        let xy = &tokens[1];
        assert_eq!(xy.text(), "xy");
        assert_eq!((xy.start(), xy.end(), xy.len()), (5, 7, 2));
        for t in &tokens {
            assert_eq!(&src[t.start()..t.end()], t.text());
        }
    }

    #[test]
    fn drops_c_like_comments() {
        let src = "a // line comment ( ;\nb /* block\n comment */ c";
        let tokens = Tokenizer::new(Language::CLike).split(src);
        assert_eq!(texts(&tokens), vec!["a", "b", "c"]);
    }

    #[test]
    fn comment_marker_ends_the_current_token() {
        let tokens = Tokenizer::new(Language::CLike).split("a/*x*/b");
        assert_eq!(texts(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn quoted_literal_is_one_token() {
        let src = r#"puts("a b; \" c") + 'x'"#;
        let tokens = Tokenizer::new(Language::CLike).split(src);
        assert_eq!(
            texts(&tokens),
            vec!["puts", "(", r#""a b; \" c""#, ")", "+", "'x'"]
        );
    }

    #[test]
    fn comment_markers_inside_quotes_are_kept() {
        let tokens = Tokenizer::new(Language::CLike).split(r#"s = "http://x" ;"#);
        assert_eq!(texts(&tokens), vec!["s", "=", r#""http://x""#, ";"]);
    }

    #[test]
    fn hash_language_uses_hash_comments() {
        let src = "x = 1 # set x\ny = x // 2";
        let tokens = Tokenizer::new(Language::Hash).split(src);
        assert_eq!(
            texts(&tokens),
            vec!["x", "=", "1", "y", "=", "x", "/", "/", "2"]
        );
    }

    #[test]
    fn plain_language_keeps_everything() {
        let tokens = Tokenizer::new(Language::Plain).split("it's # not // a comment");
        assert_eq!(
            texts(&tokens),
            vec!["it's", "#", "not", "/", "/", "a", "comment"]
        );
    }

    #[test]
    fn unterminated_comment_and_quote_do_not_panic() {
        assert_eq!(texts(&Tokenizer::default().split("a /* never closed")), vec!["a"]);
        assert_eq!(
            texts(&Tokenizer::default().split("a \"open")),
            vec!["a", "\"open"]
        );
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("c"), Language::CLike);
        assert_eq!(Language::from_extension("PY"), Language::Hash);
        assert_eq!(Language::from_extension("txt"), Language::Plain);
        assert_eq!(Language::from_extension("unknown"), Language::CLike);
    }

    #[test]
    fn handles_multibyte_text() {
        let src = "größe = 1;";
        let tokens = Tokenizer::default().split(src);
        assert_eq!(texts(&tokens), vec!["größe", "=", "1", ";"]);
        assert_eq!(tokens[0].len(), "größe".len());
    }
}
