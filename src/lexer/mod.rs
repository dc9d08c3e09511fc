//! Lexer and comment filter (§4.2): character stream -> token stream.
mod token;

pub use token::{Token, TokenKind};

use once_cell::sync::Lazy;

use crate::error::{PipelineError, PipelineErrorKind, Position};
use crate::reader::{Reader, EOT};

/// Guards against pathological inputs exhausting memory; also matches the
/// "long-token guards" the spec calls for.
pub const MAX_IDENTIFIER_SIZE: usize = 256;
pub const MAX_STRING_SIZE: usize = 4096;
pub const MAX_COMMENT_SIZE: usize = 4096;

type Op = (&'static str, TokenKind);

/// Every multi-char operator/punctuation lexeme, longest first, so a
/// greedy left-to-right scan implements the longest-match rule without
/// needing to special-case individual prefixes.
static OPERATORS: Lazy<Vec<Op>> = Lazy::new(|| {
    use TokenKind::*;
    let mut ops: Vec<Op> = vec![
        ("===", Identical),
        ("!==", NotIdentical),
        ("==", EqEq),
        ("!=", NotEq),
        ("->", Arrow),
        ("//", FloorDiv),
        ("**", Pow),
        (">=", GreaterEq),
        ("<=", LessEq),
        ("{", LBrace),
        ("}", RBrace),
        (";", Semicolon),
        ("(", LParen),
        (")", RParen),
        (",", Comma),
        ("$", Dollar),
        ("[", LBracket),
        ("]", RBracket),
        ("=", Assign),
        (".", Dot),
        ("!", Bang),
        ("@", At),
        (">", Greater),
        ("<", Less),
        ("+", Plus),
        ("-", Minus),
        ("*", Star),
        ("/", Slash),
        ("%", Percent),
    ];
    ops.sort_by_key(|(lexeme, _)| std::cmp::Reverse(lexeme.len()));
    ops
});

fn keyword(identifier: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match identifier {
        "include" => Include,
        "struct" => Struct,
        "variant" => Variant,
        "func" => Func,
        "continue" => Continue,
        "break" => Break,
        "return" => Return,
        "if" => If,
        "elif" => Elif,
        "else" => Else,
        "while" => While,
        "do" => Do,
        "is" => Is,
        "or" => Or,
        "xor" => Xor,
        "and" => And,
        "not" => Not,
        "int" => KwInt,
        "float" => KwFloat,
        "bool" => KwBool,
        "str" => KwStr,
        "true" => True,
        "false" => False,
        _ => return None,
    })
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '\'' || c == '_' || c.is_alphanumeric()
}

pub struct Lexer<'a> {
    reader: Reader<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: impl Into<String>) -> Result<Self, PipelineError> {
        Ok(Lexer {
            reader: Reader::new(source, file)?,
            done: false,
        })
    }

    fn file(&self) -> String {
        self.reader.file().to_owned()
    }

    fn err(&self, kind: PipelineErrorKind, message: impl Into<String>, position: Position) -> PipelineError {
        PipelineError::new(kind, message, self.file(), position)
    }

    fn skip_whitespace(&mut self) -> Result<(), PipelineError> {
        while self.reader.current().is_whitespace() {
            self.reader.advance()?;
        }
        Ok(())
    }

    /// Produces the next token. Once `TokenKind::Eot` has been produced,
    /// every subsequent call returns it again (§4.2).
    pub fn next_token(&mut self) -> Result<Token, PipelineError> {
        if self.done {
            return Ok(Token::new(TokenKind::Eot, self.reader.position()));
        }

        self.skip_whitespace()?;

        let position = self.reader.position();
        let current = self.reader.current();

        if current == EOT {
            self.done = true;
            return Ok(Token::new(TokenKind::Eot, position));
        }

        if is_identifier_start(current) {
            return self.lex_identifier(position);
        }

        if current.is_ascii_digit() {
            return self.lex_number(position);
        }

        if current == '"' {
            return self.lex_string(position);
        }

        if current == '#' {
            return self.lex_comment(position);
        }

        self.lex_operator(position)
    }

    fn lex_identifier(&mut self, position: Position) -> Result<Token, PipelineError> {
        let mut text = String::new();
        while is_identifier_continue(self.reader.current()) {
            text.push(self.reader.current());
            if text.len() > MAX_IDENTIFIER_SIZE {
                return Err(self.err(PipelineErrorKind::IdentifierTooLong, format!("Identifier exceeds maximum length of {MAX_IDENTIFIER_SIZE}"), position));
            }
            self.reader.advance()?;
        }

        let kind = keyword(&text).unwrap_or(TokenKind::Identifier(text));
        Ok(Token::new(kind, position))
    }

    fn read_digits(&mut self) -> Result<String, PipelineError> {
        let mut digits = String::new();
        while self.reader.current().is_ascii_digit() {
            digits.push(self.reader.current());
            self.reader.advance()?;
        }
        Ok(digits)
    }

    fn lex_number(&mut self, position: Position) -> Result<Token, PipelineError> {
        let int_part = self.read_digits()?;

        if int_part.len() > 1 && int_part.starts_with('0') {
            return Err(self.err(PipelineErrorKind::IntWithLeadingZero, "Integer literal has a leading zero", position));
        }

        if self.reader.current() != '.' {
            let value: i32 = int_part
                .parse()
                .map_err(|_| self.err(PipelineErrorKind::IntTooLarge, format!("Integer literal {int_part} exceeds the 32-bit signed range"), position))?;
            return Ok(Token::new(TokenKind::IntLiteral(value), position));
        }

        self.reader.advance()?; // consume '.'
        let frac_part = self.read_digits()?;

        let mut text = format!("{int_part}.{frac_part}");

        if self.reader.current() == 'e' || self.reader.current() == 'E' {
            text.push(self.reader.current());
            self.reader.advance()?;
            if self.reader.current() == '+' || self.reader.current() == '-' {
                text.push(self.reader.current());
                self.reader.advance()?;
            }
            let exponent_digits = self.read_digits()?;
            if exponent_digits.is_empty() {
                return Err(self.err(PipelineErrorKind::InvalidExponent, "Float literal exponent has no digits", position));
            }
            text.push_str(&exponent_digits);
        }

        let value: f64 = text
            .parse()
            .map_err(|_| self.err(PipelineErrorKind::IntTooLarge, format!("Float literal {text} cannot be represented"), position))?;
        Ok(Token::new(TokenKind::FloatLiteral(value), position))
    }

    fn lex_string(&mut self, position: Position) -> Result<Token, PipelineError> {
        self.reader.advance()?; // consume opening quote
        let mut value = String::new();

        loop {
            let current = self.reader.current();
            if current == EOT {
                return Err(self.err(PipelineErrorKind::UnterminatedString, "String literal is missing its closing quote", position));
            }
            if current == '\n' {
                return Err(self.err(PipelineErrorKind::NewlineInString, "String literal contains a raw newline", position));
            }
            if current == '"' {
                self.reader.advance()?;
                break;
            }
            if current == '\\' {
                self.reader.advance()?;
                let escape_pos = self.reader.position();
                match self.reader.current() {
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    'x' => {
                        self.reader.advance()?;
                        let mut hex = String::new();
                        for _ in 0..2 {
                            hex.push(self.reader.current());
                            self.reader.advance()?;
                        }
                        let byte = u8::from_str_radix(&hex, 16)
                            .map_err(|_| self.err(PipelineErrorKind::InvalidHexChar, format!("Invalid hex escape '\\x{hex}'"), escape_pos))?;
                        value.push(byte as char);
                        continue;
                    }
                    other => return Err(self.err(PipelineErrorKind::UnknownEscape, format!("Unknown escape sequence '\\{other}'"), escape_pos)),
                }
                self.reader.advance()?;
                continue;
            }
            value.push(current);
            self.reader.advance()?;
            if value.len() > MAX_STRING_SIZE {
                return Err(self.err(PipelineErrorKind::StringTooLong, format!("String literal exceeds maximum length of {MAX_STRING_SIZE}"), position));
            }
        }

        Ok(Token::new(TokenKind::StrLiteral(value), position))
    }

    fn lex_comment(&mut self, position: Position) -> Result<Token, PipelineError> {
        self.reader.advance()?; // consume '#'
        let mut text = String::new();
        while self.reader.current() != '\n' && self.reader.current() != EOT {
            text.push(self.reader.current());
            self.reader.advance()?;
            if text.len() > MAX_COMMENT_SIZE {
                return Err(self.err(PipelineErrorKind::CommentTooLong, format!("Comment exceeds maximum length of {MAX_COMMENT_SIZE}"), position));
            }
        }
        Ok(Token::new(TokenKind::Comment(text), position))
    }

    /// Greedily grows a candidate lexeme one character at a time, so long as
    /// some operator still starts with it, remembering the longest complete
    /// match seen. Every extension is a strict growth of the previous
    /// candidate, so nothing ever needs to be rolled back.
    fn lex_operator(&mut self, position: Position) -> Result<Token, PipelineError> {
        let mut candidate = String::new();
        let mut best: Option<TokenKind> = None;
        let mut lookahead = self.reader.current();

        loop {
            if lookahead == EOT {
                break;
            }
            let mut extended = candidate.clone();
            extended.push(lookahead);

            let has_match = OPERATORS.iter().any(|(lexeme, _)| *lexeme == extended);
            let has_longer_prefix = OPERATORS.iter().any(|(lexeme, _)| lexeme.starts_with(&extended));

            if !has_longer_prefix {
                break;
            }

            candidate = extended;
            self.reader.advance()?;
            lookahead = self.reader.current();

            if has_match {
                best = OPERATORS.iter().find(|(lexeme, _)| *lexeme == candidate).map(|(_, kind)| kind.clone());
            }
        }

        match best {
            Some(kind) => Ok(Token::new(kind, position)),
            None => Err(self.err(PipelineErrorKind::UnknownToken, format!("Unrecognized token starting with '{current}'", current = self.reader.current()), position)),
        }
    }
}

/// Thin decorator over [`Lexer`] that strips `Comment` tokens before they
/// reach the parser, matching the reader -> lexer -> comment filter -> parser
/// data flow (§2).
pub struct CommentFilter<'a> {
    lexer: Lexer<'a>,
}

impl<'a> CommentFilter<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        CommentFilter { lexer }
    }

    pub fn next_token(&mut self) -> Result<Token, PipelineError> {
        loop {
            let token = self.lexer.next_token()?;
            if !matches!(token.kind, TokenKind::Comment(_)) {
                return Ok(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let lexer = Lexer::new(source, "test").unwrap();
        let mut filter = CommentFilter::new(lexer);
        let mut tokens = vec![];
        loop {
            let token = filter.next_token().unwrap();
            let done = token.kind == TokenKind::Eot;
            tokens.push(token.kind);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn longest_match_for_operators() {
        assert_eq!(lex_all("==="), vec![TokenKind::Identical, TokenKind::Eot]);
        assert_eq!(lex_all("!=="), vec![TokenKind::NotIdentical, TokenKind::Eot]);
        assert_eq!(lex_all("=="), vec![TokenKind::EqEq, TokenKind::Eot]);
        assert_eq!(lex_all("!="), vec![TokenKind::NotEq, TokenKind::Eot]);
        assert_eq!(lex_all("//"), vec![TokenKind::FloorDiv, TokenKind::Eot]);
        assert_eq!(lex_all("/"), vec![TokenKind::Slash, TokenKind::Eot]);
        assert_eq!(lex_all("**"), vec![TokenKind::Pow, TokenKind::Eot]);
        assert_eq!(lex_all("*"), vec![TokenKind::Star, TokenKind::Eot]);
        assert_eq!(lex_all("->"), vec![TokenKind::Arrow, TokenKind::Eot]);
        assert_eq!(lex_all("-"), vec![TokenKind::Minus, TokenKind::Eot]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(lex_all("func"), vec![TokenKind::Func, TokenKind::Eot]);
        assert_eq!(
            lex_all("func_"),
            vec![TokenKind::Identifier("func_".into()), TokenKind::Eot]
        );
        assert_eq!(
            lex_all("foo'bar"),
            vec![TokenKind::Identifier("foo'bar".into()), TokenKind::Eot]
        );
    }

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(lex_all("0"), vec![TokenKind::IntLiteral(0), TokenKind::Eot]);
        assert_eq!(lex_all("1337"), vec![TokenKind::IntLiteral(1337), TokenKind::Eot]);
        assert_eq!(lex_all("3.14"), vec![TokenKind::FloatLiteral(3.14), TokenKind::Eot]);
        assert_eq!(lex_all("2.5e-1"), vec![TokenKind::FloatLiteral(0.25), TokenKind::Eot]);
    }

    #[test]
    fn leading_zero_is_rejected() {
        let lexer = Lexer::new("007", "test").unwrap();
        let mut filter = CommentFilter::new(lexer);
        let err = filter.next_token().unwrap_err();
        assert_eq!(err.kind, PipelineErrorKind::IntWithLeadingZero);
    }

    #[test]
    fn string_literal_with_escapes() {
        assert_eq!(
            lex_all(r#""a\nb\x41""#),
            vec![TokenKind::StrLiteral("a\nbA".into()), TokenKind::Eot]
        );
    }

    #[test]
    fn unterminated_string_fails() {
        let lexer = Lexer::new("\"abc", "test").unwrap();
        let mut filter = CommentFilter::new(lexer);
        let err = filter.next_token().unwrap_err();
        assert_eq!(err.kind, PipelineErrorKind::UnterminatedString);
    }

    #[test]
    fn comments_are_stripped() {
        assert_eq!(
            lex_all("1 # a comment\n2"),
            vec![TokenKind::IntLiteral(1), TokenKind::IntLiteral(2), TokenKind::Eot]
        );
    }

    #[test]
    fn eot_is_idempotent() {
        let lexer = Lexer::new("", "test").unwrap();
        let mut filter = CommentFilter::new(lexer);
        assert_eq!(filter.next_token().unwrap().kind, TokenKind::Eot);
        assert_eq!(filter.next_token().unwrap().kind, TokenKind::Eot);
    }
}
