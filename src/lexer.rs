use crate::ast::tokens::{Token, TokenKind};

pub use crate::ast::tokens::Position;

/// Errors produced while tokenizing source text.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// A character that cannot start any token
    UnexpectedChar { character: char, position: Position },
    /// A string literal missing its closing quote
    UnterminatedString { position: Position },
    /// An unknown backslash escape inside a string literal
    InvalidEscape { character: char, position: Position },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedChar {
                character,
                position,
            } => write!(f, "{}: unexpected character '{}'", position, character),
            LexError::UnterminatedString { position } => {
                write!(f, "{}: unterminated string literal", position)
            }
            LexError::InvalidEscape {
                character,
                position,
            } => write!(f, "{}: invalid escape sequence '\\{}'", position, character),
        }
    }
}

impl std::error::Error for LexError {}

/// Pull-based tokenizer for filter and custom-property sources.
///
/// Holds no state beyond the scan position; after the input is exhausted
/// every further call yields [`TokenKind::Eof`].
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }

    fn pos(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.pos();
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_pos = self.pos();
                    self.advance(); // consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                character: ch,
                                position: escape_pos,
                            });
                        }
                        None => {
                            return Err(LexError::UnterminatedString { position: start });
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> TokenKind {
        let mut number = String::new();
        let mut is_decimal = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_decimal
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_decimal = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Digits only, so the parse cannot fail.
        TokenKind::Number(number.parse::<f64>().unwrap_or(0.0))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let position = self.pos();

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some('[') => {
                self.advance();
                TokenKind::LBracket
            }
            Some(']') => {
                self.advance();
                TokenKind::RBracket
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('.') => {
                self.advance();
                TokenKind::Dot
            }
            Some('+') => {
                self.advance();
                TokenKind::Plus
            }
            Some('-') => {
                self.advance();
                TokenKind::Minus
            }
            Some('*') => {
                self.advance();
                TokenKind::Star
            }
            Some('/') => {
                self.advance();
                TokenKind::Slash
            }
            Some('~') => {
                self.advance();
                TokenKind::Tilde
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::EqEq
                } else if self.peek_char(1) == Some('~') {
                    self.advance();
                    self.advance();
                    TokenKind::EqTilde
                } else {
                    return Err(LexError::UnexpectedChar {
                        character: '=',
                        position,
                    });
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(LexError::UnexpectedChar {
                        character: '!',
                        position,
                    });
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::LtEq
                } else {
                    self.advance();
                    TokenKind::Lt
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::GtEq
                } else {
                    self.advance();
                    TokenKind::Gt
                }
            }
            Some('"') => TokenKind::String(self.read_string('"')?),
            Some('\'') => TokenKind::String(self.read_string('\'')?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "in" => TokenKind::In,
                    "if" => TokenKind::If,
                    "then" => TokenKind::Then,
                    "else" => TokenKind::Else,
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    "null" => TokenKind::Null,
                    _ => TokenKind::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    character: ch,
                    position,
                });
            }
        };

        Ok(Token { kind, position })
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not in if then else true false null");
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            break;
        }
        kinds.push(token.kind);
    }
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::In,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::Boolean(true),
            TokenKind::Boolean(false),
            TokenKind::Null,
        ]
    );
}

#[test]
fn test_match_operators() {
    let mut lexer = Lexer::new("name =~ 'x.*' ~");
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("name".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EqTilde);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::String("x.*".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Tilde);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
