use std::mem;

use crate::ast::{BinOp, Expr, Path, Position, TokenKind, UnaryOp};
use crate::ast::tokens::Token;
use crate::lexer::{LexError, Lexer};
use crate::property::{CustomProperty, PropertyType};
use crate::value::Value;

/// A syntax error: where it happened, what the grammar expected, and what
/// was found instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub position: Position,
    pub expected: String,
    pub found: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.position, self.expected, self.found
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::UnexpectedChar {
                character,
                position,
            } => ParseError {
                position,
                expected: "a token".to_string(),
                found: format!("character '{}'", character),
            },
            LexError::UnterminatedString { position } => ParseError {
                position,
                expected: "a closing quote".to_string(),
                found: "end of input".to_string(),
            },
            LexError::InvalidEscape {
                character,
                position,
            } => ParseError {
                position,
                expected: "a valid escape sequence".to_string(),
                found: format!("'\\{}'", character),
            },
        }
    }
}

/// Recursive-descent parser over the token stream.
///
/// Lookahead state (`current`) is local to one parse call; the produced
/// tree carries none of it. Precedence, lowest to highest: conditional,
/// `or`, `and`, `not`, comparison, additive, multiplicative, unary minus,
/// atoms.
pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if !self.check(&kind) {
            return Err(self.unexpected(kind.describe()));
        }
        self.advance()
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            position: self.current.position,
            expected: expected.into(),
            found: self.current.kind.describe(),
        }
    }

    /// Parse one complete expression; anything left over is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::If) {
            return self.parse_conditional();
        }
        self.parse_or()
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // consume 'if'
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.parse_expression()?;
        self.expect(TokenKind::Else)?;
        let else_branch = self.parse_expression()?;

        Ok(Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            self.advance()?;
            let right = self.parse_and()?;

            left = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        while self.check(&TokenKind::And) {
            self.advance()?;
            let right = self.parse_not()?;

            left = Expr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Not) {
            self.advance()?;
            let operand = self.parse_not()?; // right-associative
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        // `x not in [...]` sugar for `not (x in [...])`
        if self.check(&TokenKind::Not) {
            self.advance()?;
            self.expect(TokenKind::In)?;
            let right = self.parse_additive()?;

            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(Expr::Binary {
                    op: BinOp::In,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
            });
        }

        if let Some(op) = match &self.current.kind {
            TokenKind::EqEq => Some(BinOp::Equal),
            TokenKind::NotEq => Some(BinOp::NotEqual),
            TokenKind::Lt => Some(BinOp::LessThan),
            TokenKind::Gt => Some(BinOp::GreaterThan),
            TokenKind::LtEq => Some(BinOp::LessEqual),
            TokenKind::GtEq => Some(BinOp::GreaterEqual),
            TokenKind::EqTilde => Some(BinOp::Matches),
            TokenKind::Tilde => Some(BinOp::MatchesGlob),
            TokenKind::In => Some(BinOp::In),
            _ => None,
        } {
            self.advance()?;
            let right = self.parse_additive()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinOp::Multiply,
                TokenKind::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Minus) {
            self.advance()?;
            let operand = self.parse_unary()?; // right-associative

            // Fold the sign into number literals so `-1.5` stays a literal.
            if let Expr::Literal(Value::Number(n)) = operand {
                return Ok(Expr::Literal(Value::Number(-n)));
            }
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    /// Parse atoms: literals, list literals, parenthesized expressions,
    /// function calls, and dotted paths.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current.kind, TokenKind::Eof) {
            // Literals
            TokenKind::Number(n) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Number(n)))
            }
            TokenKind::String(s) => {
                self.advance()?;
                Ok(Expr::Literal(Value::String(s)))
            }
            TokenKind::Boolean(b) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Boolean(b)))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(Expr::Literal(Value::Null))
            }

            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            TokenKind::LBracket => {
                self.advance()?;
                self.parse_list_literal()
            }

            TokenKind::Identifier(name) => {
                self.advance()?;
                self.parse_path_or_call(name)
            }

            kind => Err(ParseError {
                position: self.current.position,
                expected: "an expression".to_string(),
                found: kind.describe(),
            }),
        }
    }

    fn parse_list_literal(&mut self) -> Result<Expr, ParseError> {
        let mut elements = vec![];

        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_expression()?);

            if !self.check(&TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(Expr::List(elements))
    }

    /// An identifier starts either a function call (when immediately
    /// followed by `(`) or a dotted path.
    fn parse_path_or_call(&mut self, first: String) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::LParen) {
            self.advance()?;
            let mut args = vec![];

            while !self.check(&TokenKind::RParen) {
                args.push(self.parse_expression()?);

                if !self.check(&TokenKind::RParen) {
                    self.expect(TokenKind::Comma)?;
                }
            }

            self.expect(TokenKind::RParen)?;
            // Arity is checked at evaluation time against the function
            // table, so any syntactically valid call parses.
            return Ok(Expr::Call { name: first, args });
        }

        let mut segments = vec![first];
        while self.check(&TokenKind::Dot) {
            self.advance()?;
            match mem::replace(&mut self.current.kind, TokenKind::Eof) {
                TokenKind::Identifier(name) => {
                    self.advance()?;
                    segments.push(name);
                }
                kind => {
                    return Err(ParseError {
                        position: self.current.position,
                        expected: "an identifier after '.'".to_string(),
                        found: kind.describe(),
                    });
                }
            }
        }
        Ok(Expr::Path(Path::new(segments)))
    }
}

impl Parser {
    /// Parse a custom-property definition list:
    ///
    /// ```text
    /// string 'display name'
    /// tag env from metadata.environment
    /// number size from stats.bytes / 1024
    /// ```
    ///
    /// Type keywords and `from` are contextual identifiers, matched
    /// case-insensitively; definitions may optionally be separated by
    /// commas.
    pub fn parse_property_definitions(&mut self) -> Result<Vec<CustomProperty>, ParseError> {
        let mut properties = vec![];

        while !self.check(&TokenKind::Eof) {
            properties.push(self.parse_property_definition()?);

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            }
        }
        Ok(properties)
    }

    fn parse_property_definition(&mut self) -> Result<CustomProperty, ParseError> {
        let property_type = self.parse_property_type()?;
        let code = self.parse_property_name()?;

        let source = if self.at_contextual_keyword("from") {
            self.advance()?;
            self.parse_expression()?
        } else {
            // No `from` clause: derive from the attribute of the same name.
            Expr::Path(Path::single(code.clone()))
        };

        Ok(CustomProperty::new(property_type, code, source))
    }

    fn at_contextual_keyword(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }

    fn parse_property_type(&mut self) -> Result<PropertyType, ParseError> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.to_ascii_lowercase(),
            _ => return Err(self.unexpected("a property type")),
        };

        let property_type = match name.as_str() {
            "string" => PropertyType::String,
            "text" => PropertyType::LongText,
            "long" => {
                self.advance()?;
                if !self.at_contextual_keyword("text") {
                    return Err(self.unexpected("'text' after 'long'"));
                }
                PropertyType::LongText
            }
            "tag" => PropertyType::Tag,
            "number" => PropertyType::Number,
            "url" => PropertyType::Url,
            "instant" => PropertyType::Instant,
            _ => return Err(self.unexpected("a property type")),
        };

        self.advance()?;
        Ok(property_type)
    }

    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        match mem::replace(&mut self.current.kind, TokenKind::Eof) {
            TokenKind::Identifier(name) | TokenKind::String(name) => {
                self.advance()?;
                Ok(name)
            }
            kind => Err(ParseError {
                position: self.current.position,
                expected: "a property name".to_string(),
                found: kind.describe(),
            }),
        }
    }
}

/// Parse a single expression source into its tree.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}
