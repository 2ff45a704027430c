use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Consumes the matched text and returns the token for it, or `None` for skipped input.
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

// Every pattern is anchored; multi-character operators come before their prefixes.
lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\"(\\\\.|[^\"\\\\])*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^//.*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^<-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "<-") },
        RegexPattern { regex: Regex::new("^:=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, ":=") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "=") },
        RegexPattern { regex: Regex::new("^<<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new("^\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|") },
        RegexPattern { regex: Regex::new("^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new("^&\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::AndNot, "&^") },
        RegexPattern { regex: Regex::new("^&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&") },
        RegexPattern { regex: Regex::new("^\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
    ];
}

/// Pull-based tokenizer: every call to [`Lexer::next_token`] scans exactly one token.
#[derive(Clone)]
pub struct Lexer {
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            source,
            file: file_name,
        }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span of the next `len` bytes starting at the current position.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Scans the next token.
    ///
    /// Once the input is exhausted this keeps returning `EOF`. Characters no
    /// pattern accepts come back as a single `Illegal` token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.at_eof() {
                return MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.span_of(0));
            }

            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(self.remainder())
                    .map(|matched| (pattern.handler, matched.as_str().to_string()))
            });

            match found {
                Some((handler, matched)) => {
                    if let Some(token) = handler(self, &matched) {
                        return token;
                    }
                }
                None => {
                    let illegal = self.remainder().chars().next().map(String::from).unwrap_or_default();
                    let token = MK_TOKEN!(TokenKind::Illegal, illegal.clone(), self.span_of(illegal.len()));
                    self.advance_n(illegal.len().max(1));
                    return token;
                }
            }
        }
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Int
    };

    let token = MK_TOKEN!(kind, matched.to_string(), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    Some(token)
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    None
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let span = lexer.span_of(matched.len());
    lexer.advance_n(matched.len());

    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            // Unknown escape, keep the backslash
            Some(_) => {
                result.push(ch);
                continue;
            }
            None => {
                result.push(ch);
                break;
            }
        }
        chars.next();
    }

    Some(MK_TOKEN!(TokenKind::String, result, span))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let token = MK_TOKEN!(kind, matched.to_string(), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    Some(token)
}

/// Tokenizes the whole source up front, failing on the first illegal character.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();

        match token.kind {
            TokenKind::Illegal => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token: token.value },
                    token.span.start,
                ));
            }
            TokenKind::EOF => {
                tokens.push(token);
                return Ok(tokens);
            }
            _ => tokens.push(token),
        }
    }
}
