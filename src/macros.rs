//! Token-building macros for the lexer's pattern table.

/// `MK_TOKEN!(kind, value, span)` builds a [`Token`](crate::lexer::tokens::Token).
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Handler for a pattern whose text is always `$value`: emits a `$kind` token
/// covering it and steps past it.
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^<-").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "<-"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: &str| -> Option<Token> {
            let token = $crate::MK_TOKEN!($kind, String::from($value), lexer.span_of($value.len()));
            lexer.advance_n($value.len());
            Some(token)
        }
    };
}
