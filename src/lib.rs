#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod parser;

/// Byte offset into a named source.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span covering both `self` and `other`, assuming `self` starts first.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Finds the line containing byte `position`.
///
/// Returns the 1-based line number, the line text and the offset of `position` within it.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Errors reported at end of input point one past the last character
    if pos == source.len() && !source.is_empty() {
        let last = source.split_inclusive('\n').last()?;
        return Some((line_number - 1, last.to_string(), last.trim_end_matches('\n').len()));
    }

    None
}

pub fn display_error(error: &Error, source: &str) {
    /*
        error: message
        -> main.vt
           |
        20 | let a <- #;
           | ---------^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", position.1);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
