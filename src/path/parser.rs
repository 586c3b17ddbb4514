//! Path expression parser
//!
//! Small recursive-descent parser over the grammar:
//!
//! ```text
//! path    := ε | head tail*
//! head    := ident | bracket
//! tail    := '.' ident | bracket
//! ident   := (any char except '.', '[', ']')+
//! bracket := '[' (quoted | bare) ']'
//! quoted  := '"' (escape | char)* '"'  |  '\'' (escape | char)* '\''
//! ```
//!
//! All-digit idents and all-digit bare bracket tokens become indices.
//! Quoted tokens are always keys.

use crate::error::{JsonDbError, Result};

use super::{JsonPath, PathSegment};

/// Parse a path expression. Surrounding whitespace is ignored and the empty
/// expression is the root path.
pub fn parse_path(expression: &str) -> Result<JsonPath> {
    Parser::new(expression.trim()).parse()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<JsonPath> {
        let mut segments = Vec::new();
        if self.at_end() {
            return Ok(JsonPath::root());
        }

        // A leading dot is tolerated: ".a.b" == "a.b"
        if self.peek() == Some('.') {
            self.pos += 1;
        }
        segments.push(self.head()?);

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    segments.push(self.ident()?);
                }
                '[' => segments.push(self.bracket()?),
                other => {
                    return Err(JsonDbError::path_syntax(
                        self.pos,
                        format!("expected '.' or '[' but found '{}'", other),
                    ))
                }
            }
        }

        Ok(JsonPath::from_segments(segments))
    }

    fn head(&mut self) -> Result<PathSegment> {
        match self.peek() {
            Some('[') => self.bracket(),
            _ => self.ident(),
        }
    }

    fn ident(&mut self) -> Result<PathSegment> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            self.pos += 1;
        }
        if self.peek() == Some(']') {
            return Err(JsonDbError::path_syntax(self.pos, "unmatched ']'"));
        }
        if start == self.pos {
            return Err(JsonDbError::path_syntax(start, "empty key"));
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        Ok(classify(token))
    }

    fn bracket(&mut self) -> Result<PathSegment> {
        let open = self.pos;
        self.pos += 1; // '['
        self.skip_whitespace();

        let segment = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let key = self.quoted(quote)?;
                PathSegment::Key(key)
            }
            Some(_) => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == ']' {
                        break;
                    }
                    self.pos += 1;
                }
                let token: String = self.chars[start..self.pos].iter().collect();
                let token = token.trim();
                if token.is_empty() {
                    return Err(JsonDbError::path_syntax(open, "empty brackets"));
                }
                classify(token.to_string())
            }
            None => return Err(JsonDbError::path_syntax(open, "unterminated bracket")),
        };

        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(segment)
            }
            Some(other) => Err(JsonDbError::path_syntax(
                self.pos,
                format!("expected ']' but found '{}'", other),
            )),
            None => Err(JsonDbError::path_syntax(open, "unterminated bracket")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let open = self.pos;
        self.pos += 1;
        let mut key = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(escaped) => {
                            key.push(escaped);
                            self.pos += 1;
                        }
                        None => return Err(JsonDbError::path_syntax(open, "unterminated quote")),
                    }
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(key);
                }
                Some(c) => {
                    key.push(c);
                    self.pos += 1;
                }
                None => return Err(JsonDbError::path_syntax(open, "unterminated quote")),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// Digits address array slots, everything else is an object key
fn classify(token: String) -> PathSegment {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(idx) = token.parse::<usize>() {
            return PathSegment::Index(idx);
        }
    }
    PathSegment::Key(token)
}
