//! JSONPath parser.

use crate::types::*;
use serde_json::{Number, Value};
use thiserror::Error;

/// Why an expression failed to parse. Positions are byte offsets.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected root identifier '$' at start")]
    ExpectedRoot,
    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unclosed bracket opened at {pos}")]
    UnclosedBracket { pos: usize },
    #[error("invalid escape sequence at {pos}")]
    InvalidEscape { pos: usize },
    #[error("invalid number at {pos}")]
    InvalidNumber { pos: usize },
    #[error("unclosed string starting at {pos}")]
    UnclosedString { pos: usize },
    #[error("invalid selector at {pos}")]
    InvalidSelector { pos: usize },
}

struct ComparisonToken {
    operator: ComparisonOperator,
    len: usize,
}

/// JSONPath parser.
pub struct JsonPathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> JsonPathParser<'a> {
    /// Parse a JSONPath expression.
    pub fn parse(input: &'a str) -> Result<JSONPath, ParseError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<JSONPath, ParseError> {
        self.skip_whitespace();
        if self.peek() != Some('$') {
            return Err(ParseError::ExpectedRoot);
        }
        self.advance();

        let segments = self.parse_segments(false)?;
        self.skip_whitespace();
        if let Some(ch) = self.peek() {
            return Err(ParseError::UnexpectedChar { ch, pos: self.pos });
        }
        Ok(JSONPath::new(segments))
    }

    /// Parse segments until something that is not `.` or `[`.
    ///
    /// Inside a filter, whitespace may separate the path from what follows.
    fn parse_segments(&mut self, in_filter: bool) -> Result<Vec<PathSegment>, ParseError> {
        let mut segments = Vec::new();
        loop {
            if in_filter && self.is_filter_path_terminator() {
                break;
            }
            match self.peek() {
                Some('.') => {
                    self.advance();
                    if self.peek() == Some('.') {
                        self.advance();
                        let selectors = self.parse_recursive_selectors()?;
                        segments.push(PathSegment::new(selectors, true));
                    } else if self.peek() == Some('*') {
                        self.advance();
                        segments.push(PathSegment::new(vec![Selector::Wildcard], false));
                    } else {
                        let name = self.parse_identifier()?;
                        segments.push(PathSegment::new(vec![Selector::Name(name)], false));
                    }
                }
                Some('[') => {
                    let selectors = self.parse_bracket_selectors()?;
                    segments.push(PathSegment::new(selectors, false));
                }
                _ => break,
            }
        }
        Ok(segments)
    }

    fn parse_recursive_selectors(&mut self) -> Result<Vec<Selector>, ParseError> {
        match self.peek() {
            Some('*') => {
                self.advance();
                Ok(vec![Selector::Wildcard])
            }
            Some('[') => self.parse_bracket_selectors(),
            _ => Ok(vec![Selector::Name(self.parse_identifier()?)]),
        }
    }

    fn parse_bracket_selectors(&mut self) -> Result<Vec<Selector>, ParseError> {
        let open = self.pos;
        self.expect('[')?;
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                return Err(ParseError::UnclosedBracket { pos: open });
            }
            selectors.push(self.parse_bracket_selector()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    break;
                }
                None => return Err(ParseError::UnclosedBracket { pos: open }),
                Some(ch) => return Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
            }
        }

        Ok(selectors)
    }

    fn parse_bracket_selector(&mut self) -> Result<Selector, ParseError> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Selector::Name(self.parse_string()?)),
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some(':') | Some('-') | Some('0'..='9') => self.parse_index_or_slice(),
            Some('?') => {
                self.advance();
                Ok(Selector::Filter(self.parse_filter_expression()?))
            }
            _ => Err(ParseError::InvalidSelector { pos: self.pos }),
        }
    }

    fn parse_index_or_slice(&mut self) -> Result<Selector, ParseError> {
        let start = self.parse_optional_integer()?;
        self.skip_whitespace();

        if self.peek() != Some(':') {
            return start
                .map(Selector::Index)
                .ok_or(ParseError::InvalidSelector { pos: self.pos });
        }
        self.advance();
        let end = self.parse_optional_integer()?;
        self.skip_whitespace();

        let step = if self.peek() == Some(':') {
            self.advance();
            self.parse_optional_integer()?
        } else {
            None
        };

        Ok(Selector::Slice { start, end, step })
    }

    fn parse_optional_integer(&mut self) -> Result<Option<isize>, ParseError> {
        self.skip_whitespace();
        if matches!(self.peek(), Some('0'..='9') | Some('-')) {
            Ok(Some(self.parse_integer()?))
        } else {
            Ok(None)
        }
    }

    fn parse_integer(&mut self) -> Result<isize, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
        self.input[start..self.pos]
            .parse::<isize>()
            .map_err(|_| ParseError::InvalidNumber { pos: start })
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(match self.peek() {
                Some(ch) => ParseError::UnexpectedChar { ch, pos: self.pos },
                None => ParseError::UnexpectedEnd,
            });
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = self.peek().ok_or(ParseError::UnexpectedEnd)?;
        self.advance();

        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString { pos: start }),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_pos = self.pos;
                    self.advance();
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('/') => '/',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('u') => self.parse_unicode_escape(escape_pos)?,
                        _ => return Err(ParseError::InvalidEscape { pos: escape_pos }),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    /// Reads the hex digits of `\uXXXX`, leaving the cursor on the last one.
    ///
    /// A high surrogate must be followed by a `\uXXXX` low surrogate; the pair
    /// decodes to one character.
    fn parse_unicode_escape(&mut self, escape_pos: usize) -> Result<char, ParseError> {
        let invalid = ParseError::InvalidEscape { pos: escape_pos };
        let first = self.hex4(self.pos + 1).ok_or(invalid.clone())?;
        if !(0xD800..0xDC00).contains(&first) {
            self.pos += 4;
            return char::from_u32(first).ok_or(invalid);
        }
        if self.input.get(self.pos + 5..self.pos + 7) != Some("\\u") {
            return Err(invalid);
        }
        let second = self.hex4(self.pos + 7).ok_or(invalid.clone())?;
        if !(0xDC00..0xE000).contains(&second) {
            return Err(invalid);
        }
        let code = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
        self.pos += 10;
        char::from_u32(code).ok_or(invalid)
    }

    fn hex4(&self, at: usize) -> Option<u32> {
        let digits = self.input.get(at..at + 4)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok()
    }

    fn parse_filter_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_logical_and_expression()?;
        self.skip_whitespace();

        while self.peek_str("||") {
            self.advance_by(2);
            let right = self.parse_logical_and_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let mut left = self.parse_unary_expression()?;
        self.skip_whitespace();

        while self.peek_str("&&") {
            self.advance_by(2);
            let right = self.parse_unary_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        self.skip_whitespace();

        if self.peek() == Some('!') && !self.peek_str("!=") {
            self.advance();
            let expr = self.parse_unary_expression()?;
            return Ok(FilterExpression::Negation(Box::new(expr)));
        }

        if self.peek() == Some('(') {
            let open = self.pos;
            self.advance();
            let expr = self.parse_filter_expression()?;
            self.skip_whitespace();
            if self.is_at_end() {
                return Err(ParseError::UnclosedBracket { pos: open });
            }
            self.expect(')')?;
            return Ok(FilterExpression::Paren(Box::new(expr)));
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> Result<FilterExpression, ParseError> {
        let start = self.pos;
        let left = self.parse_value_expression()?;
        self.skip_whitespace();

        if let Some(op) = self.peek_comparison_operator() {
            self.advance_by(op.len);
            let right = self.parse_value_expression()?;
            return Ok(FilterExpression::Comparison {
                operator: op.operator,
                left,
                right,
            });
        }

        match left {
            ValueExpression::Path(path) => Ok(FilterExpression::Existence {
                path,
                rooted: false,
            }),
            ValueExpression::RootPath(path) => Ok(FilterExpression::Existence { path, rooted: true }),
            ValueExpression::Current => Ok(FilterExpression::Existence {
                path: JSONPath::new(vec![]),
                rooted: false,
            }),
            _ => Err(ParseError::InvalidSelector { pos: start }),
        }
    }

    fn parse_value_expression(&mut self) -> Result<ValueExpression, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            Some('@') => {
                self.advance();
                let segments = self.parse_segments(true)?;
                if segments.is_empty() {
                    return Ok(ValueExpression::Current);
                }
                return Ok(ValueExpression::Path(JSONPath::new(segments)));
            }
            Some('$') => {
                self.advance();
                let segments = self.parse_segments(true)?;
                if segments.is_empty() {
                    return Ok(ValueExpression::Root);
                }
                return Ok(ValueExpression::RootPath(JSONPath::new(segments)));
            }
            Some('\'') | Some('"') => {
                return Ok(ValueExpression::Literal(Value::String(self.parse_string()?)));
            }
            Some('0'..='9') | Some('-') => {
                return Ok(ValueExpression::Literal(self.parse_number_literal()?));
            }
            None => return Err(ParseError::UnexpectedEnd),
            _ => {}
        }

        for (word, value) in [
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
        ] {
            if self.peek_str(word) {
                self.advance_by(word.len());
                return Ok(ValueExpression::Literal(value));
            }
        }

        Err(ParseError::InvalidSelector { pos: self.pos })
    }

    fn is_filter_path_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(')') | Some(',') | Some(']') => true,
            Some(c) if c.is_whitespace() => true,
            Some('&') => self.peek_str("&&"),
            Some('|') => self.peek_str("||"),
            Some('=') => self.peek_str("=="),
            Some('!') => self.peek_str("!="),
            Some('<') | Some('>') => true,
            _ => false,
        }
    }

    /// Integers stay integers so `@.n == 3` sees the literal as written.
    fn parse_number_literal(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(ParseError::InvalidNumber { pos: start });
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber { pos: start });
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber { pos: start });
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        let invalid = || ParseError::InvalidNumber { pos: start };
        if !is_float {
            if let Ok(n) = num_str.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
        }
        let f = num_str.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
    }

    fn peek_comparison_operator(&self) -> Option<ComparisonToken> {
        [
            ("==", ComparisonOperator::Equal),
            ("!=", ComparisonOperator::NotEqual),
            ("<=", ComparisonOperator::LessEqual),
            (">=", ComparisonOperator::GreaterEqual),
            ("<", ComparisonOperator::Less),
            (">", ComparisonOperator::Greater),
        ]
        .into_iter()
        .find(|(token, _)| self.peek_str(token))
        .map(|(token, operator)| ComparisonToken {
            operator,
            len: token.len(),
        })
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }
}
