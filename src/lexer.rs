use crate::ast::{Literal, SymbolPrefix};
use crate::config::{Config, Indentation};
use crate::error::{FridhError, Result};
use crate::lexeme::{Lexeme, LexemeType, Line};
use std::collections::HashMap;
use std::fmt::Write;
use tracing::trace;

const MULTI_LINE_COMMENT: &str = ";;";
const NESTED_COMMENT_START: &str = ";.";
const NESTED_COMMENT_END: &str = ".;";
const HEX_PREFIX: char = 'x';

pub struct Lexer {
    source: Vec<char>,
    lines: Vec<Line>,
    current_line: Line,
    current: usize,
    line: usize,
    indentation: Indentation,
    keywords: HashMap<&'static str, Lexeme>,
}

impl Lexer {
    pub fn new(source: &str, config: &Config) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("class", Lexeme::new(LexemeType::Class));
        keywords.insert("function", Lexeme::new(LexemeType::Function));
        keywords.insert("if", Lexeme::new(LexemeType::If));
        keywords.insert("else", Lexeme::new(LexemeType::Else));
        keywords.insert("while", Lexeme::new(LexemeType::While));
        keywords.insert("for", Lexeme::new(LexemeType::For));
        keywords.insert("foreach", Lexeme::new(LexemeType::ForEach));
        keywords.insert("in", Lexeme::new(LexemeType::In));
        keywords.insert("return", Lexeme::new(LexemeType::Return));
        keywords.insert("true", Lexeme::literal(Literal::Boolean(true)));
        keywords.insert("false", Lexeme::literal(Literal::Boolean(false)));
        keywords.insert("nil", Lexeme::literal(Literal::Nil));

        Self {
            source: source.chars().collect(),
            lines: Vec::new(),
            current_line: Line::new(1, 0),
            current: 0,
            line: 1,
            indentation: config.indentation,
            keywords,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Line>> {
        self.begin_line()?;

        while !self.is_at_end() {
            self.scan_lexeme()?;
        }
        self.finish_line();

        trace!(lines = self.lines.len(), "Tokenized source");
        Ok(self.lines)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_lexeme(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            '\n' => {
                self.finish_line();
                self.line += 1;
                self.begin_line()?;
            }
            ' ' | '\r' | '\t' => {}
            ';' => {
                self.current -= 1;
                self.comment()?;
            }
            '(' => self.add(LexemeType::BracketStart),
            ')' => self.add(LexemeType::BracketEnd),
            '{' => self.add(LexemeType::ArrayStart),
            '}' => self.add(LexemeType::ArrayEnd),
            ',' => self.add(LexemeType::Comma),
            '.' => self.add(LexemeType::Selection),
            '~' => self.add(LexemeType::BinaryNot),
            '+' => self.add_with_assignment(LexemeType::Addition, LexemeType::AdditionAssignment),
            '-' => self.add_with_assignment(
                LexemeType::Subtraction,
                LexemeType::SubtractionAssignment,
            ),
            '*' => self.add_with_assignment(
                LexemeType::Multiplication,
                LexemeType::MultiplicationAssignment,
            ),
            '/' => self.add_with_assignment(LexemeType::Division, LexemeType::DivisionAssignment),
            '%' => self.add_with_assignment(LexemeType::Modulo, LexemeType::ModuloAssignment),
            '^' => {
                if self.match_char('^') {
                    self.add(LexemeType::BinaryXor);
                } else {
                    self.add_with_assignment(
                        LexemeType::Exponentiation,
                        LexemeType::ExponentiationAssignment,
                    );
                }
            }
            '=' => self.add_with_assignment(LexemeType::Assignment, LexemeType::Equal),
            '!' => self.add_with_assignment(LexemeType::LogicalNot, LexemeType::Unequal),
            '<' => {
                if self.match_char('<') {
                    self.add(LexemeType::ShiftLeft);
                } else {
                    self.add_with_assignment(LexemeType::LessThan, LexemeType::LessThanOrEqual);
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.add(LexemeType::ShiftRight);
                } else {
                    self.add_with_assignment(
                        LexemeType::GreaterThan,
                        LexemeType::GreaterThanOrEqual,
                    );
                }
            }
            '&' => {
                let lexeme_type = if self.match_char('&') {
                    LexemeType::LogicalAnd
                } else {
                    LexemeType::BinaryAnd
                };
                self.add(lexeme_type);
            }
            '|' => {
                let lexeme_type = if self.match_char('|') {
                    LexemeType::LogicalOr
                } else {
                    LexemeType::BinaryOr
                };
                self.add(lexeme_type);
            }
            '"' => self.string()?,
            ':' if self.peek() == ':' && is_name_start(self.peek_next()) => {
                self.advance();
                self.name(SymbolPrefix::Scope);
            }
            '@' if is_name_start(self.peek()) => self.name(SymbolPrefix::ClassMember),
            c if c.is_ascii_digit() => self.number(c)?,
            c if is_name_start(c) => {
                self.current -= 1;
                self.name(SymbolPrefix::None);
            }
            _ => {
                return Err(FridhError::lex_error(
                    self.line,
                    format!("Unexpected character: '{}'", c),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected && !self.is_at_end() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn string_match(&self, marker: &str) -> bool {
        marker
            .chars()
            .enumerate()
            .all(|(i, c)| self.source.get(self.current + i) == Some(&c))
    }

    /// Measures the indentation of the physical line starting at `current`.
    fn begin_line(&mut self) -> Result<()> {
        let start = self.current;
        while matches!(self.peek(), ' ' | '\t') {
            self.current += 1;
        }
        let whitespace = &self.source[start..self.current];

        if matches!(self.peek(), '\n' | '\r' | '\0') {
            self.current_line = Line::new(self.line, 0);
            return Ok(());
        }

        // Lines opening with a comment are not held to the indentation unit.
        let starts_with_comment = self.peek() == ';';
        let unit = self.indentation.unit();
        if whitespace.iter().any(|c| *c != unit) {
            if starts_with_comment {
                self.current_line = Line::new(self.line, 0);
                return Ok(());
            }
            return Err(FridhError::lex_error(
                self.line,
                format!(
                    "Mixed indentation, this module is indented with {}",
                    self.indentation.describe()
                ),
            ));
        }

        let indentation = match self.indentation {
            Indentation::Tab => whitespace.len(),
            Indentation::Spaces(width) => {
                let width = width.max(1);
                if whitespace.len() % width != 0 && !starts_with_comment {
                    return Err(FridhError::lex_error(
                        self.line,
                        format!(
                            "Indentation of {} spaces is not a multiple of {}",
                            whitespace.len(),
                            width
                        ),
                    ));
                }
                whitespace.len() / width
            }
        };

        self.current_line = Line::new(self.line, indentation);
        Ok(())
    }

    fn finish_line(&mut self) {
        if !self.current_line.lexemes.is_empty() {
            let line = std::mem::replace(&mut self.current_line, Line::new(self.line, 0));
            self.lines.push(line);
        }
    }

    fn comment(&mut self) -> Result<()> {
        let start_of_comment = self.line;

        if self.string_match(MULTI_LINE_COMMENT) {
            self.current += MULTI_LINE_COMMENT.len();
            while !self.is_at_end() {
                if self.string_match(MULTI_LINE_COMMENT) {
                    self.current += MULTI_LINE_COMMENT.len();
                    return Ok(());
                }
                if self.advance() == '\n' {
                    self.line += 1;
                }
            }
            Err(FridhError::lex_error(
                start_of_comment,
                "Unable to find the end of a multi-line comment",
            ))
        } else if self.string_match(NESTED_COMMENT_START) {
            self.current += NESTED_COMMENT_START.len();
            let mut comment_depth = 1usize;
            while !self.is_at_end() {
                if self.string_match(NESTED_COMMENT_START) {
                    comment_depth += 1;
                    self.current += NESTED_COMMENT_START.len();
                } else if self.string_match(NESTED_COMMENT_END) {
                    comment_depth -= 1;
                    self.current += NESTED_COMMENT_END.len();
                    if comment_depth == 0 {
                        return Ok(());
                    }
                } else if self.advance() == '\n' {
                    self.line += 1;
                }
            }
            Err(FridhError::lex_error(
                start_of_comment,
                "Unable to find the end of a nested comment",
            ))
        } else {
            // Line comment, the newline itself is left for scan_lexeme.
            while self.peek() != '\n' && !self.is_at_end() {
                self.advance();
            }
            Ok(())
        }
    }

    fn string(&mut self) -> Result<()> {
        let mut value = String::new();

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(FridhError::lex_error(
                    self.line,
                    "Unterminated string literal",
                ));
            }

            match self.advance() {
                '"' => break,
                '\\' => {
                    let escaped = match self.advance() {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        '\\' => '\\',
                        '"' => '"',
                        other => {
                            return Err(FridhError::lex_error(
                                self.line,
                                format!("Invalid escape sequence '\\{}'", other.escape_default()),
                            ));
                        }
                    };
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }

        self.push(Lexeme::literal(Literal::String(value)));
        Ok(())
    }

    /// Lexes a number whose first digit has already been consumed.
    fn number(&mut self, first: char) -> Result<()> {
        let start = self.current - 1;

        if first == '0' && self.peek() == HEX_PREFIX {
            self.advance();
            let hex_start = self.current;
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }

            if self.current == hex_start {
                return Err(FridhError::lex_error(self.line, "Incomplete hex number"));
            }

            let digits: String = self.source[hex_start..self.current].iter().collect();
            let value = u64::from_str_radix(&digits, 16).map_err(|_| {
                FridhError::lex_error(self.line, format!("Hex number 0x{} is out of range", digits))
            })?;
            self.push(Lexeme::literal(Literal::UnsignedInteger(value)));
            return Ok(());
        }

        let mut got_dot = false;
        let mut last = first;
        loop {
            let c = self.peek();
            if c == '.' {
                if got_dot {
                    return Err(FridhError::lex_error(
                        self.line,
                        "Encountered a floating point value containing multiple dots",
                    ));
                }
                got_dot = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            last = c;
            self.advance();
        }

        if last == '.' {
            return Err(FridhError::lex_error(
                self.line,
                "Encountered a floating point value ending with a dot",
            ));
        }

        let number: String = self.source[start..self.current].iter().collect();
        let literal = if got_dot {
            number.parse::<f64>().map(Literal::FloatingPoint).ok()
        } else {
            number.parse::<i64>().map(Literal::SignedInteger).ok()
        };

        match literal {
            Some(literal) => {
                self.push(Lexeme::literal(literal));
                Ok(())
            }
            None => Err(FridhError::lex_error(
                self.line,
                format!("Number {} is out of range", number),
            )),
        }
    }

    fn name(&mut self, prefix: SymbolPrefix) {
        let start = self.current;
        while is_name_continue(self.peek()) {
            self.advance();
        }

        let text: String = self.source[start..self.current].iter().collect();
        if prefix == SymbolPrefix::None {
            if let Some(keyword) = self.keywords.get(text.as_str()) {
                let keyword = keyword.clone();
                self.push(keyword);
                return;
            }
        }

        self.push(Lexeme::name(text, prefix));
    }

    fn add_with_assignment(&mut self, plain: LexemeType, with_equals: LexemeType) {
        let lexeme_type = if self.match_char('=') { with_equals } else { plain };
        self.add(lexeme_type);
    }

    fn add(&mut self, lexeme_type: LexemeType) {
        self.push(Lexeme::new(lexeme_type));
    }

    fn push(&mut self, lexeme: Lexeme) {
        self.current_line.lexemes.push(lexeme);
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn tokenize(source: &str) -> Result<Vec<Line>> {
    Lexer::new(source, &Config::default()).tokenize()
}

pub fn tokenize_with_config(source: &str, config: &Config) -> Result<Vec<Line>> {
    Lexer::new(source, config).tokenize()
}

/// Renders lexed lines for inspection, one logical line per output line.
pub fn visualise_lexemes(lines: &[Line]) -> String {
    let mut output = String::new();
    for line in lines {
        let _ = write!(output, "{:>4} [{}]", line.number, line.indentation);
        for lexeme in &line.lexemes {
            let _ = write!(output, " {}", lexeme);
        }
        output.push('\n');
    }
    output
}
