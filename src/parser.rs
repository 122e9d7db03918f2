use crate::ast::{BinaryOperator, Node, SymbolPrefix, UnaryOperator};
use crate::error::{FridhError, Result};
use crate::lexeme::{self, Lexeme, LexemeGroup, LexemeType, Payload, CALL_PRECEDENCE};

/// Whether a run may hold several comma or juxtaposition separated
/// statements (call arguments, array elements, `for` headers) or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementMode {
    Single,
    Multi,
}

/// A resolved statement together with the depth of its tree.
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    node: Node,
    depth: usize,
}

impl Resolved {
    fn leaf(node: Node) -> Self {
        Self { node, depth: 1 }
    }
}

fn deepest(statements: &[Resolved]) -> usize {
    statements.iter().map(|s| s.depth).max().unwrap_or(0)
}

fn into_nodes(statements: Vec<Resolved>) -> Vec<Node> {
    statements.into_iter().map(|s| s.node).collect()
}

/// One entry of the flat list that operator resolution works on. Operands
/// and call argument lists carry the depth of what they already hold.
#[derive(Debug, Clone, PartialEq)]
enum Element {
    Operand(Resolved),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Call(Vec<Node>, usize),
}

impl Element {
    fn precedence(&self) -> Option<u8> {
        match self {
            Element::Operand(_) => None,
            Element::Unary(operator) => Some(lexeme::unary_precedence(*operator)),
            Element::Binary(operator) => Some(lexeme::binary_precedence(*operator)),
            Element::Call(..) => Some(CALL_PRECEDENCE),
        }
    }

    fn is_right_to_left(&self) -> bool {
        match self {
            Element::Binary(operator) => lexeme::is_right_associative(*operator),
            _ => false,
        }
    }
}

/// Parses the lexemes of one line into parse tree nodes.
pub struct Parser<'a> {
    lexemes: &'a [Lexeme],
    current: usize,
    line: usize,
    depth: usize,
    max_depth: usize,
    in_class: bool,
}

impl<'a> Parser<'a> {
    pub fn new(lexemes: &'a [Lexeme], line: usize, max_depth: usize) -> Self {
        Self {
            lexemes,
            current: 0,
            line,
            depth: 0,
            max_depth,
            in_class: false,
        }
    }

    /// Allows `@member` symbols, which only make sense inside a class.
    pub fn inside_class(mut self, in_class: bool) -> Self {
        self.in_class = in_class;
        self
    }

    /// Parses all lexemes as exactly one statement.
    pub fn parse_statement(&mut self) -> Result<Node> {
        let mut nodes = self.parse_run(None, StatementMode::Single)?;
        nodes
            .pop()
            .map(|resolved| resolved.node)
            .ok_or_else(|| self.error("Empty statement"))
    }

    /// Parses all lexemes as a comma separated list of statements.
    pub fn parse_statements(&mut self) -> Result<Vec<Node>> {
        self.parse_run(None, StatementMode::Multi).map(into_nodes)
    }

    fn error(&self, message: &str) -> FridhError {
        FridhError::parse_error(self.line, message)
    }

    fn too_deep(&self, what: &str) -> FridhError {
        FridhError::parse_error_with_help(
            self.line,
            "Nesting too deep",
            format!("{} may be nested at most {} levels deep.", what, self.max_depth),
        )
    }

    fn nested(&mut self, terminator: LexemeType, mode: StatementMode) -> Result<Vec<Resolved>> {
        if self.depth >= self.max_depth {
            return Err(self.too_deep("Brackets and arrays"));
        }
        self.depth += 1;
        let result = self.parse_run(Some(terminator), mode);
        self.depth -= 1;
        result
    }

    /// Consumes lexemes up to `terminator` (or the end of the line when there
    /// is none) and returns the resolved statements.
    fn parse_run(
        &mut self,
        terminator: Option<LexemeType>,
        mode: StatementMode,
    ) -> Result<Vec<Resolved>> {
        let mut output = Vec::new();
        let mut elements: Vec<Element> = Vec::new();
        let mut last_group: Option<LexemeGroup> = None;
        let mut after_comma = false;
        let mut terminated = false;
        let lexemes = self.lexemes;

        while let Some(lexeme) = lexemes.get(self.current) {
            self.current += 1;

            if Some(lexeme.lexeme_type) == terminator {
                terminated = true;
                break;
            }

            match lexeme.lexeme_type {
                LexemeType::BracketStart => {
                    if last_group == Some(LexemeGroup::Argument) {
                        let arguments = self.nested(LexemeType::BracketEnd, StatementMode::Multi)?;
                        let depth = deepest(&arguments);
                        elements.push(Element::Call(into_nodes(arguments), depth));
                    } else {
                        let mut content =
                            self.nested(LexemeType::BracketEnd, StatementMode::Single)?;
                        let grouped = content.pop().ok_or_else(|| self.error("Empty statement"))?;
                        elements.push(Element::Operand(grouped));
                    }
                    last_group = Some(LexemeGroup::Argument);
                    after_comma = false;
                    continue;
                }
                LexemeType::BracketEnd => return Err(self.error("Unmatched closing bracket")),
                LexemeType::ArrayStart => {
                    if last_group == Some(LexemeGroup::Argument) {
                        self.close_adjacent(mode, &mut elements, &mut output)?;
                    }
                    let elements_of_array =
                        self.nested(LexemeType::ArrayEnd, StatementMode::Multi)?;
                    elements.push(Element::Operand(Resolved {
                        depth: deepest(&elements_of_array) + 1,
                        node: Node::Array {
                            elements: into_nodes(elements_of_array),
                        },
                    }));
                    last_group = Some(LexemeGroup::Argument);
                    after_comma = false;
                    continue;
                }
                LexemeType::ArrayEnd => return Err(self.error("Unmatched closing curled brace")),
                LexemeType::Comma => {
                    if mode == StatementMode::Single {
                        return Err(FridhError::parse_error_with_help(
                            self.line,
                            "Encountered a comma outside of an argument list",
                            "Commas separate call arguments, array elements and the terms of a for statement.",
                        ));
                    }
                    self.close_statement(&mut elements, last_group, &mut output)?;
                    last_group = None;
                    after_comma = true;
                    continue;
                }
                _ => {}
            }

            let group = lexeme::group_of(lexeme.lexeme_type)
                .ok_or_else(|| self.error(&format!("Invalid lexeme \"{}\" in statement", lexeme)))?;

            match group {
                LexemeGroup::Argument => {
                    if last_group == Some(LexemeGroup::Argument) {
                        self.close_adjacent(mode, &mut elements, &mut output)?;
                    }
                    elements.push(Element::Operand(Resolved::leaf(self.argument_node(lexeme)?)));
                }
                LexemeGroup::UnaryOperator => {
                    if last_group == Some(LexemeGroup::Argument) {
                        return Err(self.error(
                            "Encountered an argument followed by an unary operator without a binary operator between them",
                        ));
                    }
                    let operator = lexeme::unary_operator(lexeme.lexeme_type)
                        .ok_or_else(|| self.error("Invalid unary operator"))?;
                    elements.push(Element::Unary(operator));
                }
                LexemeGroup::BinaryOperator => {
                    if last_group != Some(LexemeGroup::Argument) {
                        // The one operator that changes meaning with position.
                        if lexeme.is(LexemeType::Subtraction) {
                            elements.push(Element::Unary(UnaryOperator::Negation));
                            last_group = Some(LexemeGroup::UnaryOperator);
                            after_comma = false;
                            continue;
                        }
                        let message = match last_group {
                            None => "Encountered a binary operator in the beginning of a statement",
                            Some(LexemeGroup::UnaryOperator) => {
                                "Encountered a unary operator followed by a binary operator"
                            }
                            _ => "Encountered two sequential binary operators",
                        };
                        return Err(self.error(message));
                    }
                    let operator = lexeme::binary_operator(lexeme.lexeme_type)
                        .ok_or_else(|| self.error("Invalid binary operator"))?;
                    elements.push(Element::Binary(operator));
                }
                LexemeGroup::Bracket | LexemeGroup::Terminator => {
                    return Err(FridhError::internal_error(
                        self.line,
                        format!("Unhandled lexeme \"{}\" in statement", lexeme),
                    ));
                }
            }

            last_group = Some(group);
            after_comma = false;
        }

        if let Some(terminator) = terminator {
            if !terminated {
                let message = match terminator {
                    LexemeType::ArrayEnd => "Unmatched opening curled brace",
                    _ => "Unmatched opening bracket",
                };
                return Err(self.error(message));
            }
        }

        // Empty argument lists and arrays are fine, a dangling comma is not.
        if elements.is_empty() && mode == StatementMode::Multi && !after_comma {
            return Ok(output);
        }
        self.close_statement(&mut elements, last_group, &mut output)?;
        Ok(output)
    }

    /// Two operands in a row end the current statement in multi-statement
    /// mode and are an error otherwise.
    fn close_adjacent(
        &self,
        mode: StatementMode,
        elements: &mut Vec<Element>,
        output: &mut Vec<Resolved>,
    ) -> Result<()> {
        if mode == StatementMode::Single {
            return Err(self.error("Encountered two arguments without an operator between them"));
        }
        self.close_statement(elements, Some(LexemeGroup::Argument), output)
    }

    fn close_statement(
        &self,
        elements: &mut Vec<Element>,
        last_group: Option<LexemeGroup>,
        output: &mut Vec<Resolved>,
    ) -> Result<()> {
        if elements.is_empty() {
            return Err(self.error("Empty statement"));
        }
        if last_group != Some(LexemeGroup::Argument) {
            return Err(self.error("An operator is missing an argument"));
        }
        // Resolution recurses once per operator, so the count is bounded
        // before resolving and the finished tree's depth after.
        let operators = elements.iter().filter(|e| e.precedence().is_some()).count();
        if operators > self.max_depth {
            return Err(self.too_deep("Operators in one statement"));
        }
        let resolved = operator_resolution(std::mem::take(elements), self.line)?;
        if resolved.depth > self.max_depth {
            return Err(self.too_deep("Operators and brackets"));
        }
        output.push(resolved);
        Ok(())
    }

    fn argument_node(&self, lexeme: &Lexeme) -> Result<Node> {
        if let Some(Payload::Name {
            name,
            prefix: SymbolPrefix::ClassMember,
        }) = &lexeme.payload
        {
            if !self.in_class {
                return Err(FridhError::scope_error(
                    self.line,
                    format!("Class member \"@{}\" referenced outside of a class", name),
                ));
            }
        }
        lexeme::argument_node(lexeme).ok_or_else(|| self.error("Operand lexeme without a value"))
    }
}

/// Turns a flat, validated element list into a single tree.
///
/// The operator with the loosest binding becomes the root and the elements on
/// either side of it are resolved recursively. Candidates are scanned from the
/// right: a later candidate only displaces the current one when it binds more
/// loosely, or equally loosely while being right-to-left. Left-associative
/// chains therefore split at their last operator and right-associative chains
/// at their first.
fn operator_resolution(mut elements: Vec<Element>, line: usize) -> Result<Resolved> {
    if elements.len() == 1 {
        if let Some(Element::Operand(resolved)) = elements.pop() {
            return Ok(resolved);
        }
        return Err(FridhError::internal_error(
            line,
            "Failed to perform operator resolution",
        ));
    }

    let mut extremum: Option<(usize, u8)> = None;
    for (offset, element) in elements.iter().enumerate().rev() {
        if let Some(precedence) = element.precedence() {
            let replaces = match extremum {
                None => true,
                Some((_, best)) => {
                    precedence > best || (precedence == best && element.is_right_to_left())
                }
            };
            if replaces {
                extremum = Some((offset, precedence));
            }
        }
    }

    let (offset, _) = extremum.ok_or_else(|| {
        FridhError::internal_error(line, "Failed to perform operator resolution")
    })?;

    let right = elements.split_off(offset + 1);
    let operator = elements.pop();
    let left = elements;

    match operator {
        Some(Element::Unary(operator)) => {
            if right.is_empty() {
                return Err(FridhError::internal_error(
                    line,
                    "Unary operator without an argument reached operator resolution",
                ));
            }
            let argument = operator_resolution(right, line)?;
            let resolved = Resolved {
                depth: argument.depth + 1,
                node: Node::unary(operator, argument.node),
            };
            if left.is_empty() {
                Ok(resolved)
            } else {
                let mut rest = left;
                rest.push(Element::Operand(resolved));
                operator_resolution(rest, line)
            }
        }
        Some(Element::Binary(operator)) => {
            if left.is_empty() || right.is_empty() {
                return Err(FridhError::internal_error(
                    line,
                    "Binary operator without two arguments reached operator resolution",
                ));
            }
            let left = operator_resolution(left, line)?;
            let right = operator_resolution(right, line)?;
            Ok(Resolved {
                depth: left.depth.max(right.depth) + 1,
                node: Node::binary(operator, left.node, right.node),
            })
        }
        Some(Element::Call(arguments, arguments_depth)) => {
            if left.is_empty() {
                return Err(FridhError::internal_error(
                    line,
                    "Invalid call offset encountered during operator resolution",
                ));
            }
            let function = operator_resolution(left, line)?;
            let resolved = Resolved {
                depth: function.depth.max(arguments_depth) + 1,
                node: Node::Call {
                    function: Box::new(function.node),
                    arguments,
                },
            };
            if right.is_empty() {
                Ok(resolved)
            } else {
                let mut rest = vec![Element::Operand(resolved)];
                rest.extend(right);
                operator_resolution(rest, line)
            }
        }
        _ => Err(FridhError::internal_error(
            line,
            "Invalid operator node type encountered during operator resolution",
        )),
    }
}

pub fn parse_statement(lexemes: &[Lexeme], line: usize) -> Result<Node> {
    Parser::new(lexemes, line, crate::config::Config::DEFAULT_MAX_DEPTH).parse_statement()
}
