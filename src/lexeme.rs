use crate::ast::{BinaryOperator, Literal, Node, Symbol, SymbolPrefix, UnaryOperator};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeType {
    // Operands
    Name,
    Literal,

    // Unary operators
    LogicalNot,
    BinaryNot,

    // Binary operators
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Exponentiation,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Unequal,
    Equal,
    LogicalAnd,
    LogicalOr,
    ShiftLeft,
    ShiftRight,
    BinaryAnd,
    BinaryOr,
    BinaryXor,
    Selection,
    Assignment,
    AdditionAssignment,
    SubtractionAssignment,
    MultiplicationAssignment,
    DivisionAssignment,
    ModuloAssignment,
    ExponentiationAssignment,

    // Brackets
    BracketStart,
    BracketEnd,
    ArrayStart,
    ArrayEnd,

    // Terminators
    Comma,

    // Keywords
    Class,
    Function,
    If,
    Else,
    While,
    For,
    ForEach,
    In,
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Name { name: String, prefix: SymbolPrefix },
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub lexeme_type: LexemeType,
    pub payload: Option<Payload>,
}

impl Lexeme {
    pub fn new(lexeme_type: LexemeType) -> Self {
        Self {
            lexeme_type,
            payload: None,
        }
    }

    pub fn name(name: impl Into<String>, prefix: SymbolPrefix) -> Self {
        Self {
            lexeme_type: LexemeType::Name,
            payload: Some(Payload::Name {
                name: name.into(),
                prefix,
            }),
        }
    }

    pub fn literal(literal: Literal) -> Self {
        Self {
            lexeme_type: LexemeType::Literal,
            payload: Some(Payload::Literal(literal)),
        }
    }

    /// The name of an unprefixed name lexeme, the only kind allowed in
    /// declarations.
    pub fn plain_name(&self) -> Option<&str> {
        match &self.payload {
            Some(Payload::Name {
                name,
                prefix: SymbolPrefix::None,
            }) => Some(name),
            _ => None,
        }
    }

    pub fn is(&self, lexeme_type: LexemeType) -> bool {
        self.lexeme_type == lexeme_type
    }
}

/// One logical line of source.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based number of the physical line the logical line starts on.
    pub number: usize,
    pub indentation: usize,
    pub lexemes: Vec<Lexeme>,
}

impl Line {
    pub fn new(number: usize, indentation: usize) -> Self {
        Self {
            number,
            indentation,
            lexemes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeGroup {
    Argument,
    UnaryOperator,
    BinaryOperator,
    Bracket,
    Terminator,
}

pub fn group_of(lexeme_type: LexemeType) -> Option<LexemeGroup> {
    use LexemeType::*;

    let group = match lexeme_type {
        Name | Literal => LexemeGroup::Argument,
        LogicalNot | BinaryNot => LexemeGroup::UnaryOperator,
        BracketStart | BracketEnd | ArrayStart | ArrayEnd => LexemeGroup::Bracket,
        Comma => LexemeGroup::Terminator,
        Class | Function | If | Else | While | For | ForEach | In | Return => return None,
        _ => LexemeGroup::BinaryOperator,
    };
    Some(group)
}

pub fn unary_operator(lexeme_type: LexemeType) -> Option<UnaryOperator> {
    match lexeme_type {
        LexemeType::LogicalNot => Some(UnaryOperator::LogicalNot),
        LexemeType::BinaryNot => Some(UnaryOperator::BinaryNot),
        _ => None,
    }
}

pub fn binary_operator(lexeme_type: LexemeType) -> Option<BinaryOperator> {
    use LexemeType as L;

    let operator = match lexeme_type {
        L::Addition => BinaryOperator::Addition,
        L::Subtraction => BinaryOperator::Subtraction,
        L::Multiplication => BinaryOperator::Multiplication,
        L::Division => BinaryOperator::Division,
        L::Modulo => BinaryOperator::Modulo,
        L::Exponentiation => BinaryOperator::Exponentiation,
        L::LessThan => BinaryOperator::LessThan,
        L::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
        L::GreaterThan => BinaryOperator::GreaterThan,
        L::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
        L::Unequal => BinaryOperator::Unequal,
        L::Equal => BinaryOperator::Equal,
        L::LogicalAnd => BinaryOperator::LogicalAnd,
        L::LogicalOr => BinaryOperator::LogicalOr,
        L::ShiftLeft => BinaryOperator::ShiftLeft,
        L::ShiftRight => BinaryOperator::ShiftRight,
        L::BinaryAnd => BinaryOperator::BinaryAnd,
        L::BinaryOr => BinaryOperator::BinaryOr,
        L::BinaryXor => BinaryOperator::BinaryXor,
        L::Selection => BinaryOperator::Selection,
        L::Assignment => BinaryOperator::Assignment,
        L::AdditionAssignment => BinaryOperator::AdditionAssignment,
        L::SubtractionAssignment => BinaryOperator::SubtractionAssignment,
        L::MultiplicationAssignment => BinaryOperator::MultiplicationAssignment,
        L::DivisionAssignment => BinaryOperator::DivisionAssignment,
        L::ModuloAssignment => BinaryOperator::ModuloAssignment,
        L::ExponentiationAssignment => BinaryOperator::ExponentiationAssignment,
        _ => return None,
    };
    Some(operator)
}

/// Turns an operand lexeme into a leaf node.
pub fn argument_node(lexeme: &Lexeme) -> Option<Node> {
    match &lexeme.payload {
        Some(Payload::Name { name, prefix }) => {
            Some(Node::Symbol(Symbol::with_prefix(name.clone(), *prefix)))
        }
        Some(Payload::Literal(literal)) => Some(Node::Literal(literal.clone())),
        None => None,
    }
}

// Precedence levels: a larger level binds more loosely, so the operator with
// the largest level in a run becomes the root of its tree.

pub const CALL_PRECEDENCE: u8 = 1;

pub fn unary_precedence(_operator: UnaryOperator) -> u8 {
    3
}

pub fn binary_precedence(operator: BinaryOperator) -> u8 {
    use BinaryOperator::*;

    match operator {
        Selection => 1,
        Exponentiation => 2,
        Multiplication | Division | Modulo => 4,
        Addition | Subtraction => 5,
        ShiftLeft | ShiftRight => 6,
        LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => 7,
        Equal | Unequal => 8,
        BinaryAnd => 9,
        BinaryXor => 10,
        BinaryOr => 11,
        LogicalAnd => 12,
        LogicalOr => 13,
        Assignment
        | AdditionAssignment
        | SubtractionAssignment
        | MultiplicationAssignment
        | DivisionAssignment
        | ModuloAssignment
        | ExponentiationAssignment => 14,
    }
}

pub fn is_right_associative(operator: BinaryOperator) -> bool {
    use BinaryOperator::*;

    matches!(
        operator,
        Exponentiation
            | ExponentiationAssignment
            | Assignment
            | AdditionAssignment
            | SubtractionAssignment
            | MultiplicationAssignment
            | DivisionAssignment
            | ModuloAssignment
    )
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use LexemeType::*;

        if let Some(operator) = binary_operator(self.lexeme_type) {
            return write!(f, "{}", operator.symbol());
        }
        if let Some(operator) = unary_operator(self.lexeme_type) {
            return write!(f, "{}", operator.symbol());
        }

        match (&self.lexeme_type, &self.payload) {
            (_, Some(Payload::Name { name, prefix })) => {
                write!(f, "{}", Symbol::with_prefix(name.clone(), *prefix))
            }
            (_, Some(Payload::Literal(literal))) => write!(f, "{}", literal),
            (BracketStart, _) => write!(f, "("),
            (BracketEnd, _) => write!(f, ")"),
            (ArrayStart, _) => write!(f, "{{"),
            (ArrayEnd, _) => write!(f, "}}"),
            (Comma, _) => write!(f, ","),
            (Class, _) => write!(f, "class"),
            (Function, _) => write!(f, "function"),
            (If, _) => write!(f, "if"),
            (Else, _) => write!(f, "else"),
            (While, _) => write!(f, "while"),
            (For, _) => write!(f, "for"),
            (ForEach, _) => write!(f, "foreach"),
            (In, _) => write!(f, "in"),
            (Return, _) => write!(f, "return"),
            (other, None) => write!(f, "{:?}", other),
        }
    }
}
