//! Parse tree and executable units produced by the front end.
//!
//! Every node owns its children outright. The only navigational links in a
//! translated module live in the symbol tree, which refers to parents by index.

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Boolean(bool),
    SignedInteger(i64),
    /// Produced by hexadecimal literals.
    UnsignedInteger(u64),
    FloatingPoint(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPrefix {
    None,
    /// `::name`
    Scope,
    /// `@name`
    ClassMember,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub prefix: SymbolPrefix,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: SymbolPrefix::None,
        }
    }

    pub fn with_prefix(name: impl Into<String>, prefix: SymbolPrefix) -> Self {
        Self {
            name: name.into(),
            prefix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negation,
    LogicalNot,
    BinaryNot,
}

/// Binary operators. `Addition` applied to two strings is concatenation and
/// applied to an array appends, as far as the evaluator is concerned; the
/// front end itself attaches no typing to any operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
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
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negation => "-",
            UnaryOperator::LogicalNot => "!",
            UnaryOperator::BinaryNot => "~",
        }
    }
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponentiation => "^",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Unequal => "!=",
            BinaryOperator::Equal => "==",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::BinaryAnd => "&",
            BinaryOperator::BinaryOr => "|",
            BinaryOperator::BinaryXor => "^^",
            BinaryOperator::Selection => ".",
            BinaryOperator::Assignment => "=",
            BinaryOperator::AdditionAssignment => "+=",
            BinaryOperator::SubtractionAssignment => "-=",
            BinaryOperator::MultiplicationAssignment => "*=",
            BinaryOperator::DivisionAssignment => "/=",
            BinaryOperator::ModuloAssignment => "%=",
            BinaryOperator::ExponentiationAssignment => "^=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    Symbol(Symbol),
    Unary {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call {
        function: Box<Node>,
        arguments: Vec<Node>,
    },
    Array {
        elements: Vec<Node>,
    },
}

impl Node {
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(Symbol::new(name))
    }

    pub fn unary(operator: UnaryOperator, argument: Node) -> Self {
        Node::Unary {
            operator,
            argument: Box::new(argument),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Node::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of literal and symbol leaves in this tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Literal(_) | Node::Symbol(_) => 1,
            Node::Unary { argument, .. } => argument.leaf_count(),
            Node::Binary { left, right, .. } => left.leaf_count() + right.leaf_count(),
            Node::Call {
                function,
                arguments,
            } => function.leaf_count() + arguments.iter().map(Node::leaf_count).sum::<usize>(),
            Node::Array { elements } => elements.iter().map(Node::leaf_count).sum(),
        }
    }

    /// Number of operator, call and array nodes in this tree.
    pub fn internal_count(&self) -> usize {
        match self {
            Node::Literal(_) | Node::Symbol(_) => 0,
            Node::Unary { argument, .. } => 1 + argument.internal_count(),
            Node::Binary { left, right, .. } => 1 + left.internal_count() + right.internal_count(),
            Node::Call {
                function,
                arguments,
            } => {
                1 + function.internal_count()
                    + arguments.iter().map(Node::internal_count).sum::<usize>()
            }
            Node::Array { elements } => 1 + elements.iter().map(Node::internal_count).sum::<usize>(),
        }
    }
}

pub type ExecutableUnits = Vec<ExecutableUnit>;

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutableUnit {
    Statement {
        expression: Node,
        line: usize,
    },
    Return {
        expression: Node,
        line: usize,
    },
    If {
        condition: Node,
        body: ExecutableUnits,
        line: usize,
    },
    IfElse {
        condition: Node,
        if_body: ExecutableUnits,
        else_body: ExecutableUnits,
        line: usize,
    },
    ForEach {
        variable: Symbol,
        container: Node,
        body: ExecutableUnits,
        line: usize,
    },
    For {
        initialisation: Node,
        condition: Node,
        iteration: Node,
        body: ExecutableUnits,
        line: usize,
    },
    While {
        condition: Node,
        body: ExecutableUnits,
        line: usize,
    },
}

impl ExecutableUnit {
    pub fn line(&self) -> usize {
        match self {
            ExecutableUnit::Statement { line, .. } => *line,
            ExecutableUnit::Return { line, .. } => *line,
            ExecutableUnit::If { line, .. } => *line,
            ExecutableUnit::IfElse { line, .. } => *line,
            ExecutableUnit::ForEach { line, .. } => *line,
            ExecutableUnit::For { line, .. } => *line,
            ExecutableUnit::While { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Function {
    pub arguments: Vec<String>,
    pub body: ExecutableUnits,
}

impl Function {
    pub fn new(arguments: Vec<String>) -> Self {
        Self {
            arguments,
            body: Vec::new(),
        }
    }
}
