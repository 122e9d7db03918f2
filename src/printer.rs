//! Textual rendering of parse trees, executable units and modules.
//!
//! Expressions print as S-expressions (`(+ a (* b c))`), bodies print one
//! unit per line with nested bodies indented by two spaces.

use crate::ast::{ExecutableUnit, Literal, Node, Symbol, SymbolPrefix};
use crate::symbol::{SymbolId, SymbolKind, SymbolTree};
use crate::translator::Module;
use std::fmt::{self, Write};

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::SignedInteger(n) => write!(f, "{}", n),
            Literal::UnsignedInteger(n) => write!(f, "0x{:x}", n),
            Literal::FloatingPoint(n) => {
                // Always show at least one decimal place for floats
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Literal::String(s) => {
                f.write_char('"')?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\0' => f.write_str("\\0")?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.prefix {
            SymbolPrefix::None => write!(f, "{}", self.name),
            SymbolPrefix::Scope => write!(f, "::{}", self.name),
            SymbolPrefix::ClassMember => write!(f, "@{}", self.name),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Literal(literal) => write!(f, "{}", literal),
            Node::Symbol(symbol) => write!(f, "{}", symbol),
            Node::Unary { operator, argument } => {
                write!(f, "({} {})", operator.symbol(), argument)
            }
            Node::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", operator.symbol(), left, right),
            Node::Call {
                function,
                arguments,
            } => {
                write!(f, "(call {}", function)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
            Node::Array { elements } => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_body(out: &mut String, body: &[ExecutableUnit], depth: usize) {
    for unit in body {
        render_unit(out, unit, depth);
    }
}

fn render_unit(out: &mut String, unit: &ExecutableUnit, depth: usize) {
    indent(out, depth);
    match unit {
        ExecutableUnit::Statement { expression, .. } => {
            let _ = writeln!(out, "{}", expression);
        }
        ExecutableUnit::Return { expression, .. } => {
            let _ = writeln!(out, "return {}", expression);
        }
        ExecutableUnit::If {
            condition, body, ..
        } => {
            let _ = writeln!(out, "if {}", condition);
            render_body(out, body, depth + 1);
        }
        ExecutableUnit::IfElse {
            condition,
            if_body,
            else_body,
            ..
        } => {
            let _ = writeln!(out, "if {}", condition);
            render_body(out, if_body, depth + 1);
            indent(out, depth);
            out.push_str("else\n");
            render_body(out, else_body, depth + 1);
        }
        ExecutableUnit::ForEach {
            variable,
            container,
            body,
            ..
        } => {
            let _ = writeln!(out, "foreach {} in {}", variable, container);
            render_body(out, body, depth + 1);
        }
        ExecutableUnit::For {
            initialisation,
            condition,
            iteration,
            body,
            ..
        } => {
            let _ = writeln!(out, "for {}, {}, {}", initialisation, condition, iteration);
            render_body(out, body, depth + 1);
        }
        ExecutableUnit::While {
            condition, body, ..
        } => {
            let _ = writeln!(out, "while {}", condition);
            render_body(out, body, depth + 1);
        }
    }
}

impl fmt::Display for ExecutableUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = String::new();
        render_unit(&mut out, self, 0);
        f.write_str(out.trim_end())
    }
}

fn render_symbol(out: &mut String, tree: &SymbolTree, id: SymbolId, depth: usize) {
    let node = tree.get(id);
    if node.kind == SymbolKind::Variable {
        return;
    }

    indent(out, depth);
    let _ = write!(out, "{} {}", node.kind.describe(), node.name);
    match &node.function {
        Some(function) => {
            for argument in &function.arguments {
                let _ = write!(out, " {}", argument);
            }
            out.push('\n');
            render_body(out, &function.body, depth + 1);
        }
        None => out.push('\n'),
    }

    for (_, child) in tree.children(id) {
        render_symbol(out, tree, child, depth + 1);
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = String::new();
        let _ = writeln!(out, "module {}", self.name);
        render_body(&mut out, self.entry(), 1);
        let root = self.symbols.root();
        for (_, child) in self.symbols.children(root) {
            render_symbol(&mut out, &self.symbols, child, 1);
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, UnaryOperator};

    #[test]
    fn literals_render_canonically() {
        assert_eq!(Literal::FloatingPoint(2.0).to_string(), "2.0");
        assert_eq!(Literal::FloatingPoint(0.25).to_string(), "0.25");
        assert_eq!(Literal::UnsignedInteger(255).to_string(), "0xff");
        assert_eq!(Literal::SignedInteger(-3).to_string(), "-3");
        assert_eq!(
            Literal::String("say \"hi\"\n".to_string()).to_string(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn nodes_render_as_s_expressions() {
        let node = Node::binary(
            BinaryOperator::Assignment,
            Node::Symbol(Symbol::with_prefix("total", SymbolPrefix::Scope)),
            Node::unary(UnaryOperator::Negation, Node::symbol("x")),
        );
        assert_eq!(node.to_string(), "(= ::total (- x))");
    }

    #[test]
    fn nested_units_are_indented() {
        let unit = ExecutableUnit::While {
            condition: Node::symbol("running"),
            body: vec![ExecutableUnit::Return {
                expression: Node::Literal(Literal::Nil),
                line: 2,
            }],
            line: 1,
        };
        assert_eq!(unit.to_string(), "while running\n  return nil");
    }
}
