//! Line-by-line translation of a module into its symbol tree.
//!
//! Bodies are delimited by indentation alone: a block-opening line raises the
//! expected indentation by one level and the body ends at the first line that
//! falls back below it.

use crate::ast::{ExecutableUnit, ExecutableUnits, Function, Literal, Node, Symbol};
use crate::config::Config;
use crate::error::{FridhError, Result};
use crate::lexeme::{Lexeme, LexemeType, Line};
use crate::lexer;
use crate::parser::Parser;
use crate::symbol::{SymbolId, SymbolKind, SymbolTree};
use tracing::{debug, trace};

/// A fully translated source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    /// Rooted at the module's entry function.
    pub symbols: SymbolTree,
}

impl Module {
    /// Top-level statements, which form the body of the entry function.
    pub fn entry(&self) -> &[ExecutableUnit] {
        self.symbols
            .function(self.symbols.root())
            .map(|function| function.body.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up a dot-separated name starting at the module root.
    pub fn resolve(&self, qualified_name: &str) -> Option<SymbolId> {
        self.symbols.resolve(self.symbols.root(), qualified_name)
    }
}

pub struct Translator {
    lines: Vec<Line>,
    line_offset: usize,
    indentation: usize,
    nested_class_level: usize,
    symbols: SymbolTree,
    current: SymbolId,
    /// `else if` links above the line being processed. Each one nests the
    /// rest of the chain inside its else body.
    chained_else_ifs: usize,
    max_depth: usize,
}

impl Translator {
    pub fn new(lines: Vec<Line>, module_name: &str, config: &Config) -> Self {
        let symbols = SymbolTree::new(module_name);
        let current = symbols.root();
        Self {
            lines,
            line_offset: 0,
            indentation: 0,
            nested_class_level: 0,
            symbols,
            current,
            chained_else_ifs: 0,
            max_depth: config.max_depth,
        }
    }

    /// Consumes every line and returns the populated symbol tree.
    pub fn translate(mut self) -> Result<SymbolTree> {
        let body = self.process_body()?;
        let root = self.symbols.root();
        if let Some(entry) = self.symbols.function_mut(root) {
            entry.body = body;
        }
        Ok(self.symbols)
    }

    fn process_body(&mut self) -> Result<ExecutableUnits> {
        let mut body = Vec::new();

        while let Some(line) = self.lines.get(self.line_offset) {
            if line.indentation < self.indentation {
                break;
            }
            if line.indentation > self.indentation {
                return Err(FridhError::parse_error(
                    line.number,
                    "Unexpected increase in the indentation level",
                ));
            }

            let number = line.number;
            let lexemes = std::mem::take(&mut self.lines[self.line_offset].lexemes);
            self.line_offset += 1;

            trace!(line = number, indentation = self.indentation, "processing line");
            if let Some(unit) = self.process_line(number, &lexemes)? {
                body.push(unit);
            }
        }

        Ok(body)
    }

    /// Processes the body of a block-opening line one level deeper.
    fn process_block(&mut self, line: usize) -> Result<ExecutableUnits> {
        if self.indentation + self.chained_else_ifs >= self.max_depth {
            return Err(FridhError::parse_error_with_help(
                line,
                "Nesting too deep",
                format!(
                    "Blocks and else-if chains may be nested at most {} levels deep.",
                    self.max_depth
                ),
            ));
        }

        self.indentation += 1;
        let body = self.process_body();
        self.indentation -= 1;
        body
    }

    fn process_line(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<Option<ExecutableUnit>> {
        let Some(first) = lexemes.first() else {
            return Ok(None);
        };

        match first.lexeme_type {
            LexemeType::Class => {
                self.process_class(line, lexemes)?;
                return Ok(None);
            }
            LexemeType::Function => {
                self.process_function(line, lexemes)?;
                return Ok(None);
            }
            LexemeType::Else => {
                return Err(FridhError::parse_error(
                    line,
                    "Encountered an else statement without a preceding if statement",
                ));
            }
            _ => {}
        }

        if self.symbols.get(self.current).kind != SymbolKind::Function {
            return Err(FridhError::scope_error(
                line,
                "Regular statements and assignments need to be placed within functions",
            ));
        }

        let unit = match first.lexeme_type {
            LexemeType::If => self.process_if(line, lexemes)?,
            LexemeType::While => {
                let condition = self.parser(line, &lexemes[1..]).parse_statement()?;
                let body = self.process_block(line)?;
                ExecutableUnit::While {
                    condition,
                    body,
                    line,
                }
            }
            LexemeType::For => self.process_for(line, lexemes)?,
            LexemeType::ForEach => self.process_foreach(line, lexemes)?,
            LexemeType::Return => {
                let expression = if lexemes.len() == 1 {
                    Node::Literal(Literal::Nil)
                } else {
                    self.parser(line, &lexemes[1..]).parse_statement()?
                };
                ExecutableUnit::Return { expression, line }
            }
            _ => ExecutableUnit::Statement {
                expression: self.parser(line, lexemes).parse_statement()?,
                line,
            },
        };

        Ok(Some(unit))
    }

    fn parser<'a>(&self, line: usize, lexemes: &'a [Lexeme]) -> Parser<'a> {
        Parser::new(lexemes, line, self.max_depth).inside_class(self.nested_class_level > 0)
    }

    fn declare(&mut self, line: usize, name: &str, kind: SymbolKind) -> Result<SymbolId> {
        self.symbols
            .declare(self.current, name, kind)
            .map_err(|collision| FridhError::scope_error(line, collision.to_string()))
    }

    fn process_class(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<()> {
        let name = match lexemes {
            [_, name] => name.plain_name(),
            _ => None,
        };
        let Some(name) = name else {
            return Err(FridhError::parse_error_with_help(
                line,
                "Malformed class declaration",
                "A class declaration consists of \"class\" followed by a single name.",
            ));
        };

        let class = self.declare(line, name, SymbolKind::Class)?;
        debug!(class = %self.symbols.qualified_name(class), line, "declared class");

        let parent = self.current;
        self.current = class;
        self.nested_class_level += 1;
        let body = self.process_block(line);
        self.nested_class_level -= 1;
        self.current = parent;

        // Class bodies only ever hold declarations.
        body.map(|_| ())
    }

    fn process_function(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<()> {
        let names = lexemes[1..]
            .iter()
            .map(Lexeme::plain_name)
            .collect::<Option<Vec<_>>>();
        let Some((name, arguments)) = names.as_deref().and_then(<[&str]>::split_first) else {
            return Err(FridhError::parse_error(
                line,
                "Encountered an invalid lexeme type in a function declaration - at this point only names are permitted",
            ));
        };

        let function = self.declare(line, name, SymbolKind::Function)?;
        debug!(
            function = %self.symbols.qualified_name(function),
            arguments = arguments.len(),
            line,
            "declared function"
        );

        let parent = self.current;
        self.current = function;
        for argument in arguments {
            if let Err(error) = self.declare(line, argument, SymbolKind::Variable) {
                self.current = parent;
                return Err(error);
            }
        }
        let body = self.process_block(line);
        self.current = parent;
        let body = body?;

        if let Some(target) = self.symbols.function_mut(function) {
            *target = Function::new(arguments.iter().map(|a| a.to_string()).collect());
            target.body = body;
        }
        Ok(())
    }

    fn process_if(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<ExecutableUnit> {
        let condition = self.parser(line, &lexemes[1..]).parse_statement()?;
        let if_body = self.process_block(line)?;

        let else_line = self
            .lines
            .get(self.line_offset)
            .filter(|next| next.indentation == self.indentation)
            .filter(|next| next.lexemes.first().map_or(false, |l| l.is(LexemeType::Else)))
            .map(|next| next.number);
        let Some(else_number) = else_line else {
            return Ok(ExecutableUnit::If {
                condition,
                body: if_body,
                line,
            });
        };

        let else_lexemes = std::mem::take(&mut self.lines[self.line_offset].lexemes);
        self.line_offset += 1;

        let else_body = match else_lexemes.get(1) {
            None => self.process_block(else_number)?,
            Some(next) if next.is(LexemeType::If) => {
                self.chained_else_ifs += 1;
                let chained = self.process_if(else_number, &else_lexemes[1..]);
                self.chained_else_ifs -= 1;
                vec![chained?]
            }
            Some(_) => {
                return Err(FridhError::parse_error_with_help(
                    else_number,
                    "Invalid else statement",
                    "An else line is either bare or continues with another if statement.",
                ));
            }
        };

        Ok(ExecutableUnit::IfElse {
            condition,
            if_body,
            else_body,
            line,
        })
    }

    fn process_for(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<ExecutableUnit> {
        let terms = self.parser(line, &lexemes[1..]).parse_statements()?;
        let Ok([initialisation, condition, iteration]) = <[Node; 3]>::try_from(terms) else {
            return Err(FridhError::parse_error_with_help(
                line,
                "Invalid number of terms in a for statement",
                "A for statement takes exactly three comma separated terms: for init, condition, step",
            ));
        };

        let body = self.process_block(line)?;
        Ok(ExecutableUnit::For {
            initialisation,
            condition,
            iteration,
            body,
            line,
        })
    }

    fn process_foreach(&mut self, line: usize, lexemes: &[Lexeme]) -> Result<ExecutableUnit> {
        let header = match lexemes {
            [_, variable, keyword, container @ ..] if keyword.is(LexemeType::In) => {
                variable.plain_name().map(|name| (name, container))
            }
            _ => None,
        };
        let Some((variable, container)) = header else {
            return Err(FridhError::parse_error_with_help(
                line,
                "Malformed foreach statement",
                "Write it as: foreach name in container",
            ));
        };

        let container = self.parser(line, container).parse_statement()?;
        let body = self.process_block(line)?;
        Ok(ExecutableUnit::ForEach {
            variable: Symbol::new(variable),
            container,
            body,
            line,
        })
    }
}

/// Lexes and translates `source` with the default configuration.
pub fn process_module(source: &str, module_name: &str) -> Result<Module> {
    process_module_with_config(source, module_name, &Config::default())
}

pub fn process_module_with_config(
    source: &str,
    module_name: &str,
    config: &Config,
) -> Result<Module> {
    debug!(module = module_name, "translating module");
    let lines = lexer::tokenize_with_config(source, config)?;
    let symbols = Translator::new(lines, module_name, config).translate()?;
    debug!(module = module_name, symbols = symbols.len(), "translated module");

    Ok(Module {
        name: module_name.to_string(),
        symbols,
    })
}
