// Fridh Language Front End Library
//
// Turns the source of an indentation-based scripting language into parse
// trees and a symbol tree that an evaluator can walk.

// Public modules
pub mod ast;
pub mod config;
pub mod error;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod runner;
pub mod symbol;
pub mod translator;

// Re-export commonly used items
pub use ast::{ExecutableUnit, Function, Literal, Node, Symbol, SymbolPrefix};
pub use config::{Config, Indentation};
pub use error::{ErrorKind, FridhError, Result};
pub use lexeme::{Lexeme, LexemeType, Line};
pub use lexer::{tokenize, tokenize_with_config, visualise_lexemes, Lexer};
pub use parser::Parser;
pub use symbol::{SymbolId, SymbolKind, SymbolTree};
pub use translator::{process_module, process_module_with_config, Module};

// Re-export main functions
pub use runner::{run, Output};
