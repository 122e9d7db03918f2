use crate::config::Config;
use crate::lexer;
use crate::translator;
use std::path::Path;

/// What a successful run renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// The lexed lines, before any parsing.
    Lexemes,
    /// The translated module.
    Tree,
}

/// Processes one source file and renders the requested output.
///
/// Failures are reported to stderr against the source and yield `None`.
pub fn run(source: &str, filename: Option<&str>, config: &Config, output: Output) -> Option<String> {
    let result = match output {
        Output::Lexemes => {
            lexer::tokenize_with_config(source, config).map(|lines| lexer::visualise_lexemes(&lines))
        }
        Output::Tree => translator::process_module_with_config(source, &module_name(filename), config)
            .map(|module| module.to_string()),
    };

    match result {
        Ok(rendered) => Some(rendered),
        Err(error) => {
            error.report(source, filename);
            None
        }
    }
}

/// Module name for a source path: its file stem, or `main` without one.
pub fn module_name(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("main")
        .to_string()
}
