/// How leading whitespace maps to indentation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    /// One tab per level.
    Tab,
    /// A fixed number of spaces per level.
    Spaces(usize),
}

impl Indentation {
    pub fn unit(&self) -> char {
        match self {
            Indentation::Tab => '\t',
            Indentation::Spaces(_) => ' ',
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Indentation::Tab => "tabs".to_string(),
            Indentation::Spaces(1) => "single spaces".to_string(),
            Indentation::Spaces(n) => format!("groups of {} spaces", n),
        }
    }
}

/// Settings shared by the lexer and the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub indentation: Indentation,
    /// Deepest permitted nesting of brackets, arrays, blocks and else-if
    /// chains, and the deepest expression tree one statement may build.
    pub max_depth: usize,
}

impl Config {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn with_indentation(mut self, indentation: Indentation) -> Self {
        self.indentation = indentation;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indentation: Indentation::Tab,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
