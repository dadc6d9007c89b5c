/// Nesting limit used unless a parse asks for another.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do with tokens left over after a complete top-level expression,
/// such as the `3` in `2 3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TrailingInput {
    /// Fail with a syntax error expecting end of input.
    #[default]
    Reject,
    /// Stop at the end of the expression and return its value.
    Ignore,
}

/// Options for a single parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub trailing_input: TrailingInput,
    /// Deepest parenthesis nesting accepted. Parses that build a tree also
    /// keep its operator height within this limit.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            trailing_input: TrailingInput::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn new() -> ParserConfig {
        ParserConfig::default()
    }

    #[must_use]
    pub fn with_trailing_input(mut self, trailing_input: TrailingInput) -> ParserConfig {
        self.trailing_input = trailing_input;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> ParserConfig {
        self.max_depth = max_depth;
        self
    }
}
