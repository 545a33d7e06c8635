//! Render-time indentation
//!
//! The generator derives indentation purely from tree nesting. It keeps its
//! own depth counter and never looks at how the source was indented.

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// String repeated once per nesting level
    pub indent_unit: String,
}

impl RenderOptions {
    /// Indent with `width` spaces per level
    pub fn spaces(width: usize) -> Self {
        Self {
            indent_unit: " ".repeat(width),
        }
    }

    /// Indent with one tab per level
    pub fn tabs() -> Self {
        Self {
            indent_unit: "\t".to_string(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::spaces(2)
    }
}

/// Current nesting depth of the text being emitted
#[derive(Debug, Clone)]
pub struct RenderState<'o> {
    depth: usize,
    unit: &'o str,
}

impl<'o> RenderState<'o> {
    pub fn new(unit: &'o str) -> Self {
        Self { depth: 0, unit }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Prefix `line` with the indentation of the current depth
    pub fn with_indent(&self, line: &str) -> String {
        let mut out = self.unit.repeat(self.depth);
        out.push_str(line);
        out
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_unit_is_two_spaces() {
        assert_eq!(RenderOptions::default().indent_unit, "  ");
    }

    #[test]
    fn test_with_indent_repeats_unit() {
        let options = RenderOptions::tabs();
        let mut state = RenderState::new(&options.indent_unit);
        assert_eq!(state.with_indent("x"), "x");
        state.indent();
        state.indent();
        assert_eq!(state.with_indent("x"), "\t\tx");
        state.dedent();
        assert_eq!(state.depth(), 1);
        assert_eq!(state.with_indent("end"), "\tend");
    }

    #[test]
    fn test_dedent_stops_at_zero() {
        let mut state = RenderState::new("  ");
        state.dedent();
        assert_eq!(state.depth(), 0);
    }
}
