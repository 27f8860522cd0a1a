//! Line-oriented text templating for the generators.
//!
//! An [`HdlBuffer`] collects output lines containing `{{name}}` placeholders
//! alongside a pairing table mapping each name to its replacement. Nothing
//! is substituted until [`HdlBuffer::render`], so lines and pairs can be
//! added in any order; a placeholder with no pair at render time is a
//! [`GenerationError::UnresolvedPlaceholder`], never silently dropped.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::hdl::GenerationError;

/// A deferred-substitution line buffer.
#[derive(Debug, Default, Clone)]
pub struct HdlBuffer {
    lines: Vec<String>,
    pairs: BTreeMap<String, String>,
}
impl HdlBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a placeholder replacement.
    pub fn pair(mut self, name: &str, value: impl Display) -> Self {
        self.pairs.insert(name.to_string(), value.to_string());
        self
    }

    /// Appends text, split on newlines. A trailing newline does not produce
    /// an extra empty line.
    pub fn add(mut self, text: &str) -> Self {
        let text = text.strip_suffix('\n').unwrap_or(text);
        self.lines.extend(text.split('\n').map(str::to_string));
        self
    }

    /// Appends one empty line.
    pub fn empty(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    /// Resolves every placeholder and joins the lines with newlines.
    pub fn render(&self) -> Result<String, GenerationError> {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&self.substitute(line)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Resolves the placeholders of one line, left to right.
    ///
    /// Replacement text is inserted verbatim; it is not re-scanned, so
    /// substitution always terminates.
    fn substitute(&self, line: &str) -> Result<String, GenerationError> {
        let mut out = String::new();
        let mut rest = line;
        while let Some(start) = rest.find("{{") {
            let (head, tail) = rest.split_at(start);
            out.push_str(head);
            let Some(end) = tail.find("}}") else {
                // A lone "{{" is not a placeholder; emit it as-is.
                out.push_str(tail);
                return Ok(out);
            };
            let name = &tail[2..end];
            match self.pairs.get(name) {
                Some(value) => out.push_str(value),
                None => return Err(GenerationError::UnresolvedPlaceholder(name.to_string())),
            }
            rest = &tail[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::HdlBuffer;
    use crate::hdl::GenerationError;

    #[test]
    fn substitutes_pairs_in_order() {
        let buf = HdlBuffer::new()
            .pair("clock", "globalClock")
            .pair("width", 8)
            .add("assign q = s_state[{{width}}-1:0]; // {{clock}}");
        assert_eq!(
            buf.render().unwrap(),
            "assign q = s_state[8-1:0]; // globalClock\n"
        );
    }

    #[test]
    fn pairs_may_be_added_after_lines() {
        let buf = HdlBuffer::new().add("{{a}} {{b}}").pair("a", 1).pair("b", 2);
        assert_eq!(buf.render().unwrap(), "1 2\n");
    }

    #[test]
    fn unresolved_placeholder_is_an_error() {
        let buf = HdlBuffer::new().add("assign q = {{missing}};");
        assert_eq!(
            buf.render(),
            Err(GenerationError::UnresolvedPlaceholder("missing".to_string()))
        );
    }

    #[test]
    fn multiline_add_splits() {
        let buf = HdlBuffer::new().add("a\nb\n").empty().add("c");
        assert_eq!(buf.render().unwrap(), "a\nb\n\nc\n");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let buf = HdlBuffer::new().pair("a", "{{a}}").add("{{a}}");
        assert_eq!(buf.render().unwrap(), "{{a}}\n");
    }
}
