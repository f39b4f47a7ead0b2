//! Output buffer with suspend-and-discard scopes

/// Append-only output of a render pass.
///
/// While a capture is active every write lands in the innermost capture
/// buffer; ending a capture throws its content away. This is how an extending
/// template's own body output is kept out of the final document.
#[derive(Debug, Default)]
pub struct Output {
    buffer: String,
    captures: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        match self.captures.last_mut() {
            Some(capture) => capture.push_str(text),
            None => self.buffer.push_str(text),
        }
    }

    /// Start a capture whose content will be discarded
    pub fn suspend(&mut self) {
        self.captures.push(String::new());
    }

    /// End the innermost capture, dropping what it collected.
    ///
    /// Returns the number of bytes thrown away.
    pub fn discard(&mut self) -> usize {
        self.captures.pop().map(|c| c.len()).unwrap_or(0)
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_writes() {
        let mut out = Output::new();
        out.write("a");
        out.write("b");
        assert_eq!(out.into_string(), "ab");
    }

    #[test]
    fn test_suspended_output_is_discarded() {
        let mut out = Output::new();
        out.write("kept ");
        out.suspend();
        out.write("dropped");
        assert_eq!(out.captures.len(), 1);
        assert_eq!(out.buffer, "kept ");
        assert_eq!(out.discard(), 7);
        out.write("after");
        assert_eq!(out.into_string(), "kept after");
    }

    #[test]
    fn test_nested_captures() {
        let mut out = Output::new();
        out.suspend();
        out.suspend();
        out.write("inner");
        out.discard();
        out.write("outer");
        out.discard();
        assert!(out.captures.is_empty());
        assert_eq!(out.buffer, "");
    }
}
