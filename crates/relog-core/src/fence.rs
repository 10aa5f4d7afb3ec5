//! Markdown code-fence tracking.

/// Line prefixes that open a code block; only the prefix that opened a block
/// closes it.
const FENCES: [&str; 4] = ["```", "~~~", "    ", "\t"];

/// Tracks whether successive lines are inside a fenced code block.
#[derive(Debug, Default)]
pub struct FenceDetector {
    open: Option<usize>,
}

impl FenceDetector {
    /// Returns true while a fence is open.
    pub fn in_code_block(&self) -> bool {
        self.open.is_some()
    }

    /// Feeds the next line.
    pub fn update(&mut self, line: &str) {
        match self.open {
            None => self.open = FENCES.iter().position(|fence| line.starts_with(fence)),
            Some(fence) => {
                if line.starts_with(FENCES[fence]) {
                    self.open = None;
                }
            }
        }
    }
}
