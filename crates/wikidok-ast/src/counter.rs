//! Outline numbering state
//!
//! A `SectionCounter` holds one integer per heading depth. It is passed
//! explicitly through the numbering pass; it is never global state.

/// A three-level outline counter
///
/// Incrementing a level resets every deeper level to zero, so the counter
/// tracks the current position in the document outline.
///
/// # Example
///
/// ```
/// use wikidok_ast::SectionCounter;
///
/// let mut counter = SectionCounter::default();
/// counter.increment(1);
/// counter.increment(2);
/// assert_eq!(counter.dotted(2), "1.1");
/// counter.increment(1);
/// assert_eq!(counter.dotted(1), "2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounter {
    levels: [u32; 3],
}

impl SectionCounter {
    /// Create a counter starting from the given seed
    pub fn new(seed: [u32; 3]) -> Self {
        Self { levels: seed }
    }

    /// Advance the counter at a heading level (1-3, clamped)
    ///
    /// All levels deeper than the incremented one reset to zero.
    pub fn increment(&mut self, level: u8) {
        let ix = usize::from(level.clamp(1, 3)) - 1;
        self.levels[ix] += 1;
        for deeper in self.levels.iter_mut().skip(ix + 1) {
            *deeper = 0;
        }
    }

    /// Render the counter as a dotted number, truncated at the given level
    pub fn dotted(&self, level: u8) -> String {
        let depth = usize::from(level.clamp(1, 3));
        self.levels[..depth]
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The current counter values
    pub fn levels(&self) -> [u32; 3] {
        self.levels
    }
}

impl Default for SectionCounter {
    fn default() -> Self {
        Self::new([0, 0, 0])
    }
}
