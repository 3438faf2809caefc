//! Editor preferences.

/// Tunables for data entry and history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    /// Octave used for note entry (0-9)
    pub base_octave: u8,
    /// Rows the cursor advances after entering a value
    pub step: u8,
    /// Rows moved by page up/down
    pub page_rows: u16,
    /// Length of newly created patterns
    pub default_rows: u16,
    /// Maximum undo entries kept; the oldest are dropped first
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_octave: 4,
            step: 1,
            page_rows: 16,
            default_rows: 16,
            undo_limit: 256,
        }
    }
}

impl EditorConfig {
    pub fn adjust_octave(&mut self, delta: i8) {
        self.base_octave = (self.base_octave as i16 + delta as i16).clamp(0, 9) as u8;
    }

    pub fn adjust_step(&mut self, delta: i8) {
        self.step = (self.step as i16 + delta as i16).clamp(0, 16) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_clamp() {
        let mut config = EditorConfig::default();
        config.adjust_octave(10);
        assert_eq!(config.base_octave, 9);
        config.adjust_octave(-20);
        assert_eq!(config.base_octave, 0);
        config.adjust_step(-3);
        assert_eq!(config.step, 0);
        config.adjust_step(40);
        assert_eq!(config.step, 16);
    }
}
