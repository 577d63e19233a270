/// Responsive breakpoints for TUI layout decisions.
///
/// Width thresholds live here so render code never hard-codes them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 60 cols: split pane
    Compact,
    /// 60-99 cols: half screen
    Normal,
    /// 100-139 cols: full terminal
    Wide,
    /// 140+ cols
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }

    /// How many leading table columns fit; the rest are dropped
    pub fn max_table_columns(&self) -> usize {
        match self {
            Breakpoint::Compact => 3,
            Breakpoint::Normal => 5,
            Breakpoint::Wide | Breakpoint::UltraWide => usize::MAX,
        }
    }
}
