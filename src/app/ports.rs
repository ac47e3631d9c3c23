/// Screen cell where a popover should be anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPosition {
    pub top: u16,
    pub left: u16,
}

/// Popover-placement port. The core asks for an anchor near a caret offset
/// without depending on any rendering technology.
pub trait AnchorMeasure {
    fn compute_anchor_position(&self, caret: usize) -> AnchorPosition;
}

/// Fixed-width implementation for terminal frontends: the input line starts
/// at (`row`, `col`) and wraps at `width` cells.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub row: u16,
    pub col: u16,
    pub width: u16,
}

impl AnchorMeasure for MonospaceMeasure {
    fn compute_anchor_position(&self, caret: usize) -> AnchorPosition {
        let width = self.width.max(1) as usize;
        let offset = self.col as usize + caret;
        AnchorPosition {
            top: self.row + (offset / width) as u16 + 1,
            left: (offset % width) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_below_caret_cell() {
        let m = MonospaceMeasure {
            row: 4,
            col: 2,
            width: 80,
        };
        let pos = m.compute_anchor_position(10);
        assert_eq!(pos, AnchorPosition { top: 5, left: 12 });
    }

    #[test]
    fn anchor_wraps_at_line_width() {
        let m = MonospaceMeasure {
            row: 0,
            col: 0,
            width: 10,
        };
        let pos = m.compute_anchor_position(25);
        assert_eq!(pos, AnchorPosition { top: 3, left: 5 });
    }
}
