//! Destination column alignment.
//!
//! Rows have a variable-width label (destination and track) followed by a
//! fixed-width time indicator. To keep the time indicators in one column
//! every label gets the same width: as wide as the widest label, but never
//! wider than the narrowest row can afford.

/// Geometry of a rendered table, as seen by the aligner.
///
/// Widths are in the sink's own units (terminal cells, pixels).
pub trait RowMeasure {
    /// Number of departure rows.
    fn row_count(&self) -> usize;

    /// Drop any width previously forced on a row's label.
    fn reset_label_width(&mut self, row: usize);

    /// Width the label would take unconstrained.
    fn natural_label_width(&self, row: usize) -> usize;

    /// Space shared by the label, the gap and the time indicator.
    fn content_width(&self, row: usize) -> usize;

    /// Width of the row's time indicator.
    fn time_width(&self, row: usize) -> usize;

    /// Gap between label and time indicator.
    fn column_gap(&self) -> usize;

    /// Force a label width.
    fn set_label_width(&mut self, row: usize, width: usize);
}

/// Give every row's label the same width.
///
/// Returns the applied width, or `None` when there are no rows.
pub fn align_columns<M: RowMeasure + ?Sized>(layout: &mut M) -> Option<usize> {
    let rows = layout.row_count();
    if rows == 0 {
        return None;
    }

    for row in 0..rows {
        layout.reset_label_width(row);
    }

    let widest = (0..rows)
        .map(|row| layout.natural_label_width(row))
        .max()
        .unwrap_or(0);

    let gap = layout.column_gap();
    let narrowest_space = (0..rows)
        .map(|row| {
            layout
                .content_width(row)
                .saturating_sub(layout.time_width(row))
                .saturating_sub(gap)
        })
        .min()
        .unwrap_or(0);

    let width = widest.min(narrowest_space);
    for row in 0..rows {
        layout.set_label_width(row, width);
    }
    Some(width)
}

/// Runs [`align_columns`] at the next paint after a render or resize.
///
/// Measuring straight after new rows are rendered would see stale
/// geometry, so renders and resizes only mark the layout as pending.
#[derive(Debug, Clone, Default)]
pub struct ColumnAligner {
    pending: bool,
    last_width: Option<usize>,
}

impl ColumnAligner {
    /// Create an aligner with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request alignment at the next paint.
    pub fn schedule(&mut self) {
        self.pending = true;
    }

    /// Whether a pass is waiting for the next paint.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Width applied by the most recent pass.
    pub fn last_width(&self) -> Option<usize> {
        self.last_width
    }

    /// Paint hook: align if a pass was scheduled.
    pub fn run_if_scheduled<M: RowMeasure + ?Sized>(&mut self, layout: &mut M) -> Option<usize> {
        if !self.pending {
            return self.last_width;
        }
        self.pending = false;
        self.last_width = align_columns(layout);
        self.last_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table with explicit per-row geometry.
    struct FakeTable {
        natural: Vec<usize>,
        content: Vec<usize>,
        time: usize,
        gap: usize,
        forced: Vec<Option<usize>>,
        resets: usize,
    }

    impl FakeTable {
        fn new(natural: &[usize], content: &[usize], time: usize, gap: usize) -> Self {
            Self {
                natural: natural.to_vec(),
                content: content.to_vec(),
                time,
                gap,
                forced: vec![Some(999); natural.len()],
                resets: 0,
            }
        }
    }

    impl RowMeasure for FakeTable {
        fn row_count(&self) -> usize {
            self.natural.len()
        }

        fn reset_label_width(&mut self, row: usize) {
            self.forced[row] = None;
            self.resets += 1;
        }

        fn natural_label_width(&self, row: usize) -> usize {
            assert!(self.forced[row].is_none(), "measured before reset");
            self.natural[row]
        }

        fn content_width(&self, row: usize) -> usize {
            self.content[row]
        }

        fn time_width(&self, _row: usize) -> usize {
            self.time
        }

        fn column_gap(&self) -> usize {
            self.gap
        }

        fn set_label_width(&mut self, row: usize, width: usize) {
            self.forced[row] = Some(width);
        }
    }

    #[test]
    fn widest_label_when_it_fits() {
        let mut table = FakeTable::new(&[8, 14, 10], &[60, 60, 60], 9, 2);

        assert_eq!(align_columns(&mut table), Some(14));
        assert_eq!(table.forced, vec![Some(14); 3]);
        assert_eq!(table.resets, 3);
    }

    #[test]
    fn narrowest_row_caps_width() {
        // Row 1 has 30 - 9 - 2 = 19 cells for its label.
        let mut table = FakeTable::new(&[8, 25, 10], &[60, 30, 60], 9, 2);

        assert_eq!(align_columns(&mut table), Some(19));
        assert_eq!(table.forced, vec![Some(19); 3]);
    }

    #[test]
    fn floored_at_zero() {
        let mut table = FakeTable::new(&[8, 10], &[5, 60], 9, 2);

        assert_eq!(align_columns(&mut table), Some(0));
        assert_eq!(table.forced, vec![Some(0); 2]);
    }

    #[test]
    fn no_rows() {
        let mut table = FakeTable::new(&[], &[], 9, 2);
        assert_eq!(align_columns(&mut table), None);
    }

    #[test]
    fn aligner_waits_for_paint() {
        let mut table = FakeTable::new(&[8, 12], &[60, 60], 9, 2);
        let mut aligner = ColumnAligner::new();

        assert!(!aligner.is_pending());
        assert_eq!(aligner.run_if_scheduled(&mut table), None);
        assert_eq!(table.resets, 0);

        aligner.schedule();
        assert!(aligner.is_pending());
        assert_eq!(aligner.run_if_scheduled(&mut table), Some(12));
        assert!(!aligner.is_pending());

        // A second paint without a new render does not re-measure.
        assert_eq!(aligner.run_if_scheduled(&mut table), Some(12));
        assert_eq!(table.resets, 2);
        assert_eq!(aligner.last_width(), Some(12));
    }
}
