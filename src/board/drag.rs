//! Drag Gesture Resolution
//!
//! Maps a pointer coordinate to an insertion point within a stage
//! column. Pure geometry over the rows the caller currently shows; the
//! collection is never touched. Re-evaluated by the caller on every
//! pointer move.

/// Layout of one visible card row, in the column's coordinate space
#[derive(Debug, Clone, PartialEq)]
pub struct CardRect {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl CardRect {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Resolve the card the dragged client would be inserted before.
///
/// `rows` is the ordered visible list of the target stage, with the
/// dragged card already excluded. Among rows whose midpoint lies below
/// the pointer offset-wise (`pointer_y` above the midpoint), the one
/// nearest the pointer wins. None means append at the end, which is
/// also the empty-column case.
pub fn drop_before<'a>(rows: &'a [CardRect], pointer_y: f64) -> Option<&'a CardRect> {
    let mut nearest: Option<(f64, &CardRect)> = None;
    for row in rows {
        let offset = pointer_y - row.midpoint();
        if offset < 0.0 && nearest.map_or(true, |(best, _)| offset > best) {
            nearest = Some((offset, row));
        }
    }
    nearest.map(|(_, row)| row)
}
