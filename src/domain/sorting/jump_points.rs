//! Jump points - the boundaries that turn a drag position into a slot.

use serde::{Deserialize, Serialize};

use super::ReorderError;

/// Where an alternative's box sits along the alternatives axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub start: f64,
    pub size: f64,
}

impl Extent {
    pub fn new(start: f64, size: f64) -> Self {
        Self { start, size }
    }

    pub fn end(&self) -> f64 {
        self.start + self.size
    }

    pub fn center(&self) -> f64 {
        self.start + self.size / 2.0
    }
}

/// Box positions of every alternative, in display order, on a track of known length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub track_length: f64,
    pub extents: Vec<Extent>,
}

impl TrackLayout {
    pub fn new(track_length: f64, extents: Vec<Extent>) -> Self {
        Self {
            track_length,
            extents,
        }
    }

    /// `count` equal boxes filling the track.
    pub fn uniform(count: usize, track_length: f64) -> Self {
        let size = if count == 0 {
            0.0
        } else {
            track_length / count as f64
        };
        let extents = (0..count)
            .map(|i| Extent::new(i as f64 * size, size))
            .collect();
        Self::new(track_length, extents)
    }
}

/// Which way the dragged box has moved in total since the drag began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    /// Towards the end of the track.
    Forward,
    /// Towards the start of the track, or not at all.
    Backward,
}

impl DragDirection {
    pub fn of(total_delta: f64) -> Self {
        if total_delta > 0.0 {
            DragDirection::Forward
        } else {
            DragDirection::Backward
        }
    }
}

/// `[0, center_0, …, center_{n-1}, track_length]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpPoints(Vec<f64>);

impl JumpPoints {
    pub fn from_layout(layout: &TrackLayout) -> Self {
        let mut points = Vec::with_capacity(layout.extents.len() + 2);
        points.push(0.0);
        points.extend(layout.extents.iter().map(Extent::center));
        points.push(layout.track_length);
        Self(points)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Index `k` of the interval holding `center`.
    ///
    /// Forward drags use `[jp[k], jp[k+1])`, backward drags `(jp[k], jp[k+1]]`,
    /// so a box resting on its own center stays where it is either way.
    /// The track ends are closed in both directions.
    pub fn bracket(&self, center: f64, direction: DragDirection) -> Option<usize> {
        let last = self.0.len().checked_sub(2)?;
        self.0.windows(2).enumerate().position(|(k, pair)| {
            let (low, high) = (pair[0], pair[1]);
            match direction {
                DragDirection::Forward => {
                    center >= low && (center < high || (k == last && center <= high))
                }
                DragDirection::Backward => {
                    center <= high && (center > low || (k == 0 && center >= low))
                }
            }
        })
    }

    /// Target slot for a box whose center has moved to `center`.
    ///
    /// The interval index counts the dragged box's own center when moving
    /// forward, hence the correction by one.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if no interval holds the coordinate
    pub fn target_index(&self, center: f64, total_delta: f64) -> Result<usize, ReorderError> {
        let direction = DragDirection::of(total_delta);
        let k = self
            .bracket(center, direction)
            .ok_or(ReorderError::IndexOutOfRange { center })?;
        Ok(match direction {
            DragDirection::Forward => k.saturating_sub(1),
            DragDirection::Backward => k,
        })
    }
}
