//! Route shape entity

use serde::{Deserialize, Serialize};

use crate::value_objects::Position;

/// Ordered polyline of a route
///
/// Points are kept in geographic traversal order as reported by the
/// provider and are never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(Vec<Position>);

impl RoutePath {
    /// Create an empty path
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a point
    pub fn push(&mut self, position: Position) {
        self.0.push(position);
    }

    /// Points in traversal order
    #[must_use]
    pub fn points(&self) -> &[Position] {
        &self.0
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bounding frame of all points
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(self.0.iter())
    }

    /// Consume into the list of points
    #[must_use]
    pub fn into_points(self) -> Vec<Position> {
        self.0
    }
}

impl From<Vec<Position>> for RoutePath {
    fn from(points: Vec<Position>) -> Self {
        Self(points)
    }
}

impl FromIterator<Position> for RoutePath {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Axis-aligned frame enclosing a set of positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge
    pub min_longitude: f64,
    /// Southern edge
    pub min_latitude: f64,
    /// Eastern edge
    pub max_longitude: f64,
    /// Northern edge
    pub max_latitude: f64,
}

impl BoundingBox {
    /// Frame around a single point
    #[must_use]
    pub const fn around(position: Position) -> Self {
        Self {
            min_longitude: position.longitude(),
            min_latitude: position.latitude(),
            max_longitude: position.longitude(),
            max_latitude: position.latitude(),
        }
    }

    /// Frame around all positions, `None` when there are none
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::around(*first), |mut frame, pos| {
            frame.extend(pos);
            frame
        }))
    }

    /// Grow the frame to include a position (e.g., stop markers)
    pub fn extend(&mut self, position: &Position) {
        self.min_longitude = self.min_longitude.min(position.longitude());
        self.min_latitude = self.min_latitude.min(position.latitude());
        self.max_longitude = self.max_longitude.max(position.longitude());
        self.max_latitude = self.max_latitude.max(position.latitude());
    }

    /// East-west extent
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    /// North-south extent
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(
            self.min_longitude + self.width() / 2.0,
            self.min_latitude + self.height() / 2.0,
        )
    }
}
