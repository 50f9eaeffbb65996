//! Stop entity

use serde::{Deserialize, Serialize};

use crate::value_objects::Position;

/// A stop along a route, in traversal order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Rider-facing station number, when the provider reports one
    pub station_code: Option<String>,

    /// Station name
    pub name: String,

    /// Station position
    pub position: Position,

    /// True for the single stop where the route reverses direction
    pub is_turnaround_point: bool,
}

impl Stop {
    /// Create a new stop
    pub fn new(
        station_code: Option<String>,
        name: impl Into<String>,
        position: Position,
        is_turnaround_point: bool,
    ) -> Self {
        Self {
            station_code,
            name: name.into(),
            position,
            is_turnaround_point,
        }
    }

    /// Index of the turnaround stop, if any
    #[must_use]
    pub fn turnaround_index(stops: &[Self]) -> Option<usize> {
        stops.iter().position(|s| s.is_turnaround_point)
    }
}
