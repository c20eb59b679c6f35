//! Connection topology
//!
//! Points that share a line id form one polyline. Lines keep the order in
//! which their first point appears. Within a line, points follow their
//! explicit order when the dataset carries one, otherwise first-seen order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier shared by all points of one polyline
pub type LineId = u32;

/// A point taking part in a connection line
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// Index of the point in its dataset
    pub id: u32,
    pub x: f64,
    pub y: f64,
    /// Line this point belongs to
    pub line_id: LineId,
    /// Explicit position along the line
    pub order: Option<u32>,
}

impl ConnectionPoint {
    pub fn new(id: u32, x: f64, y: f64, line_id: LineId) -> Self {
        Self {
            id,
            x,
            y,
            line_id,
            order: None,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// The ordered key points of one line
#[derive(Clone, Debug, PartialEq)]
pub struct LineGroup {
    pub line_id: LineId,
    pub points: Vec<ConnectionPoint>,
}

impl LineGroup {
    /// Key point positions in line order
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(ConnectionPoint::position).collect()
    }
}

/// Group points into lines.
///
/// Explicit ordering is decided by the first input point: if it carries an
/// order, every line is stably sorted by order and points lacking one go last.
pub fn group_lines(points: &[ConnectionPoint]) -> Vec<LineGroup> {
    let ordered = points.first().is_some_and(|p| p.order.is_some());

    let mut slots: HashMap<LineId, usize> = HashMap::new();
    let mut groups: Vec<LineGroup> = Vec::new();

    for point in points {
        let slot = *slots.entry(point.line_id).or_insert_with(|| {
            groups.push(LineGroup {
                line_id: point.line_id,
                points: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].points.push(*point);
    }

    if ordered {
        for group in &mut groups {
            group.points.sort_by_key(|p| p.order.unwrap_or(u32::MAX));
        }
    }

    groups
}
