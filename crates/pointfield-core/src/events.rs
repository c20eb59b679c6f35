//! Engine events
//!
//! Each engine publishes to its own injected [`EventSink`]; there is no
//! global bus. State-changing calls publish exactly one event per state
//! transition and no-op calls publish nothing.

use std::collections::VecDeque;

use serde::Serialize;

use crate::point::PointId;
use crate::transform::Mat4;

/// Something subscribers may react to
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// The selection changed to `points`
    Select { points: Vec<PointId> },
    /// The selection was cleared
    Deselect,
    /// The pointer started hovering a point
    PointOver { point: PointId },
    /// The pointer stopped hovering a point
    PointOut { point: PointId },
    /// A lasso drag began
    LassoStart,
    /// The lasso gained a vertex (data space)
    LassoExtend { coordinates: Vec<[f64; 2]> },
    /// The lasso was committed (data space)
    LassoEnd { coordinates: Vec<[f64; 2]> },
    /// The view matrix changed this frame
    View { view: Mat4 },
    /// New connection polylines are ready
    PointConnectionsDraw { lines: usize },
    /// An animated dataset transition began
    TransitionStart,
    /// An animated dataset transition finished
    TransitionEnd,
}

impl Event {
    /// Event name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Event::Select { .. } => "select",
            Event::Deselect => "deselect",
            Event::PointOver { .. } => "pointOver",
            Event::PointOut { .. } => "pointOut",
            Event::LassoStart => "lassoStart",
            Event::LassoExtend { .. } => "lassoExtend",
            Event::LassoEnd { .. } => "lassoEnd",
            Event::View { .. } => "view",
            Event::PointConnectionsDraw { .. } => "pointConnectionsDraw",
            Event::TransitionStart => "transitionStart",
            Event::TransitionEnd => "transitionEnd",
        }
    }
}

/// Receiver of engine events
pub trait EventSink {
    fn publish(&mut self, event: Event);
}

/// Buffers events until drained
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Take every buffered event in publish order
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

impl EventSink for EventQueue {
    fn publish(&mut self, event: Event) {
        self.events.push_back(event);
    }
}

/// Forwards events to a closure
pub struct FnSink<F>(pub F);

impl<F: FnMut(Event)> EventSink for FnSink<F> {
    fn publish(&mut self, event: Event) {
        (self.0)(event)
    }
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: Event) {}
}
