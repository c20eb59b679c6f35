//! Recorded input scenarios
//!
//! A scenario is a JSON document with the points, the viewport, an optional
//! engine configuration and a list of timed steps. Step times are offsets in
//! milliseconds from the start of the replay.

use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use pointfield_core::{
    Columns, ConfigPatch, Dataset, DatasetError, Engine, EngineConfig, EventSink, KeyEvent,
    PointId, PointerEvent,
};
use pointfield_curves::CurveWorker;

/// Errors while loading a scenario
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid points: {0}")]
    Dataset(#[from] DatasetError),
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// Points as rows of `[x, y, z?, w?, line?, order?]` or as columns
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PointInput {
    Rows(Vec<Vec<f64>>),
    Columns(Columns),
}

impl PointInput {
    pub fn to_dataset(&self) -> ReplayResult<Dataset> {
        Ok(match self {
            PointInput::Rows(rows) => Dataset::from_rows(rows.as_slice())?,
            PointInput::Columns(columns) => Dataset::from_columns(columns)?,
        })
    }
}

/// One thing that happens during a replay
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    Pointer { event: PointerEvent },
    Key { event: KeyEvent },
    Tick,
    Select {
        ids: Vec<PointId>,
        #[serde(default)]
        merge: bool,
    },
    Deselect,
    Resize { width: f64, height: f64 },
    ResetView,
    Config { patch: ConfigPatch },
    Points { points: PointInput },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

fn default_viewport() -> [f64; 2] {
    [800.0, 600.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default = "default_viewport")]
    pub viewport: [f64; 2],
    pub points: PointInput,
    /// Generate connection curves on the background worker
    #[serde(default)]
    pub curve_worker: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Create an engine sized and filled as the scenario describes
    pub fn engine<S: EventSink>(
        &self,
        sink: S,
        worker: Option<CurveWorker>,
    ) -> ReplayResult<Engine<S>> {
        let mut engine = Engine::new(self.config.clone(), sink);
        if let Some(worker) = worker {
            engine = engine.with_curve_worker(worker);
        }
        let [width, height] = self.viewport;
        if !engine.resize(width, height) {
            tracing::warn!("Ignoring invalid viewport {}x{}", width, height);
        }
        engine.set_points(self.points.to_dataset()?);
        Ok(engine)
    }

    /// Run every step against `engine`, ticking after each one
    pub fn play<S: EventSink>(&self, engine: &mut Engine<S>, start: Instant) -> ReplayResult<()> {
        let mut now = start;
        for step in &self.steps {
            now = now.max(start + Duration::from_millis(step.at_ms));
            apply(engine, &step.action, now)?;
            engine.tick(now);
        }
        Ok(())
    }
}

fn apply<S: EventSink>(engine: &mut Engine<S>, action: &Action, now: Instant) -> ReplayResult<()> {
    match action {
        Action::Pointer { event } => engine.handle_pointer(event, now),
        Action::Key { event } => engine.handle_key(event),
        Action::Tick => {}
        Action::Select { ids, merge } => {
            engine.select(ids, *merge);
        }
        Action::Deselect => {
            engine.deselect();
        }
        Action::Resize { width, height } => {
            engine.resize(*width, *height);
        }
        Action::ResetView => engine.reset_view(),
        Action::Config { patch } => {
            engine.update_config(patch);
        }
        Action::Points { points } => engine.set_points(points.to_dataset()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointfield_core::{Event, EventQueue};

    const RING_CLICK: &str = r#"{
        "viewport": [200, 200],
        "points": [[0, 0], [1, 1], [1, -1], [-1, -1], [-1, 1]],
        "steps": [
            {"atMs": 0, "action": "pointer", "event": {"type": "down", "x": 100, "y": 100}},
            {"atMs": 5, "action": "pointer", "event": {"type": "up", "x": 100, "y": 100}},
            {"atMs": 20, "action": "key", "event": {"key": "Escape", "pressed": true}}
        ]
    }"#;

    #[test]
    fn test_parse_and_play() {
        let scenario = Scenario::from_json(RING_CLICK).unwrap();
        assert_eq!(scenario.steps.len(), 3);

        let mut engine = scenario.engine(EventQueue::new(), None).unwrap();
        scenario.play(&mut engine, Instant::now()).unwrap();

        let events = engine.sink_mut().drain();
        assert_eq!(
            events,
            vec![Event::Select { points: vec![0] }, Event::Deselect]
        );
    }

    #[test]
    fn test_bundled_ring_scenario() {
        let scenario = Scenario::from_json(include_str!("../scenarios/ring-lasso.json")).unwrap();
        assert!(scenario.curve_worker);

        let mut engine = scenario.engine(EventQueue::new(), None).unwrap();
        assert_eq!(engine.connections().len(), 1);
        scenario.play(&mut engine, Instant::now()).unwrap();

        let events = engine.sink_mut().drain();
        assert!(events.contains(&Event::Select {
            points: vec![1, 2, 3, 4]
        }));
        assert!(events.iter().any(|e| matches!(e, Event::View { .. })));
        assert_eq!(events.last(), Some(&Event::Deselect));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_columns_input() {
        let json = r#"{"points": {"x": [0, 1], "y": [0, 1]}}"#;
        let scenario = Scenario::from_json(json).unwrap();
        let engine = scenario.engine(EventQueue::new(), None).unwrap();
        assert_eq!(engine.dataset().len(), 2);
        assert_eq!(engine.viewport().width, 800.0);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let json = r#"{"points": [[0, 0], [1]]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert!(matches!(
            scenario.engine(EventQueue::new(), None),
            Err(ReplayError::Dataset(_))
        ));
    }
}
