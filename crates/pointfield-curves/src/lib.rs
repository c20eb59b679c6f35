//! pointfield-curves - smooth polylines for point connections
//!
//! Points that share a line id are joined into one polyline. Each line is
//! interpolated with a uniform Catmull-Rom spline and simplified with
//! Douglas-Peucker so that dense curves stay cheap to draw.
//!
//! # Key Components
//!
//! - **topology**: grouping and ordering of points into lines
//! - **spline**: Catmull-Rom sampling over a clamped 4-point window
//! - **simplify**: Douglas-Peucker with squared tolerances
//! - **generator**: the full per-line pipeline
//! - **worker**: a tokio task that runs the pipeline off the interactive loop

pub mod error;
pub mod generator;
pub mod simplify;
pub mod spline;
pub mod topology;
pub mod worker;

pub use error::{CurveError, CurveResult};
pub use generator::{
    generate_curves, interpolate_points, CurveOptions, Polyline,
    DEFAULT_MAX_INT_POINTS_PER_SEGMENT, DEFAULT_TOLERANCE,
};
pub use topology::{group_lines, ConnectionPoint, LineGroup, LineId};
pub use worker::{CurveRequest, CurveResponse, CurveWorker, RequestId};
