//! Points and immutable datasets
//!
//! A point's identity is its index in the dataset. Datasets never change
//! after construction; replacing the data means building a new `Dataset`.

use std::sync::Arc;

use pointfield_curves::ConnectionPoint;
use serde::{Deserialize, Serialize};

use crate::error::{validation, DatasetError, DatasetResult};
use crate::spatial::Aabb;

/// Index of a point in its dataset
pub type PointId = u32;

/// A single scatterplot point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// First value channel (category or value, interpreted by the renderer)
    #[serde(default)]
    pub z: Option<f64>,
    /// Second value channel
    #[serde(default)]
    pub w: Option<f64>,
    /// Line this point connects to
    #[serde(default)]
    pub line_id: Option<u32>,
    /// Position along its line
    #[serde(default)]
    pub line_order: Option<u32>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_values(mut self, z: f64, w: f64) -> Self {
        self.z = Some(z);
        self.w = Some(w);
        self
    }

    pub fn with_line(mut self, line_id: u32, order: Option<u32>) -> Self {
        self.line_id = Some(line_id);
        self.line_order = order;
        self
    }

    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Interpret a float channel as a non-negative integer id
fn channel_id(value: Option<&f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && **v >= 0.0 && **v <= u32::MAX as f64)
        .map(|v| *v as u32)
}

/// Column-oriented point input
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Columns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub z: Option<Vec<f64>>,
    #[serde(default)]
    pub w: Option<Vec<f64>>,
    #[serde(default)]
    pub line: Option<Vec<u32>>,
    #[serde(default)]
    pub line_order: Option<Vec<u32>>,
}

/// An immutable, cheaply clonable point set
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    points: Arc<[Point]>,
}

impl Dataset {
    pub fn from_points(points: Vec<Point>) -> DatasetResult<Self> {
        validation::validate_dataset_size(points.len())?;
        Ok(Self {
            points: points.into(),
        })
    }

    /// Build from rows of `[x, y, z?, w?, line?, order?]`
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> DatasetResult<Self> {
        let points = rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                let values = values.as_ref();
                if values.len() < 2 {
                    return Err(DatasetError::TooFewChannels {
                        row,
                        channels: values.len(),
                    });
                }
                Ok(Point {
                    x: values[0],
                    y: values[1],
                    z: values.get(2).copied(),
                    w: values.get(3).copied(),
                    line_id: channel_id(values.get(4)),
                    line_order: channel_id(values.get(5)),
                })
            })
            .collect::<DatasetResult<Vec<_>>>()?;
        Self::from_points(points)
    }

    /// Build from equally long columns
    pub fn from_columns(columns: &Columns) -> DatasetResult<Self> {
        let n = columns.x.len();
        let check = |name: &str, len: usize| {
            if len == n {
                Ok(())
            } else {
                Err(DatasetError::ColumnLengthMismatch {
                    column: name.to_string(),
                    expected: n,
                    actual: len,
                })
            }
        };
        check("y", columns.y.len())?;
        if let Some(z) = &columns.z {
            check("z", z.len())?;
        }
        if let Some(w) = &columns.w {
            check("w", w.len())?;
        }
        if let Some(line) = &columns.line {
            check("line", line.len())?;
        }
        if let Some(order) = &columns.line_order {
            check("line_order", order.len())?;
        }

        let points = (0..n)
            .map(|i| Point {
                x: columns.x[i],
                y: columns.y[i],
                z: columns.z.as_ref().map(|c| c[i]),
                w: columns.w.as_ref().map(|c| c[i]),
                line_id: columns.line.as_ref().map(|c| c[i]),
                line_order: columns.line_order.as_ref().map(|c| c[i]),
            })
            .collect();
        Self::from_points(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id as usize)
    }

    pub fn contains_id(&self, id: PointId) -> bool {
        (id as usize) < self.points.len()
    }

    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(Point::position).collect()
    }

    /// Whether any point belongs to a line
    pub fn has_connections(&self) -> bool {
        self.points.iter().any(|p| p.line_id.is_some())
    }

    /// Points that belong to a line, in dataset order
    pub fn connection_points(&self) -> Vec<ConnectionPoint> {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                p.line_id.map(|line_id| ConnectionPoint {
                    id: i as PointId,
                    x: p.x,
                    y: p.y,
                    line_id,
                    order: p.line_order,
                })
            })
            .collect()
    }

    /// Bounding box of all finite positions
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for p in self.points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            bounds.expand_to_include(p.position());
        }
        bounds
    }
}

impl From<Vec<[f64; 2]>> for Dataset {
    fn from(positions: Vec<[f64; 2]>) -> Self {
        Self {
            points: positions.into_iter().map(|[x, y]| Point::new(x, y)).collect(),
        }
    }
}
