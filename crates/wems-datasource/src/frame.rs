// Columnar frame shaping
//
// Deterministic, stateless transform from a fetched time series into
// the host's display shape: one frame with a time field and a value
// field of equal length, upstream order preserved.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wems_api::TimeSeries;

/// A named columnar frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

/// One column of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub values: FieldValues,
}

/// Column payload variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValues {
    Time(Vec<DateTime<Utc>>),
    Number(Vec<f64>),
}

impl Frame {
    /// Shape a fetched series into the standard response frame.
    pub fn from_series(series: TimeSeries) -> Self {
        Self {
            name: "response".to_owned(),
            fields: vec![
                Field {
                    name: "time".to_owned(),
                    values: FieldValues::Time(series.times),
                },
                Field {
                    name: "value".to_owned(),
                    values: FieldValues::Number(series.values),
                },
            ],
        }
    }
}
