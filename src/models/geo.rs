use serde::{Deserialize, Serialize};

/// A point picked on the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Encodes as `"<lat>,<lng>"`, the form stored on orders.
    ///
    /// Negative zero is written as `0`. Magnitudes below `1e-6` are written
    /// in plain decimal (`0.0000001`) rather than exponent form; both forms
    /// parse back to the same value.
    pub fn encode(&self) -> String {
        format!("{},{}", unsigned_zero(self.lat), unsigned_zero(self.lng))
    }

    /// Reads a `"<lat>,<lng>"` string back. Ranges are not checked.
    pub fn parse(raw: &str) -> Option<Self> {
        let (lat, lng) = raw.split_once(',')?;
        Some(Self {
            lat: lat.trim().parse().ok()?,
            lng: lng.trim().parse().ok()?,
        })
    }
}

fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Which end of an order a picked point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateTarget {
    Start,
    End,
}
