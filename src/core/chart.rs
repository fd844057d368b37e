//! Plot-ready chart types
//!
//! Everything the presentation layer receives: points, named series, the
//! smile x-axis domain and the tri-state view result.

use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// A single plotted point with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub option_type: OptionType,
    /// Originating strike (IV evolution only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<f64>,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64, option_type: OptionType) -> Self {
        Self {
            x,
            y,
            option_type,
            strike_price: None,
        }
    }

    pub fn with_strike(mut self, strike_price: f64) -> Self {
        self.strike_price = Some(strike_price);
        self
    }
}

/// Named sequence of points, ascending by x
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn with_points(name: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// X-axis range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

/// Outcome of building a view
///
/// A failed query and a successful empty query render the same empty state;
/// they are kept apart so callers can branch exhaustively and so the two are
/// logged differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewState<T> {
    /// Query succeeded with nothing to plot
    Empty,
    /// Plot-ready data
    Data(T),
    /// Query failed; carries the reason that was logged
    Unavailable(String),
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ViewState::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewState::Empty)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ViewState::Unavailable(_))
    }

    /// Whether the presentation layer should show its empty placeholder
    pub fn shows_placeholder(&self) -> bool {
        !matches!(self, ViewState::Data(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Empty => ViewState::Empty,
            ViewState::Data(value) => ViewState::Data(f(value)),
            ViewState::Unavailable(reason) => ViewState::Unavailable(reason),
        }
    }
}
