//! FILENAME: core/pivot-table/src/aggregator.rs
//! Running aggregates fed one value at a time.
//!
//! Every node, every cell and the table itself own an `Aggregator`. The
//! aggregator keeps enough state to answer every `AggregationType`, so the
//! type only decides which figure `result()` reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PivotError;

// ============================================================================
// AGGREGATION TYPE
// ============================================================================

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AggregationType {
    #[default]
    Sum,
    Count,
    Average,
    Min,
    Max,
    Product,
    StdDev,
    StdDevP,
    Var,
    VarP,
}

impl AggregationType {
    pub fn name(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Count => "Count",
            AggregationType::Average => "Average",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::Product => "Product",
            AggregationType::StdDev => "StdDev",
            AggregationType::StdDevP => "StdDevP",
            AggregationType::Var => "Var",
            AggregationType::VarP => "VarP",
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationType {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregationType::Sum),
            "count" => Ok(AggregationType::Count),
            "average" | "avg" | "mean" => Ok(AggregationType::Average),
            "min" | "minimum" => Ok(AggregationType::Min),
            "max" | "maximum" => Ok(AggregationType::Max),
            "product" => Ok(AggregationType::Product),
            "stddev" => Ok(AggregationType::StdDev),
            "stddevp" => Ok(AggregationType::StdDevP),
            "var" | "variance" => Ok(AggregationType::Var),
            "varp" => Ok(AggregationType::VarP),
            _ => Err(PivotError::UnknownAggregation(s.to_string())),
        }
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Running aggregate over a stream of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregator {
    kind: AggregationType,
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    product: Option<f64>,
    /// Welford state for variance/stddev.
    mean: f64,
    m2: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::new(AggregationType::Sum)
    }
}

impl Aggregator {
    pub fn new(kind: AggregationType) -> Self {
        Aggregator {
            kind,
            count: 0,
            sum: 0.0,
            min: None,
            max: None,
            product: None,
            mean: 0.0,
            m2: 0.0,
        }
    }

    pub fn kind(&self) -> AggregationType {
        self.kind
    }

    /// Number of values added so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adds a value. NaN is ignored.
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }

        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        self.product = Some(self.product.map_or(value, |p| p * value));

        let delta = value - self.mean;
        self.mean += delta / (self.count as f64);
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Current aggregate. Zero when nothing has been added.
    pub fn result(&self) -> f64 {
        let n = self.count as f64;
        match self.kind {
            AggregationType::Sum => self.sum,
            AggregationType::Count => n,
            AggregationType::Average => {
                if self.count > 0 {
                    self.sum / n
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
            AggregationType::Product => self.product.unwrap_or(0.0),
            AggregationType::Var => {
                if self.count > 1 {
                    self.m2 / (n - 1.0)
                } else {
                    0.0
                }
            }
            AggregationType::VarP => {
                if self.count > 0 {
                    self.m2 / n
                } else {
                    0.0
                }
            }
            AggregationType::StdDev => {
                if self.count > 1 {
                    (self.m2 / (n - 1.0)).sqrt()
                } else {
                    0.0
                }
            }
            AggregationType::StdDevP => {
                if self.count > 0 {
                    (self.m2 / n).sqrt()
                } else {
                    0.0
                }
            }
        }
    }
}
