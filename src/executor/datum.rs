//! Datum type - runtime values in the executor

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::catalog::DataType;
use crate::planner::query::Literal;

/// A single value in a row
#[derive(Debug, Clone, Default)]
pub enum Datum {
    /// NULL value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl Datum {
    /// Check if this datum is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Get a numeric type tag for ordering different types
    fn type_tag(&self) -> u8 {
        match self {
            Datum::Null => 0,
            Datum::Bool(_) => 1,
            Datum::Int(_) | Datum::Float(_) => 2,
            Datum::String(_) => 3,
        }
    }

    /// Get the data type of this datum
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Datum::Null => None,
            Datum::Bool(_) => Some(DataType::Boolean),
            Datum::Int(_) => Some(DataType::Int),
            Datum::Float(_) => Some(DataType::Double),
            Datum::String(_) => Some(DataType::Text),
        }
    }

    /// Whether this datum may be stored in a column of the given type.
    ///
    /// NULL fits every type; nullability is checked separately.
    pub fn fits(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Datum::Null, _) => true,
            (Datum::Bool(_), DataType::Boolean) => true,
            (Datum::Int(_), DataType::Int) => true,
            (Datum::Float(_), DataType::Double) => true,
            (Datum::String(_), DataType::Text) => true,
            _ => false,
        }
    }

    /// Convert to i64, returns None if NULL or not an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Datum::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to f64, returns None if NULL or not numeric
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Datum::Float(f) => Some(*f),
            Datum::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert to string reference, returns None if NULL or not a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    /// Create a Datum from a Literal
    pub fn from_literal(lit: &Literal) -> Self {
        match lit {
            Literal::Null => Datum::Null,
            Literal::Boolean(b) => Datum::Bool(*b),
            Literal::Integer(i) => Datum::Int(*i),
            Literal::Float(f) => Datum::Float(*f),
            Literal::String(s) => Datum::String(s.clone()),
        }
    }

    /// SQL comparison: None if either side is NULL or the kinds differ
    pub fn sql_cmp(&self, other: &Datum) -> Option<Ordering> {
        if self.is_null() || other.is_null() || self.type_tag() != other.type_tag() {
            return None;
        }
        Some(self.cmp(other))
    }

    /// Round a numeric value half away from zero to `places` decimals.
    ///
    /// Integers and non-numeric values are returned unchanged.
    pub fn round(&self, places: u32) -> Datum {
        match self {
            Datum::Float(f) => Datum::Float(round_half_away_from_zero(*f, places)),
            other => other.clone(),
        }
    }
}

/// Rounds in decimal on the shortest representation of `value`, so 2.675
/// rounds to 2.68 even though its binary value sits just below the midpoint.
pub(crate) fn round_half_away_from_zero(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    match Decimal::from_str(&value.to_string()) {
        Ok(d) => d
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
            .parse()
            .unwrap_or(value),
        // Out of Decimal's range; fall back to binary rounding
        Err(_) => {
            let factor = 10f64.powi(places.min(308) as i32);
            let scaled = value * factor;
            if scaled.is_finite() {
                scaled.round() / factor
            } else {
                // Too large to carry a fractional part
                value
            }
        }
    }
}

/// Integral f64 values that fit in an i64 compare and hash as that integer.
pub(crate) fn integral(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

fn cmp_float(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn cmp_int_float(a: i64, b: f64) -> Ordering {
    match integral(b) {
        Some(b) => a.cmp(&b),
        None => cmp_float(a as f64, b),
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Datum::Null, Datum::Null) => true,
            (Datum::Bool(a), Datum::Bool(b)) => a == b,
            (Datum::Int(a), Datum::Int(b)) => a == b,
            (Datum::Float(a), Datum::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Datum::String(a), Datum::String(b)) => a == b,
            // Cross-type numeric comparisons
            (Datum::Int(a), Datum::Float(b)) | (Datum::Float(b), Datum::Int(a)) => {
                integral(*b) == Some(*a)
            }
            _ => false,
        }
    }
}

impl Eq for Datum {}

impl PartialOrd for Datum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Datum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // NULLs sort first (smallest)
            (Datum::Null, Datum::Null) => Ordering::Equal,
            (Datum::Null, _) => Ordering::Less,
            (_, Datum::Null) => Ordering::Greater,

            (Datum::Bool(a), Datum::Bool(b)) => a.cmp(b),
            (Datum::Int(a), Datum::Int(b)) => a.cmp(b),
            (Datum::Float(a), Datum::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    Ordering::Equal
                } else {
                    cmp_float(*a, *b)
                }
            }
            (Datum::String(a), Datum::String(b)) => a.cmp(b),

            // Cross-type numeric comparisons
            (Datum::Int(a), Datum::Float(b)) => cmp_int_float(*a, *b),
            (Datum::Float(a), Datum::Int(b)) => cmp_int_float(*b, *a).reverse(),

            // Different types: use type tag for stable ordering
            _ => self.type_tag().cmp(&other.type_tag()),
        }
    }
}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_tag().hash(state);
        match self {
            Datum::Null => {}
            Datum::Bool(b) => b.hash(state),
            Datum::Int(i) => i.hash(state),
            Datum::Float(f) => match integral(*f) {
                Some(i) => i.hash(state),
                None if f.is_nan() => f64::NAN.to_bits().hash(state),
                None => f.to_bits().hash(state),
            },
            Datum::String(s) => s.hash(state),
        }
    }
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Datum::Null => serializer.serialize_none(),
            Datum::Bool(b) => serializer.serialize_bool(*b),
            Datum::Int(i) => serializer.serialize_i64(*i),
            Datum::Float(f) => serializer.serialize_f64(*f),
            Datum::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int(i64::from(v))
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::String(v)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}
