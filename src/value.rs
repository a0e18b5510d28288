//! Values that can be written to a cache file.
//!
//! Every format stores a single column of [`Scalar`]s. A scalar result is a column of one row;
//! a sequence is a column with one row per element. Text tables hand back every cell as
//! [`Scalar::Text`]; the typed conversions parse it.

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Int(i64),
    /// Unsigned values above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// The on-disk shape of a cached result.
pub type Column = Vec<Scalar>;

/// Largest magnitude up to which every integer is an exact `f64`.
const MAX_EXACT_INT: u64 = 1 << 53;
const MAX_EXACT_FLOAT: f64 = MAX_EXACT_INT as f64;

impl Scalar {
    fn integer(value: i128) -> Scalar {
        match i64::try_from(value) {
            Ok(i) => Scalar::Int(i),
            Err(_) => u64::try_from(value)
                .map_or_else(|_| Scalar::Text(value.to_string()), Scalar::UInt),
        }
    }

    /// The integer this scalar holds exactly, if any. Floats count only while they are whole
    /// and within the exact range of `f64`.
    fn whole_number(&self) -> Option<i128> {
        match self {
            Scalar::Int(i) => Some(i128::from(*i)),
            Scalar::UInt(u) => Some(i128::from(*u)),
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => Some(*f as i128),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integers that a `f64` represents exactly, as that `f64`.
    pub(crate) fn exact_float(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) if i.unsigned_abs() <= MAX_EXACT_INT => Some(*i as f64),
            Scalar::UInt(u) if *u <= MAX_EXACT_INT => Some(*u as f64),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "boolean",
            Scalar::Text(_) => "text",
        }
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind(), self)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// A Rust type that maps onto one [`Scalar`].
pub trait ScalarValue: Sized {
    const TYPE_NAME: &'static str;

    fn to_scalar(&self) -> Scalar;
    fn from_scalar(scalar: Scalar) -> Result<Self>;
}

/// A result that can be stored in a cache file and read back.
///
/// Loading unwraps a single-row column into a scalar, so a stored scalar compares equal to
/// the freshly computed one.
pub trait Persist: Sized {
    fn to_column(&self) -> Column;
    fn from_column(column: Column) -> Result<Self>;
}

fn conversion_error(expected: &'static str, found: &Scalar) -> Error {
    Error::Conversion {
        expected,
        found: found.describe(),
    }
}

impl ScalarValue for Scalar {
    const TYPE_NAME: &'static str = "scalar";

    fn to_scalar(&self) -> Scalar {
        self.clone()
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        Ok(scalar)
    }
}

macro_rules! integer_scalar {
    ($($t:ty),*) => {$(
        impl ScalarValue for $t {
            const TYPE_NAME: &'static str = stringify!($t);

            fn to_scalar(&self) -> Scalar {
                i128::try_from(*self)
                    .map_or_else(|_| Scalar::Text(self.to_string()), Scalar::integer)
            }

            fn from_scalar(scalar: Scalar) -> Result<Self> {
                scalar
                    .whole_number()
                    .and_then(|i| <$t>::try_from(i).ok())
                    .ok_or_else(|| conversion_error(Self::TYPE_NAME, &scalar))
            }
        }
    )*};
}

integer_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ScalarValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match &scalar {
            Scalar::Float(f) => Ok(*f),
            Scalar::Int(i) => Ok(*i as f64),
            Scalar::UInt(u) => Ok(*u as f64),
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| conversion_error(Self::TYPE_NAME, &scalar)),
            Scalar::Bool(_) => Err(conversion_error(Self::TYPE_NAME, &scalar)),
        }
    }
}

impl ScalarValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        f64::from_scalar(scalar).map(|f| f as f32)
    }
}

impl ScalarValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match &scalar {
            Scalar::Bool(b) => Ok(*b),
            Scalar::Int(0) => Ok(false),
            Scalar::Int(1) => Ok(true),
            Scalar::Text(s) => match s.trim() {
                "true" | "True" | "TRUE" => Ok(true),
                "false" | "False" | "FALSE" => Ok(false),
                _ => Err(conversion_error(Self::TYPE_NAME, &scalar)),
            },
            _ => Err(conversion_error(Self::TYPE_NAME, &scalar)),
        }
    }
}

impl ScalarValue for String {
    const TYPE_NAME: &'static str = "String";

    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.clone())
    }

    // Text cells come back verbatim; numbers from binary or spreadsheet files as their rendering.
    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::Text(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}

macro_rules! scalar_persist {
    ($($t:ty),*) => {$(
        impl Persist for $t {
            fn to_column(&self) -> Column {
                vec![self.to_scalar()]
            }

            fn from_column(mut column: Column) -> Result<Self> {
                if column.len() != 1 {
                    return Err(Error::Conversion {
                        expected: <$t as ScalarValue>::TYPE_NAME,
                        found: format!("a column of {} values", column.len()),
                    });
                }
                <$t as ScalarValue>::from_scalar(column.remove(0))
            }
        }
    )*};
}

scalar_persist!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Scalar
);

impl<T: ScalarValue> Persist for Vec<T> {
    fn to_column(&self) -> Column {
        self.iter().map(ScalarValue::to_scalar).collect()
    }

    fn from_column(column: Column) -> Result<Self> {
        column.into_iter().map(T::from_scalar).collect()
    }
}
