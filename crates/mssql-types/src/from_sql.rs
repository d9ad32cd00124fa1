//! Trait for converting from SQL values to Rust types.

use crate::error::TypeError;
use crate::value::SqlValue;
use crate::vector::{NullVector, Vector};

/// Trait for types that can be converted from SQL values.
///
/// Vector conversions here accept only decoded [`SqlValue::Vector`] values.
/// Wire forms are decoded by the session, which knows the negotiated format.
pub trait FromSql: Sized {
    /// Convert from a SQL value to this type.
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError>;

    /// Convert from an optional SQL value.
    ///
    /// Returns `None` if the value is NULL.
    fn from_sql_nullable(value: &SqlValue) -> Result<Option<Self>, TypeError> {
        if value.is_null() {
            Ok(None)
        } else {
            Self::from_sql(value).map(Some)
        }
    }
}

fn mismatch(expected: &'static str, value: &SqlValue) -> TypeError {
    TypeError::TypeMismatch {
        expected,
        actual: value.type_name().to_string(),
    }
}

impl FromSql for String {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        match value {
            SqlValue::String(s) => Ok(s.clone()),
            SqlValue::Null => Err(TypeError::UnexpectedNull),
            _ => Err(mismatch("String", value)),
        }
    }
}

impl FromSql for bytes::Bytes {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        match value {
            SqlValue::Binary(b) => Ok(b.clone()),
            SqlValue::Null => Err(TypeError::UnexpectedNull),
            _ => Err(mismatch("Bytes", value)),
        }
    }
}

impl FromSql for Vector {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        match value {
            SqlValue::Vector(v) => Ok(v.clone()),
            SqlValue::Null => Err(TypeError::UnexpectedNull),
            _ => Err(mismatch("Vector", value)),
        }
    }
}

impl FromSql for NullVector {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        Vector::from_sql_nullable(value).map(NullVector::from)
    }
}

impl FromSql for Vec<f32> {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        Vector::from_sql(value).map(Vector::into_inner)
    }
}

impl FromSql for Vec<f64> {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        let vector = Vector::from_sql(value)?;
        Ok(vector.as_slice().iter().map(|&v| f64::from(v)).collect())
    }
}

impl<T: FromSql> FromSql for Option<T> {
    fn from_sql(value: &SqlValue) -> Result<Self, TypeError> {
        T::from_sql_nullable(value)
    }
}
