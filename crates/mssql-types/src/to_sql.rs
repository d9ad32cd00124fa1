//! Trait for converting Rust types to SQL values.

use bytes::Bytes;

use crate::error::TypeError;
use crate::value::SqlValue;
use crate::vector::{NullVector, Vector};

/// Trait for types that can be converted to SQL values.
///
/// Vector-like types produce [`SqlValue::Vector`]; the session turns that
/// into its negotiated wire form.
pub trait ToSql {
    /// Convert this value to a SQL value.
    fn to_sql(&self) -> Result<SqlValue, TypeError>;

    /// Get the SQL type name for this value.
    fn sql_type(&self) -> &'static str;
}

impl ToSql for str {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::String(self.to_owned()))
    }

    fn sql_type(&self) -> &'static str {
        "NVARCHAR"
    }
}

impl ToSql for String {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::String(self.clone()))
    }

    fn sql_type(&self) -> &'static str {
        "NVARCHAR"
    }
}

impl ToSql for [u8] {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::Binary(Bytes::copy_from_slice(self)))
    }

    fn sql_type(&self) -> &'static str {
        "VARBINARY"
    }
}

impl ToSql for Vector {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::Vector(self.clone()))
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl ToSql for NullVector {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        match self.vector() {
            Some(v) => v.to_sql(),
            None => Ok(SqlValue::Null),
        }
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl ToSql for [f32] {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Vector::new(self.to_vec()).map(SqlValue::Vector)
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl ToSql for Vec<f32> {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        self.as_slice().to_sql()
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl ToSql for [f64] {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Vector::from_f64(self).map(SqlValue::Vector)
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl ToSql for Vec<f64> {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        self.as_slice().to_sql()
    }

    fn sql_type(&self) -> &'static str {
        "VECTOR"
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        match self {
            Some(v) => v.to_sql(),
            None => Ok(SqlValue::Null),
        }
    }

    fn sql_type(&self) -> &'static str {
        match self {
            Some(v) => v.sql_type(),
            None => "NULL",
        }
    }
}

impl<T: ToSql + ?Sized> ToSql for &T {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        (*self).to_sql()
    }

    fn sql_type(&self) -> &'static str {
        (*self).sql_type()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::vector::VectorElementType;

    #[test]
    fn test_to_sql_f32_slice() {
        let value = vec![1.0f32, 2.0, 3.0].to_sql().unwrap();
        let vector = value.as_vector().unwrap();
        assert_eq!(vector.element_type(), VectorElementType::Float32);
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_to_sql_f64_narrows() {
        let value = vec![0.25f64, -8.0].to_sql().unwrap();
        assert_eq!(value.as_vector().unwrap().as_slice(), &[0.25, -8.0]);
    }

    #[test]
    fn test_to_sql_empty_slice_fails() {
        let empty: Vec<f32> = Vec::new();
        assert!(matches!(
            empty.to_sql(),
            Err(TypeError::InvalidDimensions { dimensions: 0, .. })
        ));
    }

    #[test]
    fn test_to_sql_keeps_element_type() {
        let v = Vector::with_element_type(VectorElementType::Float16, vec![1.5]).unwrap();
        let value = v.to_sql().unwrap();
        assert_eq!(
            value.as_vector().unwrap().element_type(),
            VectorElementType::Float16
        );
        assert_eq!(v.sql_type(), "VECTOR");
    }

    #[test]
    fn test_to_sql_null_vector() {
        assert!(NullVector::null().to_sql().unwrap().is_null());
        let valid = NullVector::from(Vector::new(vec![1.0]).unwrap());
        assert!(valid.to_sql().unwrap().as_vector().is_some());
    }

    #[test]
    fn test_to_sql_option() {
        let none: Option<Vector> = None;
        assert!(none.to_sql().unwrap().is_null());
        assert_eq!(none.sql_type(), "NULL");

        let text = Some("hello".to_string());
        assert_eq!(text.to_sql().unwrap().as_str(), Some("hello"));
        assert_eq!(text.sql_type(), "NVARCHAR");
    }
}
