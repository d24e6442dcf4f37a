//! MySQL to BigQuery column type conversion.
//!
//! The mapping is a fixed table matched by exact type class. A type that is
//! not listed fails with [`Mysql2BqError::UnknownType`] and is never mapped to
//! a fallback such as `STRING`.

use crate::Result;
use crate::error::Mysql2BqError;
use crate::models::{SourceType, TargetType};

/// The fixed conversion table, in documentation order.
pub const TYPE_MAPPING: &[(SourceType, TargetType)] = &[
    (SourceType::TinyInt, TargetType::Boolean),
    (SourceType::SmallInt, TargetType::Integer),
    (SourceType::Integer, TargetType::Integer),
    (SourceType::Timestamp, TargetType::Timestamp),
    (SourceType::DateTime, TargetType::Datetime),
    (SourceType::VarChar, TargetType::String),
    (SourceType::TinyText, TargetType::String),
    (SourceType::Text, TargetType::String),
    (SourceType::MediumText, TargetType::String),
    (SourceType::LongText, TargetType::String),
    (SourceType::Enum, TargetType::String),
];

/// Maps a MySQL type class to its BigQuery column type.
///
/// # Errors
/// Returns [`Mysql2BqError::UnknownType`] carrying the type name when the
/// source type is not in [`TYPE_MAPPING`].
///
/// # Example
/// ```rust
/// use mysql2bq_core::models::{SourceType, TargetType};
/// use mysql2bq_core::typemap::map_type;
///
/// assert_eq!(map_type(&SourceType::TinyInt).unwrap(), TargetType::Boolean);
/// assert!(map_type(&SourceType::from_mysql("inet")).is_err());
/// ```
pub fn map_type(source_type: &SourceType) -> Result<TargetType> {
    match source_type {
        SourceType::TinyInt => Ok(TargetType::Boolean),
        SourceType::SmallInt | SourceType::Integer => Ok(TargetType::Integer),
        SourceType::Timestamp => Ok(TargetType::Timestamp),
        SourceType::DateTime => Ok(TargetType::Datetime),
        SourceType::VarChar
        | SourceType::TinyText
        | SourceType::Text
        | SourceType::MediumText
        | SourceType::LongText
        | SourceType::Enum => Ok(TargetType::String),
        SourceType::Other(type_name) => Err(Mysql2BqError::unknown_type(type_name.to_uppercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mapping_table_agrees_with_map_type() {
        for (source, target) in TYPE_MAPPING {
            assert_eq!(map_type(source).unwrap(), *target, "mismatch for {}", source);
        }
    }

    #[test]
    fn test_tinyint_is_boolean() {
        assert_eq!(map_type(&SourceType::TinyInt).unwrap(), TargetType::Boolean);
    }

    #[test]
    fn test_text_family_is_string() {
        for name in ["varchar", "tinytext", "text", "mediumtext", "longtext", "enum"] {
            assert_eq!(
                map_type(&SourceType::from_mysql(name)).unwrap(),
                TargetType::String,
                "{} should map to STRING",
                name
            );
        }
    }

    #[test]
    fn test_foreign_dialect_type_fails() {
        // INET exists only in PostgreSQL
        let error = map_type(&SourceType::from_mysql("inet")).unwrap_err();
        assert!(matches!(error, Mysql2BqError::UnknownType { .. }));
        assert_eq!(error.unknown_type_name(), Some("INET"));
    }

    #[test]
    fn test_unlisted_mysql_types_fail() {
        for name in ["bigint", "mediumint", "decimal", "date", "json", "blob", "char", "set"] {
            assert!(
                map_type(&SourceType::from_mysql(name)).is_err(),
                "{} must not be mapped",
                name
            );
        }
    }

    proptest! {
        #[test]
        fn prop_recognized_types_are_total_and_deterministic(index in 0..TYPE_MAPPING.len()) {
            let (source, _) = &TYPE_MAPPING[index];
            let first = map_type(source).unwrap();
            let second = map_type(&source.clone()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_unrecognized_names_always_fail(name in "[a-z]{3,12}") {
            let source = SourceType::from_mysql(&name);
            prop_assume!(matches!(source, SourceType::Other(_)));
            prop_assert!(map_type(&source).is_err());
            prop_assert!(map_type(&source).is_err());
        }
    }
}
