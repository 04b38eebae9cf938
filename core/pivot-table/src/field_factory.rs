//! FILENAME: core/pivot-table/src/field_factory.rs
//! Shorthand constructors for the common field variants.

use crate::error::PivotResult;
use crate::field::{FieldKind, PivotField};

/// Stateless constructors for configured `PivotField`s.
pub struct PivotFieldFactory;

impl PivotFieldFactory {
    pub fn of_kind(name: &str, kind: FieldKind) -> PivotResult<PivotField> {
        Ok(PivotField::new(name)?.with_kind(kind))
    }

    pub fn titled(name: &str, title: &str, kind: FieldKind) -> PivotResult<PivotField> {
        Ok(Self::of_kind(name, kind)?.with_title(title))
    }

    pub fn default(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Default)
    }

    pub fn default_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Default)
    }

    pub fn integer(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Integer)
    }

    pub fn integer_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Integer)
    }

    pub fn float(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Float)
    }

    pub fn float_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Float)
    }

    pub fn year(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Year)
    }

    pub fn year_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Year)
    }

    pub fn semester(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Semester)
    }

    pub fn semester_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Semester)
    }

    pub fn quarter(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Quarter)
    }

    pub fn quarter_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Quarter)
    }

    pub fn month(name: &str) -> PivotResult<PivotField> {
        Self::of_kind(name, FieldKind::Month)
    }

    pub fn month_titled(name: &str, title: &str) -> PivotResult<PivotField> {
        Self::titled(name, title, FieldKind::Month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SortOrder;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(PivotFieldFactory::default("a").unwrap().kind(), FieldKind::Default);
        assert_eq!(PivotFieldFactory::integer("a").unwrap().kind(), FieldKind::Integer);
        assert_eq!(PivotFieldFactory::float("a").unwrap().kind(), FieldKind::Float);
        assert_eq!(PivotFieldFactory::year("a").unwrap().kind(), FieldKind::Year);
        assert_eq!(PivotFieldFactory::semester("a").unwrap().kind(), FieldKind::Semester);
        assert_eq!(PivotFieldFactory::quarter("a").unwrap().kind(), FieldKind::Quarter);
        assert_eq!(PivotFieldFactory::month("a").unwrap().kind(), FieldKind::Month);
    }

    #[test]
    fn test_titled_variant() {
        let field = PivotFieldFactory::month_titled("created_at", "Month").unwrap();
        assert_eq!(field.name(), "created_at");
        assert_eq!(field.title(), "Month");
        assert_eq!(field.sort_order(), SortOrder::Ascending);
        assert!(!field.has_key_transform());
    }

    #[test]
    fn test_empty_name_fails() {
        assert!(PivotFieldFactory::year("").is_err());
    }
}
