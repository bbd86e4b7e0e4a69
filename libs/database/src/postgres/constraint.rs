use sea_orm::{DbErr, SqlErr};

/// Integrity constraint that rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// A foreign key points at a missing row, or the row being deleted is still referenced.
    ForeignKey(String),
    /// A unique index already holds the value.
    Unique(String),
}

/// Classifies `err` when it was raised by an integrity constraint.
///
/// Returns `None` for every other kind of database failure.
pub fn constraint_violation(err: &DbErr) -> Option<ConstraintViolation> {
    match err.sql_err()? {
        SqlErr::ForeignKeyConstraintViolation(detail) => Some(ConstraintViolation::ForeignKey(detail)),
        SqlErr::UniqueConstraintViolation(detail) => Some(ConstraintViolation::Unique(detail)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_are_not_classified() {
        assert_eq!(constraint_violation(&DbErr::Custom("boom".to_string())), None);
        assert_eq!(
            constraint_violation(&DbErr::RecordNotFound("product".to_string())),
            None
        );
    }
}
