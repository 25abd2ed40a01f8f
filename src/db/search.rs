//! Generic free-text filter over an entity's declared columns.
//!
//! Each repository declares which of its columns are searchable; this module
//! turns a single search term into one disjunctive condition across them.
//! Non-text columns are CAST to text so the same predicate works on every
//! column type, and both sides are lowercased so matching stays
//! case-insensitive on every backend.

use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Alias, Condition, Expr, Func};

/// Builds `lower(cast(col as text)) LIKE '%term%'` across `columns`, OR-ed
/// together. Returns `None` for a blank term, which callers treat as "no
/// filter". This is a full-scan predicate with no ranking; it is only
/// suitable for the small row counts this application manages.
#[must_use]
pub fn text_filter<C: ColumnTrait>(columns: &[C], term: &str) -> Option<Condition> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let pattern = format!("%{}%", term.to_lowercase());

    let mut condition = Condition::any();
    for &column in columns {
        let as_text = Expr::col(column).cast_as(Alias::new("text"));
        condition = condition.add(Expr::expr(Func::lower(as_text)).like(pattern.as_str()));
    }

    Some(condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{participants, prelude::Participants};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn test_blank_term_means_no_filter() {
        let columns = [participants::Column::Email];
        assert!(text_filter(&columns, "").is_none());
        assert!(text_filter(&columns, "   ").is_none());
    }

    #[test]
    fn test_filter_casts_and_lowercases_every_column() {
        let columns = [participants::Column::Email, participants::Column::City];
        let condition = text_filter(&columns, "Alice").unwrap();

        let sql = Participants::find()
            .filter(condition)
            .build(DbBackend::Sqlite)
            .to_string();

        assert_eq!(sql.matches("LIKE '%alice%'").count(), 2);
        assert!(sql.contains("CAST("));
        assert!(sql.contains("LOWER("));
        assert!(sql.contains(" OR "));
    }
}
