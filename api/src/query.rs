//! Row-select queries in the PostgREST query-string dialect.
//!
//! Only the operators the client needs: equality filters, a single
//! ordering and a row limit.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: &'static str,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Select {
    pub fn from(table: &'static str) -> Self {
        Self { table, filters: Vec::new(), order: None, limit: None }
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_owned(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_owned(), direction));
        self
    }

    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Path and query relative to the REST root, e.g.
    /// `players?select=*&order=runs_scored.desc&limit=50`.
    pub fn to_path(&self) -> String {
        format!("{}?{}", self.table, self)
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("select=*")?;
        for (column, value) in &self.filters {
            write!(f, "&{column}=eq.{}", urlencoding::encode(value))?;
        }
        if let Some((column, direction)) = &self.order {
            write!(f, "&order={column}.{}", direction.as_str())?;
        }
        if let Some(limit) = self.limit {
            write!(f, "&limit={limit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_select() {
        assert_eq!(Select::from("tournaments").to_path(), "tournaments?select=*");
    }

    #[test]
    fn test_leaderboard_shape() {
        let q = Select::from("players").order("wickets_taken", Direction::Descending).limit(50);
        assert_eq!(q.to_path(), "players?select=*&order=wickets_taken.desc&limit=50");
    }

    #[test]
    fn test_filter_values_are_encoded() {
        let q = Select::from("players").eq("email", "a b&c@example.com");
        assert_eq!(q.to_string(), "select=*&email=eq.a%20b%26c%40example.com");
    }

    #[test]
    fn test_filters_precede_order_and_limit() {
        let q = Select::from("tournaments")
            .limit(3)
            .order("start_date", Direction::Ascending)
            .eq("status", "upcoming");
        assert_eq!(
            q.to_path(),
            "tournaments?select=*&status=eq.upcoming&order=start_date.asc&limit=3"
        );
    }
}
