// Listing filters: search text, priority and done status

use crate::error::ValidationError;
use crate::task::{Priority, Task};
use std::fmt;
use std::str::FromStr;

/// Filter for `Store::list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring matched against title or notes; blank matches everything
    pub search: String,
    pub priority: PriorityFilter,
    pub status: StatusFilter,
}

impl ListFilter {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn matcher(&self) -> SearchMatcher {
        SearchMatcher::new(&self.search)
    }
}

/// Priority filter; `All` disables it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub(crate) fn value(self) -> Option<Priority> {
        match self {
            PriorityFilter::All => None,
            PriorityFilter::Only(p) => Some(p),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse().map(PriorityFilter::Only)
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => write!(f, "All"),
            PriorityFilter::Only(p) => write!(f, "{}", p),
        }
    }
}

/// Done-status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    /// SQL predicate for this filter, if any
    pub(crate) fn to_sql(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some("done = 0"),
            StatusFilter::Done => Some("done = 1"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "done" => Ok(StatusFilter::Done),
            _ => Err(ValidationError::InvalidStatus { input: s.to_string() }),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Pending => write!(f, "Pending"),
            StatusFilter::Done => write!(f, "Done"),
        }
    }
}

/// Case-insensitive substring matcher over title and notes.
///
/// Matching is done here rather than with SQLite `LIKE`, which folds ASCII
/// only and treats `%`/`_` in the query as wildcards.
pub(crate) struct SearchMatcher {
    needle: Option<String>,
}

impl SearchMatcher {
    fn new(search: &str) -> Self {
        let trimmed = search.trim();
        Self {
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    pub(crate) fn matches(&self, task: &Task) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => task.title.to_lowercase().contains(needle) || task.notes.to_lowercase().contains(needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::now_timestamp;

    fn task(title: &str, notes: &str) -> Task {
        let now = now_timestamp();
        Task {
            id: 1,
            title: title.to_string(),
            notes: notes.to_string(),
            priority: Priority::Medium,
            due_date: None,
            done: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_priority_filter_parse() {
        assert_eq!("All".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "high".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert!("Someday".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn test_status_filter_parse_and_sql() {
        assert_eq!("Pending".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
        assert_eq!("DONE".parse::<StatusFilter>().unwrap(), StatusFilter::Done);
        assert!("Later".parse::<StatusFilter>().is_err());

        assert_eq!(StatusFilter::All.to_sql(), None);
        assert_eq!(StatusFilter::Pending.to_sql(), Some("done = 0"));
        assert_eq!(StatusFilter::Done.to_sql(), Some("done = 1"));
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(PriorityFilter::Only(Priority::Low).to_string(), "Low");
        assert_eq!(StatusFilter::All.to_string(), "All");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let matcher = ListFilter::default().search("MILK").matcher();
        assert!(matcher.matches(&task("Buy milk", "")));
        assert!(matcher.matches(&task("Groceries", "oat Milk, eggs")));
        assert!(!matcher.matches(&task("Read book", "chapter 3")));
    }

    #[test]
    fn test_search_handles_unicode_and_wildcards() {
        let matcher = ListFilter::default().search("ÉTÉ").matcher();
        assert!(matcher.matches(&task("Vacances d'été", "")));

        let percent = ListFilter::default().search("50%").matcher();
        assert!(percent.matches(&task("Discount 50% off", "")));
        assert!(!percent.matches(&task("Discount 500 off", "")));
    }

    #[test]
    fn test_blank_search_matches_all() {
        let matcher = ListFilter::default().search("   ").matcher();
        assert!(matcher.matches(&task("anything", "")));
    }
}
