use crate::{Tournament, TournamentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TournamentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TournamentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(TournamentStatus::Upcoming),
            StatusFilter::Only(TournamentStatus::Upcoming) => StatusFilter::Only(TournamentStatus::Ongoing),
            StatusFilter::Only(TournamentStatus::Ongoing) => StatusFilter::Only(TournamentStatus::Completed),
            StatusFilter::Only(TournamentStatus::Completed) => StatusFilter::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(TournamentStatus::Completed),
            StatusFilter::Only(TournamentStatus::Upcoming) => StatusFilter::All,
            StatusFilter::Only(TournamentStatus::Ongoing) => StatusFilter::Only(TournamentStatus::Upcoming),
            StatusFilter::Only(TournamentStatus::Completed) => StatusFilter::Only(TournamentStatus::Ongoing),
        }
    }
}

/// Tournaments whose name or description contains `query` (ignoring case)
/// and whose status passes `status`. Input order is kept.
pub fn filter_tournaments<'a>(
    tournaments: &'a [Tournament],
    query: &str,
    status: StatusFilter,
) -> Vec<&'a Tournament> {
    let needle = query.to_lowercase();
    tournaments
        .iter()
        .filter(|t| status.matches(t.status))
        .filter(|t| {
            t.name.to_lowercase().contains(&needle) || t.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Message for an empty result list.
pub fn empty_state_hint(query: &str, status: StatusFilter) -> &'static str {
    if !query.is_empty() || status != StatusFilter::All {
        "Try adjusting your search or filter criteria."
    } else {
        "Be the first to create a tournament!"
    }
}
