use crate::Player;
use serde::{Deserialize, Serialize};

/// Metrics the leaderboard can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    RunsScored,
    WicketsTaken,
    BattingAverage,
    StrikeRate,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::RunsScored,
        SortKey::WicketsTaken,
        SortKey::BattingAverage,
        SortKey::StrikeRate,
    ];

    /// Column name in the `players` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::RunsScored => "runs_scored",
            SortKey::WicketsTaken => "wickets_taken",
            SortKey::BattingAverage => "batting_average",
            SortKey::StrikeRate => "strike_rate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::RunsScored => "Runs Scored",
            SortKey::WicketsTaken => "Wickets Taken",
            SortKey::BattingAverage => "Batting Average",
            SortKey::StrikeRate => "Strike Rate",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::RunsScored => SortKey::WicketsTaken,
            SortKey::WicketsTaken => SortKey::BattingAverage,
            SortKey::BattingAverage => SortKey::StrikeRate,
            SortKey::StrikeRate => SortKey::RunsScored,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SortKey::RunsScored => SortKey::StrikeRate,
            SortKey::WicketsTaken => SortKey::RunsScored,
            SortKey::BattingAverage => SortKey::WicketsTaken,
            SortKey::StrikeRate => SortKey::BattingAverage,
        }
    }

    /// The player's value for this metric as shown on the board.
    pub fn format_metric(&self, player: &Player) -> String {
        match self {
            SortKey::RunsScored => player.runs_scored.to_string(),
            SortKey::WicketsTaken => player.wickets_taken.to_string(),
            SortKey::BattingAverage => format!("{:.1}", player.batting_average),
            SortKey::StrikeRate => format!("{:.1}%", player.strike_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub rank: u32,
    pub player: Player,
}

impl RankedPlayer {
    pub fn tier(&self) -> RankTier {
        RankTier::for_rank(self.rank)
    }
}

/// Pair each player with its 1-based position.
///
/// The input is expected in board order already (the backend sorts). Equal
/// metrics still get distinct ranks; whichever came first wins.
pub fn rank(players: Vec<Player>) -> Vec<RankedPlayer> {
    players
        .into_iter()
        .zip(1u32..)
        .map(|(player, rank)| RankedPlayer { rank, player })
        .collect()
}

/// The top three, in rank order, once the board has at least three entries.
pub fn podium(ranked: &[RankedPlayer]) -> Option<&[RankedPlayer]> {
    ranked.get(..3)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Plain(u32),
}

impl RankTier {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            n => RankTier::Plain(n),
        }
    }

    pub fn is_podium(&self) -> bool {
        !matches!(self, RankTier::Plain(_))
    }
}
