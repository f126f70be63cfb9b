pub mod auth;
pub mod client;
pub mod leaderboard;
pub mod query;
pub mod registration;
pub mod search;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — rows as the backend stores them
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub player_type: PlayerType,
    pub batting_style: String,
    pub bowling_style: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub runs_scored: u32,
    #[serde(default)]
    pub wickets_taken: u32,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub strike_rate: f64,
    #[serde(default)]
    pub bowling_economy: f64,
    #[serde(default)]
    pub batting_average: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Player {
    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            runs_scored: self.runs_scored,
            wickets_taken: self.wickets_taken,
            matches_played: self.matches_played,
            strike_rate: self.strike_rate,
            bowling_economy: self.bowling_economy,
            batting_average: self.batting_average,
        }
    }
}

/// Performance counters. Written only by the scoring side of the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub runs_scored: u32,
    pub wickets_taken: u32,
    pub matches_played: u32,
    pub strike_rate: f64,
    pub bowling_economy: f64,
    pub batting_average: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    #[default]
    Batter,
    Bowler,
    #[serde(rename = "All-rounder")]
    AllRounder,
}

impl PlayerType {
    pub const ALL: [PlayerType; 3] = [PlayerType::Batter, PlayerType::Bowler, PlayerType::AllRounder];

    pub fn label(&self) -> &'static str {
        match self {
            PlayerType::Batter => "Batter",
            PlayerType::Bowler => "Bowler",
            PlayerType::AllRounder => "All-rounder",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PlayerType::Batter => PlayerType::Bowler,
            PlayerType::Bowler => PlayerType::AllRounder,
            PlayerType::AllRounder => PlayerType::Batter,
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub registration_deadline: NaiveDate,
    pub max_participants: u32,
    #[serde(default)]
    pub entry_fee: f64,
    #[serde(default)]
    pub prize_pool: f64,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Registration is accepted while the tournament is upcoming and the
    /// deadline has not passed.
    pub fn registration_open(&self, today: NaiveDate) -> bool {
        self.status == TournamentStatus::Upcoming && today <= self.registration_deadline
    }

    /// The deadline should fall before the first match day. Nothing enforces
    /// this, so the UI only flags violations.
    pub fn deadline_precedes_start(&self) -> bool {
        self.registration_deadline < self.start_date
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::Ongoing => "ongoing",
            TournamentStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "Upcoming",
            TournamentStatus::Ongoing => "Ongoing",
            TournamentStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRegistration {
    pub id: String,
    pub tournament_id: String,
    pub player_id: String,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Confirmed,
    Cancelled,
}

/// Insert payload for the `players` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub player_type: PlayerType,
    pub batting_style: String,
    pub bowling_style: String,
    pub profile_image: Option<String>,
    pub runs_scored: u32,
    pub wickets_taken: u32,
    pub matches_played: u32,
    pub strike_rate: f64,
    pub bowling_economy: f64,
    pub batting_average: f64,
}

/// Date columns come back either as `2025-05-01` or as a full timestamp,
/// depending on how the column was declared. Only the calendar day matters.
mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let day = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(de::Error::custom)
    }
}
