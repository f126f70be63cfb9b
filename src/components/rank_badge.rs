use cricket_api::leaderboard::RankTier;
use tui::style::{Color, Modifier, Style};
use tui::text::Span;

pub const GOLD: Color = Color::Rgb(234, 179, 8);
pub const SILVER: Color = Color::Rgb(156, 163, 175);
pub const BRONZE: Color = Color::Rgb(217, 119, 6);

/// Accent color for a leaderboard position.
pub fn tier_color(tier: RankTier) -> Color {
    match tier {
        RankTier::Gold => GOLD,
        RankTier::Silver => SILVER,
        RankTier::Bronze => BRONZE,
        RankTier::Plain(_) => Color::DarkGray,
    }
}

pub fn tier_label(tier: RankTier) -> String {
    match tier {
        RankTier::Gold => "1st".to_string(),
        RankTier::Silver => "2nd".to_string(),
        RankTier::Bronze => "3rd".to_string(),
        RankTier::Plain(rank) => format!("#{rank}"),
    }
}

/// Colored rank cell for the board table.
pub fn rank_badge(tier: RankTier) -> Span<'static> {
    let mut style = Style::default().fg(tier_color(tier));
    if tier.is_podium() {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(format!("{:>4}", tier_label(tier)), style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_podium_badges() {
        assert_eq!(tier_label(RankTier::Gold), "1st");
        assert_eq!(tier_color(RankTier::Silver), SILVER);
        assert_eq!(rank_badge(RankTier::Bronze).content, " 3rd");
        assert!(rank_badge(RankTier::Gold).style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_plain_rank_badge() {
        let badge = rank_badge(RankTier::Plain(12));
        assert_eq!(badge.content, " #12");
        assert_eq!(badge.style.fg, Some(Color::DarkGray));
        assert!(!badge.style.add_modifier.contains(Modifier::BOLD));
    }
}
