//! Player profile form: field text, the validation schema, and the option
//! lists the form offers for each cricket specialization.

use crate::client::{ApiError, ApiResult};
use crate::{NewPlayer, PlayerType};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use validator::{Validate, ValidationError};

pub const NOT_APPLICABLE: &str = "Not applicable";

pub const BATTING_STYLES: [&str; 2] = ["Right-handed", "Left-handed"];

pub const BOWLING_STYLES: [&str; 9] = [
    "Right-arm fast",
    "Left-arm fast",
    "Right-arm medium",
    "Left-arm medium",
    "Right-arm off-spin",
    "Left-arm orthodox",
    "Right-arm leg-spin",
    "Left-arm chinaman",
    NOT_APPLICABLE,
];

pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    #[default]
    Name,
    Email,
    Phone,
    Age,
    PlayerType,
    BattingStyle,
    BowlingStyle,
    ProfileImage,
}

impl FormField {
    pub const ORDER: [FormField; 8] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Age,
        FormField::PlayerType,
        FormField::BattingStyle,
        FormField::BowlingStyle,
        FormField::ProfileImage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Full Name",
            FormField::Email => "Email Address",
            FormField::Phone => "Phone Number",
            FormField::Age => "Age",
            FormField::PlayerType => "Player Type",
            FormField::BattingStyle => "Batting Style",
            FormField::BowlingStyle => "Bowling Style",
            FormField::ProfileImage => "Profile Photo (path, optional)",
        }
    }

    fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(FormField::Name),
            "email" => Some(FormField::Email),
            "phone" => Some(FormField::Phone),
            "age" => Some(FormField::Age),
            "player_type" => Some(FormField::PlayerType),
            "batting_style" => Some(FormField::BattingStyle),
            "bowling_style" => Some(FormField::BowlingStyle),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Fields edited by typing, as opposed to picking from a list.
    pub fn is_text(&self) -> bool {
        !matches!(
            self,
            FormField::PlayerType | FormField::BattingStyle | FormField::BowlingStyle
        )
    }
}

/// First failing message per field.
pub type FieldErrors = BTreeMap<FormField, String>;

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub player_type: Option<PlayerType>,
    pub batting_style: String,
    pub bowling_style: String,
    pub image_path: String,
}

/// Form values that passed the schema.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PlayerDraft {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(range(min = 16, max = 50, message = "Age must be between 16 and 50"))]
    pub age: i64,
    #[validate(required(message = "Please select player type"))]
    pub player_type: Option<PlayerType>,
    #[validate(length(min = 1, message = "Please select batting style"))]
    pub batting_style: String,
    #[validate(length(min = 1, message = "Please select bowling style"))]
    pub bowling_style: String,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().count() < MIN_PHONE_DIGITS {
        return Err(ValidationError::new("phone_length")
            .with_message(Cow::Borrowed("Phone number must be at least 10 digits")));
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_digits")
            .with_message(Cow::Borrowed("Phone number must contain digits only")));
    }
    Ok(())
}

impl RegistrationForm {
    /// Pre-fill from the signed-in account, as the email field is read-only.
    pub fn for_account(email: Option<&str>) -> Self {
        Self { email: email.unwrap_or_default().to_owned(), ..Self::default() }
    }

    /// Run the schema. Nothing touches the network until this passes.
    pub fn validate(&self) -> Result<PlayerDraft, FieldErrors> {
        let parsed_age = self.age.trim().parse::<i64>();
        let draft = PlayerDraft {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            age: parsed_age.as_ref().copied().unwrap_or_default(),
            player_type: self.player_type,
            batting_style: self.batting_style.clone(),
            bowling_style: self.bowling_style.clone(),
        };

        let mut errors = FieldErrors::new();
        if let Err(report) = draft.validate() {
            for (name, field_errors) in report.field_errors() {
                let (Some(field), Some(first)) = (FormField::from_schema_name(&name), field_errors.first())
                else {
                    continue;
                };
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field.label().to_lowercase()));
                errors.insert(field, message);
            }
        }
        if parsed_age.is_err() {
            errors.insert(FormField::Age, "Age must be a whole number".into());
        }

        if errors.is_empty() { Ok(draft) } else { Err(errors) }
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Email => Some(&mut self.email),
            FormField::Phone => Some(&mut self.phone),
            FormField::Age => Some(&mut self.age),
            FormField::ProfileImage => Some(&mut self.image_path),
            FormField::PlayerType | FormField::BattingStyle | FormField::BowlingStyle => None,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Age => &self.age,
            FormField::PlayerType => self.player_type.map(|p| p.label()).unwrap_or_default(),
            FormField::BattingStyle => &self.batting_style,
            FormField::BowlingStyle => &self.bowling_style,
            FormField::ProfileImage => &self.image_path,
        }
    }

    /// Change specialization and apply the cross-field policy: a bowler's
    /// batting style collapses to "Not applicable"; a batter's bowling style
    /// is only filled when empty, never cleared.
    pub fn set_player_type(&mut self, player_type: PlayerType) {
        self.player_type = Some(player_type);
        let batting = batting_style_options(self.player_type);
        if !batting.contains(&self.batting_style.as_str()) {
            self.batting_style = if player_type == PlayerType::Bowler {
                NOT_APPLICABLE.to_owned()
            } else {
                String::new()
            };
        }
        if player_type == PlayerType::Batter && self.bowling_style.is_empty() {
            self.bowling_style = NOT_APPLICABLE.to_owned();
        }
    }

    pub fn cycle_player_type(&mut self) {
        let next = self.player_type.map(PlayerType::next).unwrap_or_default();
        self.set_player_type(next);
    }

    pub fn cycle_batting_style(&mut self, forward: bool) {
        self.batting_style = cycle_option(batting_style_options(self.player_type), &self.batting_style, forward);
    }

    pub fn cycle_bowling_style(&mut self, forward: bool) {
        if bowling_style_enabled(self.player_type) {
            self.bowling_style = cycle_option(bowling_style_options(), &self.bowling_style, forward);
        }
    }
}

impl PlayerDraft {
    pub fn into_new_player(self, user_id: &str, profile_image: Option<String>) -> NewPlayer {
        NewPlayer {
            user_id: user_id.to_owned(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            age: u8::try_from(self.age).unwrap_or_default(),
            player_type: self.player_type.unwrap_or_default(),
            batting_style: self.batting_style,
            bowling_style: self.bowling_style,
            profile_image,
            runs_scored: 0,
            wickets_taken: 0,
            matches_played: 0,
            strike_rate: 0.0,
            bowling_economy: 0.0,
            batting_average: 0.0,
        }
    }
}

pub fn batting_style_options(player_type: Option<PlayerType>) -> &'static [&'static str] {
    match player_type {
        Some(PlayerType::Bowler) => &[NOT_APPLICABLE],
        _ => &BATTING_STYLES,
    }
}

pub fn bowling_style_options() -> &'static [&'static str] {
    &BOWLING_STYLES
}

pub fn bowling_style_enabled(player_type: Option<PlayerType>) -> bool {
    player_type != Some(PlayerType::Batter)
}

fn cycle_option(options: &[&str], current: &str, forward: bool) -> String {
    if options.is_empty() {
        return String::new();
    }
    let next = match options.iter().position(|o| *o == current) {
        None if forward => 0,
        None => options.len() - 1,
        Some(i) if forward => (i + 1) % options.len(),
        Some(i) => (i + options.len() - 1) % options.len(),
    };
    options[next].to_owned()
}

/// A picture picked from disk, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub extension: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    pub fn from_path(path: &Path) -> ApiResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let content_type = image_content_type(&extension)
            .ok_or_else(|| ApiError::Other(format!("{} is not an image", path.display())))?;
        let bytes = std::fs::read(path).map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { extension, content_type, bytes })
    }

    /// Object path inside the bucket:
    /// `profiles/<account-id>-<upload-timestamp>.<extension>`.
    pub fn storage_path(&self, account_id: &str, timestamp_ms: i64) -> String {
        format!("profiles/{account_id}-{timestamp_ms}.{}", self.extension)
    }
}

fn image_content_type(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            age: "24".into(),
            player_type: Some(PlayerType::AllRounder),
            batting_style: "Right-handed".into(),
            bowling_style: "Right-arm off-spin".into(),
            image_path: String::new(),
        }
    }

    fn age_error(age: &str) -> Option<String> {
        let form = RegistrationForm { age: age.into(), ..valid_form() };
        form.validate().err().and_then(|e| e.get(&FormField::Age).cloned())
    }

    #[test]
    fn test_valid_form_passes() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.age, 24);
        assert_eq!(draft.player_type, Some(PlayerType::AllRounder));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        assert!(age_error("15").is_some());
        assert!(age_error("51").is_some());
        assert!(age_error("16").is_none());
        assert!(age_error("50").is_none());
        assert_eq!(age_error("twenty").as_deref(), Some("Age must be a whole number"));
        assert_eq!(age_error("").as_deref(), Some("Age must be a whole number"));
    }

    #[test]
    fn test_phone_length_boundary() {
        let short = RegistrationForm { phone: "987654321".into(), ..valid_form() };
        let errors = short.validate().unwrap_err();
        assert_eq!(errors[&FormField::Phone], "Phone number must be at least 10 digits");

        let exact = RegistrationForm { phone: "9876543210".into(), ..valid_form() };
        assert!(exact.validate().is_ok());

        let letters = RegistrationForm { phone: "98765abc10".into(), ..valid_form() };
        assert_eq!(
            letters.validate().unwrap_err()[&FormField::Phone],
            "Phone number must contain digits only"
        );
    }

    #[test]
    fn test_every_field_reports_inline() {
        let errors = RegistrationForm::default().validate().unwrap_err();
        assert_eq!(errors[&FormField::Name], "Name must be at least 2 characters");
        assert_eq!(errors[&FormField::Email], "Invalid email address");
        assert_eq!(errors[&FormField::PlayerType], "Please select player type");
        assert_eq!(errors[&FormField::BattingStyle], "Please select batting style");
        assert_eq!(errors[&FormField::BowlingStyle], "Please select bowling style");
        assert!(errors.contains_key(&FormField::Phone));
        assert!(errors.contains_key(&FormField::Age));
        assert!(!errors.contains_key(&FormField::ProfileImage));
    }

    #[test]
    fn test_name_is_trimmed_before_length_check() {
        let form = RegistrationForm { name: " A ".into(), ..valid_form() };
        assert!(form.validate().unwrap_err().contains_key(&FormField::Name));
    }

    #[test]
    fn test_bowler_batting_options_collapse() {
        assert_eq!(batting_style_options(Some(PlayerType::Bowler)), &[NOT_APPLICABLE]);
        assert_eq!(batting_style_options(None), &BATTING_STYLES);

        let mut form = valid_form();
        form.set_player_type(PlayerType::Bowler);
        assert_eq!(form.batting_style, NOT_APPLICABLE);
        form.cycle_batting_style(true);
        assert_eq!(form.batting_style, NOT_APPLICABLE);
    }

    #[test]
    fn test_batter_keeps_existing_bowling_style() {
        let mut form = valid_form();
        form.set_player_type(PlayerType::Batter);
        assert!(!bowling_style_enabled(form.player_type));
        assert_eq!(form.bowling_style, "Right-arm off-spin");
        form.cycle_bowling_style(true);
        assert_eq!(form.bowling_style, "Right-arm off-spin");

        let mut fresh = RegistrationForm::default();
        fresh.set_player_type(PlayerType::Batter);
        assert_eq!(fresh.bowling_style, NOT_APPLICABLE);
    }

    #[test]
    fn test_leaving_bowler_resets_not_applicable_batting() {
        let mut form = valid_form();
        form.set_player_type(PlayerType::Bowler);
        form.set_player_type(PlayerType::AllRounder);
        assert!(form.batting_style.is_empty());
        form.cycle_batting_style(true);
        assert_eq!(form.batting_style, "Right-handed");
        form.cycle_batting_style(false);
        assert_eq!(form.batting_style, "Left-handed");
    }

    #[test]
    fn test_new_player_starts_with_zero_stats() {
        let player = valid_form()
            .validate()
            .unwrap()
            .into_new_player("u1", Some("https://cdn/x.png".into()));
        assert_eq!(player.user_id, "u1");
        assert_eq!(player.age, 24);
        assert_eq!(player.runs_scored, 0);
        assert_eq!(player.batting_average, 0.0);
        assert_eq!(player.profile_image.as_deref(), Some("https://cdn/x.png"));
    }

    #[test]
    fn test_storage_path_convention() {
        let image = ProfileImage { extension: "jpg".into(), content_type: "image/jpeg", bytes: vec![1] };
        assert_eq!(image.storage_path("acct-7", 1_717_000_000_123), "profiles/acct-7-1717000000123.jpg");
    }

    #[test]
    fn test_profile_image_rejects_non_images() {
        let err = ProfileImage::from_path(Path::new("/tmp/notes.txt")).unwrap_err();
        assert!(err.to_string().contains("is not an image"));
        assert!(ProfileImage::from_path(Path::new("/tmp/logo.svg")).is_err());
    }

    #[test]
    fn test_profile_image_reads_file() {
        let path = std::env::temp_dir().join(format!("crictui-avatar-{}.PNG", std::process::id()));
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let image = ProfileImage::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(image.extension, "png");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
    }

    #[test]
    fn test_form_field_navigation_wraps() {
        assert_eq!(FormField::Name.prev(), FormField::ProfileImage);
        assert_eq!(FormField::ProfileImage.next(), FormField::Name);
        assert!(!FormField::PlayerType.is_text());
    }
}
