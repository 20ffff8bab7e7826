use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// What kind of account a registered channel belongs to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "text", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ChannelCategory {
    Artist,
    Label,
    Media,
    #[default]
    Other,
}

impl ChannelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelCategory::Artist => "artist",
            ChannelCategory::Label => "label",
            ChannelCategory::Media => "media",
            ChannelCategory::Other => "other",
        }
    }
}

impl Display for ChannelCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist" => Ok(ChannelCategory::Artist),
            "label" => Ok(ChannelCategory::Label),
            "media" => Ok(ChannelCategory::Media),
            "other" => Ok(ChannelCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid channel category: {}", s)),
        }
    }
}

/// A YouTube channel whose RSS feed is pulled by the video sync.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Channel {
    pub id: Uuid,
    /// YouTube channel id (`UC…`)
    pub channel_id: String,
    pub name: String,
    pub handle: Option<String>,
    pub category: ChannelCategory,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for registering a channel.
///
/// `channel` accepts a raw channel id, an `@handle` or a channel URL.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateChannelRequest {
    #[validate(length(min = 2, max = 200, message = "channel must be between 2 and 200 characters"))]
    pub channel: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "name must be between 1 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<ChannelCategory>,
}

/// Request DTO for updating a channel. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateChannelRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "name must be between 1 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<ChannelCategory>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_through_str() {
        for category in [
            ChannelCategory::Artist,
            ChannelCategory::Label,
            ChannelCategory::Media,
            ChannelCategory::Other,
        ] {
            assert_eq!(category.as_str().parse::<ChannelCategory>().unwrap(), category);
        }
        assert!("podcast".parse::<ChannelCategory>().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateChannelRequest {
            channel: "x".to_string(),
            name: None,
            category: None,
        };
        assert!(request.validate().is_err());

        let request = CreateChannelRequest {
            channel: "@lukecombs".to_string(),
            name: Some("Luke Combs".to_string()),
            category: Some(ChannelCategory::Artist),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let update = UpdateChannelRequest {
            name: Some("   ".to_string()),
            category: None,
            is_active: None,
        };
        let err = update.validate().unwrap_err();
        assert!(err.to_string().contains("blank"));

        let create = CreateChannelRequest {
            channel: "@lukecombs".to_string(),
            name: Some("\t".to_string()),
            category: None,
        };
        assert!(create.validate().is_err());

        let update = UpdateChannelRequest {
            name: Some("  Luke Combs ".to_string()),
            category: None,
            is_active: Some(false),
        };
        assert!(update.validate().is_ok());
    }
}
