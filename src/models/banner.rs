use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Banner {
    pub id: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub message: String,
    /// Set only while `message` is non-empty.
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl Banner {
    /// The EMPTY state of banner `id`.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        !self.message.is_empty()
    }

    /// Applies the fields present in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: &UpdateBanner) {
        if let Some(icon) = &update.icon {
            self.icon = icon.clone();
        }
        if let Some(message) = &update.message {
            self.message = message.clone();
        }
    }
}

/// Partial update: absent JSON fields deserialize to `None` and are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBanner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_banner_is_inactive() {
        let banner = Banner::empty("sparky");
        assert_eq!(banner.id, "sparky");
        assert!(!banner.is_active());
        assert!(banner.expires.is_none());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut banner = Banner::empty("lightning");
        banner.icon = "bolt".into();

        let update: UpdateBanner = serde_json::from_str(r#"{"message":"Storm ahead"}"#).unwrap();
        banner.apply(&update);

        assert_eq!(banner.icon, "bolt");
        assert_eq!(banner.message, "Storm ahead");
        assert!(banner.is_active());
    }

    #[test]
    fn test_banner_json_shape() {
        let banner = Banner::empty("sparky");
        let value = serde_json::to_value(&banner).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": "sparky", "icon": "", "message": "", "expires": null })
        );
    }

    #[test]
    fn test_banner_deserializes_with_missing_fields() {
        let banner: Banner = serde_json::from_str(r#"{"id":"sparky","message":"hi"}"#).unwrap();
        assert_eq!(banner.icon, "");
        assert!(banner.expires.is_none());
    }
}
