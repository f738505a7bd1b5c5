//! The session user.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// A logged-in customer as returned by the backend's auth endpoints.
///
/// The address fields are optional; a user who has not entered all four
/// cannot pick a delivery method and has no cart indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

impl User {
    /// Whether all four delivery address fields are present and non-blank.
    #[must_use]
    pub fn has_delivery_address(&self) -> bool {
        [&self.address, &self.city, &self.state, &self.zip]
            .into_iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Single-line address, e.g. `"12 Elm St, Austin, TX 78701"`.
    #[must_use]
    pub fn delivery_address(&self) -> Option<String> {
        if !self.has_delivery_address() {
            return None;
        }
        Some(format!(
            "{}, {}, {} {}",
            self.address.as_deref().unwrap_or_default(),
            self.city.as_deref().unwrap_or_default(),
            self.state.as_deref().unwrap_or_default(),
            self.zip.as_deref().unwrap_or_default(),
        ))
    }

    /// Name shown in the navigation dropdown.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn demo_user() -> User {
        User {
            id: UserId::new(1),
            username: "demo".to_string(),
            email: Email::parse("demo@aa.io").unwrap(),
            first_name: Some("Demo".to_string()),
            last_name: Some("User".to_string()),
            address: Some("12 Elm St".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            zip: Some("78701".to_string()),
        }
    }

    #[test]
    fn test_full_address_enables_delivery() {
        let user = demo_user();
        assert!(user.has_delivery_address());
        assert_eq!(
            user.delivery_address().as_deref(),
            Some("12 Elm St, Austin, TX 78701")
        );
    }

    #[test]
    fn test_any_missing_field_disables_delivery() {
        let mut user = demo_user();
        user.zip = None;
        assert!(!user.has_delivery_address());

        let mut user = demo_user();
        user.city = Some("  ".to_string());
        assert!(!user.has_delivery_address());
        assert_eq!(user.delivery_address(), None);
    }

    #[test]
    fn test_deserialize_without_address() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "username": "marnie", "email": "marnie@aa.io"}"#,
        )
        .unwrap();
        assert!(!user.has_delivery_address());
        assert_eq!(user.display_name(), "marnie");
    }
}
