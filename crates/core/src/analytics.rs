//! Tracking events for `POST /analytics/event`.

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::profile::{ProfileLink, PublicProfile};
use crate::types::{ProfileId, UserId};

/// Event type names accepted by the analytics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProfileView,
    SocialLinkClick,
    ContactClick,
    CustomLinkClick,
    QrScan,
    ShareProfile,
    DownloadVcard,
}

/// A visitor-session identifier.
///
/// Generated once per session and reused for every event in it: epoch
/// milliseconds followed by nine random base-36 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    const SUFFIX_LEN: usize = 9;

    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..Self::SUFFIX_LEN)
            .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
            .collect();
        Self(format!("{}{suffix}", Utc::now().timestamp_millis()))
    }

    /// Wrap a previously stored identifier.
    #[must_use]
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form context sent with an event. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
}

/// Device class reported for this client. Non-browser user agents fall in
/// the dashboard's `Desktop` bucket.
pub const CLIENT_DEVICE: &str = "Desktop";

/// Browser reported for this client.
pub const CLIENT_BROWSER: &str = "Other";

impl EventMetadata {
    /// Metadata stamped with the current time and this client's device.
    #[must_use]
    pub fn now(session_id: SessionId) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            source: None,
            platform: None,
            url: None,
            contact_type: None,
            value: None,
            referrer: None,
            device: Some(CLIENT_DEVICE.to_owned()),
            browser: Some(CLIENT_BROWSER.to_owned()),
        }
    }
}

/// One analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event_type: EventType,
    pub event_action: String,
    pub profile: Option<ProfileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    pub metadata: EventMetadata,
}

impl AnalyticsEvent {
    /// A profile page was opened.
    #[must_use]
    pub fn profile_view(profile: &PublicProfile, session_id: SessionId) -> Self {
        let mut metadata = EventMetadata::now(session_id);
        metadata.source = Some("direct_visit".to_owned());
        metadata.referrer = Some("direct".to_owned());

        Self {
            event_type: EventType::ProfileView,
            event_action: "view".to_owned(),
            profile: Some(profile.id.clone()),
            user: profile.owner_id().cloned(),
            metadata,
        }
    }

    /// A link on a profile was clicked.
    ///
    /// Social links are `social_link_click` with the platform as action;
    /// custom links are `custom_link_click`; contact and payment links are
    /// `contact_click` with the contact type as action.
    #[must_use]
    pub fn link_click(profile: &PublicProfile, link: &ProfileLink, session_id: SessionId) -> Self {
        let mut metadata = EventMetadata::now(session_id);

        let (event_type, event_action) = match link {
            ProfileLink::Social { platform, url } => {
                metadata.platform = Some(platform.clone());
                metadata.url = Some(url.clone());
                (EventType::SocialLinkClick, platform.clone())
            }
            ProfileLink::Custom { title, url } => {
                metadata.url = Some(url.clone());
                (EventType::CustomLinkClick, title.clone())
            }
            ProfileLink::Email(_)
            | ProfileLink::Phone(_)
            | ProfileLink::Website(_)
            | ProfileLink::Location(_)
            | ProfileLink::Upi { .. } => {
                metadata.contact_type = Some(link.kind().to_owned());
                metadata.value = Some(link.value().to_owned());
                (EventType::ContactClick, link.kind().to_owned())
            }
        };

        Self {
            event_type,
            event_action,
            profile: Some(profile.id.clone()),
            user: profile.owner_id().cloned(),
            metadata,
        }
    }
}
