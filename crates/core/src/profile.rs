//! Public profile document served by `GET /profiles/public/:username`.
//!
//! The client only reads profiles. Outbound links are modelled as
//! [`ProfileLink`] so that each click can be tracked and resolved to a
//! destination the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{ProfileId, UserId};
use crate::upi::UpiPaymentLink;

/// A public digital business card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(rename = "_id")]
    pub id: ProfileId,
    #[serde(default)]
    pub user: Option<ProfileOwner>,
    #[serde(default)]
    pub username: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub colors: ProfileColors,
    #[serde(default)]
    pub contact_info: ContactInfo,
    /// Platform key to URL. Blank and null entries are dropped on decode.
    #[serde(default, deserialize_with = "non_blank_map")]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_links: Vec<CustomLink>,
    #[serde(default)]
    pub payment_info: PaymentInfo,
}

/// The account behind a profile, either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileOwner {
    Id(UserId),
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl ProfileOwner {
    #[must_use]
    pub const fn id(&self) -> &UserId {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileColors {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    #[serde(default)]
    pub upi_id: Option<String>,
}

/// Something a visitor can click on a public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLink {
    Social { platform: String, url: String },
    Email(String),
    Phone(String),
    Website(String),
    Location(String),
    Custom { title: String, url: String },
    Upi { upi_id: String },
}

impl ProfileLink {
    /// Semantic type recorded with click events.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Social { platform, .. } => platform,
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
            Self::Website(_) => "website",
            Self::Location(_) => "location",
            Self::Custom { .. } => "custom",
            Self::Upi { .. } => "upi",
        }
    }

    /// The raw value behind the link (URL, address or number).
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Social { url, .. } | Self::Custom { url, .. } => url,
            Self::Email(v) | Self::Phone(v) | Self::Website(v) | Self::Location(v) => v,
            Self::Upi { upi_id } => upi_id,
        }
    }

    /// Where following the link leads. Locations are shown, not opened.
    #[must_use]
    pub fn href(&self, display_name: &str) -> Option<String> {
        match self {
            Self::Social { url, .. } | Self::Website(url) | Self::Custom { url, .. } => {
                Some(url.clone())
            }
            Self::Email(email) => Some(format!("mailto:{email}")),
            Self::Phone(phone) => Some(format!("tel:{phone}")),
            Self::Location(_) => None,
            Self::Upi { upi_id } => {
                Some(UpiPaymentLink::for_payee(upi_id, display_name).into_string())
            }
        }
    }
}

impl PublicProfile {
    /// Every clickable link present on the profile, in display order.
    #[must_use]
    pub fn links(&self) -> Vec<ProfileLink> {
        let mut links = Vec::new();

        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);

        if let Some(email) = present(&self.contact_info.email) {
            links.push(ProfileLink::Email(email));
        }
        if let Some(phone) = present(&self.contact_info.phone) {
            links.push(ProfileLink::Phone(phone));
        }
        if let Some(website) = present(&self.contact_info.website) {
            links.push(ProfileLink::Website(website));
        }
        if let Some(location) = present(&self.location) {
            links.push(ProfileLink::Location(location));
        }
        links.extend(self.social_links.iter().map(|(platform, url)| ProfileLink::Social {
            platform: platform.clone(),
            url: url.clone(),
        }));
        links.extend(self.custom_links.iter().map(|c| ProfileLink::Custom {
            title: c.title.clone(),
            url: c.url.clone(),
        }));
        if let Some(upi_id) = present(&self.payment_info.upi_id) {
            links.push(ProfileLink::Upi { upi_id });
        }

        links
    }

    /// The social link for a platform key, if set.
    #[must_use]
    pub fn social(&self, platform: &str) -> Option<ProfileLink> {
        self.social_links.get(platform).map(|url| ProfileLink::Social {
            platform: platform.to_owned(),
            url: url.clone(),
        })
    }

    /// Owning user's id, if the backend included it.
    #[must_use]
    pub fn owner_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(ProfileOwner::id)
    }
}

fn non_blank_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| {
            let v = v?.trim().to_owned();
            (!v.is_empty()).then_some((k, v))
        })
        .collect())
}
