//! Campaign definitions and the immutable catalog they are looked up in

pub mod links;

pub use links::{build_tracked_url, resolve_redirect_url};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named marketing destination with its UTM tracking parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique key, also the redirect path segment
    pub id: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Final landing page the redirect forwards to
    pub destination_url: String,
    /// UTM parameters appended to the destination, in insertion order
    #[serde(default)]
    pub utm_params: IndexMap<String, String>,
}

impl Campaign {
    /// Create a campaign without UTM parameters
    pub fn new(id: impl Into<String>, destination_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            destination_url: destination_url.into(),
            utm_params: IndexMap::new(),
        }
    }

    /// Add or overwrite a UTM parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.utm_params.insert(key.into(), value.into());
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Destination with UTM parameters applied
    pub fn tracked_url(&self) -> Result<String> {
        build_tracked_url(&self.destination_url, &self.utm_params)
    }
}

/// Ordered, immutable set of campaigns keyed by id
#[derive(Debug, Clone, Default)]
pub struct CampaignCatalog {
    campaigns: IndexMap<String, Campaign>,
}

impl CampaignCatalog {
    /// Build a catalog, rejecting empty, dot-segment or duplicate ids.
    ///
    /// `.` and `..` are collapsed by URL path normalisation and cannot name a
    /// redirect page.
    pub fn new(campaigns: impl IntoIterator<Item = Campaign>) -> Result<Self> {
        let mut map = IndexMap::new();
        for campaign in campaigns {
            if campaign.id.trim().is_empty() {
                return Err(Error::Config("Campaign id must not be empty".to_string()));
            }
            if matches!(campaign.id.as_str(), "." | "..") {
                return Err(Error::Config(format!(
                    "Campaign id '{}' is not a valid path segment",
                    campaign.id
                )));
            }
            if map.contains_key(&campaign.id) {
                return Err(Error::Config(format!(
                    "Duplicate campaign id '{}'",
                    campaign.id
                )));
            }
            map.insert(campaign.id.clone(), campaign);
        }
        Ok(Self { campaigns: map })
    }

    /// The campaigns shipped with the tool
    pub fn builtin() -> Self {
        let campaigns = [
            Campaign::new("msft-2025", "https://accionlabs.com/microsoft-event")
                .with_name("Microsoft Event 2025")
                .with_param("utm_source", "msft_booth")
                .with_param("utm_medium", "qr")
                .with_param("utm_campaign", "2025"),
            Campaign::new("business-cards", "https://yourdomain.com/contact")
                .with_name("Business Card Networking")
                .with_param("utm_source", "business_card")
                .with_param("utm_medium", "qr")
                .with_param("utm_campaign", "networking"),
        ];
        Self {
            campaigns: campaigns.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Look up a campaign, failing with [`Error::UnknownCampaign`].
    pub fn get(&self, id: &str) -> Result<&Campaign> {
        self.campaigns.get(id).ok_or_else(|| Error::UnknownCampaign {
            id: id.to_string(),
            available: self.ids().map(str::to_string).collect(),
        })
    }

    /// Whether the catalog holds `id`
    pub fn contains(&self, id: &str) -> bool {
        self.campaigns.contains_key(id)
    }

    /// Campaign ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.campaigns.keys().map(String::as_str)
    }

    /// Campaigns in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.values()
    }

    /// Number of campaigns
    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = CampaignCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["msft-2025", "business-cards"]);

        let msft = catalog.get("msft-2025").unwrap();
        let keys: Vec<&str> = msft.utm_params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["utm_source", "utm_medium", "utm_campaign"]);
    }

    #[test]
    fn test_campaign_tracked_url() {
        let catalog = CampaignCatalog::builtin();
        let cards = catalog.get("business-cards").unwrap();
        assert_eq!(
            cards.tracked_url().unwrap(),
            "https://yourdomain.com/contact?utm_source=business_card&utm_medium=qr&utm_campaign=networking"
        );
        assert!(catalog.contains("business-cards"));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_unknown_campaign() {
        let catalog = CampaignCatalog::builtin();
        match catalog.get("missing") {
            Err(Error::UnknownCampaign { id, available }) => {
                assert_eq!(id, "missing");
                assert_eq!(available.len(), 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = CampaignCatalog::new([
            Campaign::new("a", "https://a.example"),
            Campaign::new("a", "https://b.example"),
        ]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_dot_segment_ids_rejected() {
        for id in [".", ".."] {
            let result = CampaignCatalog::new([Campaign::new(id, "https://a.example")]);
            assert!(matches!(result, Err(Error::Config(_))), "id {id:?} accepted");
        }
        let catalog = CampaignCatalog::new([Campaign::new(".well", "https://a.example")]).unwrap();
        assert!(catalog.contains(".well"));
    }

    #[test]
    fn test_campaign_deserializes_from_toml() {
        let campaign: Campaign = toml::from_str(
            r#"
            id = "spring"
            destination_url = "https://example.com/spring"

            [utm_params]
            utm_source = "poster"
            utm_medium = "qr"
            "#,
        )
        .unwrap();
        assert_eq!(campaign.id, "spring");
        assert_eq!(campaign.name, None);
        assert_eq!(campaign.utm_params.get("utm_source").map(String::as_str), Some("poster"));
        assert_eq!(campaign.utm_params.get_index(1).map(|(k, _)| k.as_str()), Some("utm_medium"));
    }
}
