//! Privacy-aware analytics for QR campaign pages
//!
//! [`Analytics`] is created explicitly with its options, the page it describes
//! and a [`BeaconTransport`]. Calling [`Analytics::init`] records the page view
//! and, on campaign pages, the QR scan. [`Analytics::track`] composes an
//! [`Event`] plus one [`Beacon`] per configured provider and hands each beacon
//! to the transport. Network delivery is the transport's concern.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Campaign name used for pages that are not campaign redirects
pub const INDEX_CAMPAIGN: &str = "index";

/// Analytics settings (`[analytics]` in the config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOptions {
    /// Master switch
    pub enabled: bool,
    /// Log every composed event
    pub debug: bool,
    /// Skip tracking when the visitor sends Do Not Track
    pub respect_dnt: bool,
    /// Ask Google Analytics to anonymize the visitor IP
    pub anonymize_ip: bool,
    /// GA4 measurement id, e.g. `G-XXXXXXXXXX`
    pub google_analytics_id: Option<String>,
    /// Plausible site domain
    pub plausible_domain: Option<String>,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            debug: false,
            respect_dnt: true,
            anonymize_ip: true,
            google_analytics_id: None,
            plausible_domain: None,
        }
    }
}

/// The page an [`Analytics`] instance reports on
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    /// Full page URL
    pub url: String,
    /// URL path, used to derive the campaign
    pub path: String,
    /// Page title
    pub title: Option<String>,
    /// Referring page, if any
    pub referrer: Option<String>,
    /// Visitor user agent
    pub user_agent: Option<String>,
    /// Visitor language
    pub language: Option<String>,
    /// Visitor sent a Do Not Track signal
    pub do_not_track: bool,
    /// Destination the page redirects to
    pub destination: Option<String>,
}

impl PageContext {
    /// Context for a campaign redirect page.
    pub fn redirect_page(url: &str, destination: &str) -> Self {
        let path = url::Url::parse(url)
            .map(|parsed| parsed.path().to_string())
            .unwrap_or_else(|_| url.to_string());
        Self {
            url: url.to_string(),
            path,
            destination: Some(destination.to_string()),
            ..Self::default()
        }
    }

    /// Campaign id derived from the page path
    pub fn campaign(&self) -> String {
        campaign_from_path(&self.path)
    }
}

/// Last path segment with an optional `.html` suffix removed, or `index`.
pub fn campaign_from_path(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or("");
    let segment = segment.strip_suffix(".html").unwrap_or(segment);
    if segment.is_empty() {
        INDEX_CAMPAIGN.to_string()
    } else {
        segment.to_string()
    }
}

/// A tracked event with its page and campaign context
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Unique event id
    pub id: Uuid,
    /// When the event was composed
    pub timestamp: DateTime<Utc>,
    /// Event name, e.g. `qr_scan`
    pub name: String,
    /// Event category, e.g. `campaign`
    pub category: String,
    /// Campaign derived from the page path
    pub campaign: String,
    /// Destination the page redirects to
    pub destination: Option<String>,
    /// Page URL
    pub page_url: String,
    /// Referrer, `direct` when absent
    pub referrer: String,
    /// Caller-supplied metadata
    pub metadata: Map<String, Value>,
}

/// A provider-specific payload ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum Beacon {
    /// GA4 `gtag('event', ...)` payload
    GoogleAnalytics {
        /// Measurement id
        measurement_id: String,
        /// Event name
        event_name: String,
        /// Event parameters
        params: Value,
    },
    /// Plausible custom event payload
    Plausible {
        /// Site domain
        domain: String,
        /// Event name
        event_name: String,
        /// Custom properties
        props: Value,
    },
}

/// Delivers beacons to an analytics provider
#[async_trait]
pub trait BeaconTransport: Send + Sync {
    /// Deliver one beacon
    async fn send(&self, beacon: &Beacon) -> Result<()>;
}

/// Transport that records beacons in the tracing log instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTransport;

#[async_trait]
impl BeaconTransport for TracingTransport {
    async fn send(&self, beacon: &Beacon) -> Result<()> {
        let payload = serde_json::to_string(beacon)?;
        tracing::info!(target: "pagesqr::analytics", %payload, "beacon");
        Ok(())
    }
}

/// Analytics bound to one page
pub struct Analytics {
    options: AnalyticsOptions,
    page: PageContext,
    transport: Arc<dyn BeaconTransport>,
}

impl Analytics {
    /// Create an analytics instance for `page`
    pub fn new(
        options: AnalyticsOptions,
        page: PageContext,
        transport: Arc<dyn BeaconTransport>,
    ) -> Self {
        Self {
            options,
            page,
            transport,
        }
    }

    /// Whether events will be recorded for this page
    pub fn is_active(&self) -> bool {
        self.options.enabled && !(self.options.respect_dnt && self.page.do_not_track)
    }

    /// Record the page view and, on campaign pages, the QR scan.
    pub async fn init(&self) -> Result<Vec<Event>> {
        if !self.is_active() {
            tracing::debug!("Analytics disabled or Do Not Track set, skipping init");
            return Ok(Vec::new());
        }

        let mut events = Vec::new();

        let mut page_meta = Map::new();
        if let Some(title) = &self.page.title {
            page_meta.insert("page_title".to_string(), Value::String(title.clone()));
        }
        events.extend(self.track("page_view", "navigation", page_meta).await?);

        let campaign = self.page.campaign();
        if campaign != INDEX_CAMPAIGN {
            let meta = scan_metadata(&campaign, self.page.destination.as_deref());
            events.extend(self.track("qr_scan", "campaign", meta).await?);
        }

        Ok(events)
    }

    /// Compose an event and send a beacon for each configured provider.
    ///
    /// Returns `None` when tracking is disabled for this page.
    pub async fn track(
        &self,
        event_name: &str,
        category: &str,
        metadata: Map<String, Value>,
    ) -> Result<Option<Event>> {
        if !self.is_active() {
            tracing::debug!(event_name, "Event tracking disabled or Do Not Track set");
            return Ok(None);
        }

        let event = Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            name: event_name.to_string(),
            category: category.to_string(),
            campaign: self.page.campaign(),
            destination: self.page.destination.clone(),
            page_url: self.page.url.clone(),
            referrer: self
                .page
                .referrer
                .clone()
                .unwrap_or_else(|| "direct".to_string()),
            metadata,
        };

        if self.options.debug {
            let rendered = serde_json::to_string(&event)?;
            tracing::info!(target: "pagesqr::analytics", event = %rendered, "Tracking event");
        }

        for beacon in self.beacons(&event) {
            self.transport.send(&beacon).await?;
        }

        Ok(Some(event))
    }

    /// Provider payloads for an event
    pub fn beacons(&self, event: &Event) -> Vec<Beacon> {
        let mut beacons = Vec::new();

        if let Some(id) = &self.options.google_analytics_id {
            beacons.push(Beacon::GoogleAnalytics {
                measurement_id: id.clone(),
                event_name: event.name.clone(),
                params: json!({
                    "event_category": event.category,
                    "event_label": event.campaign,
                    "anonymize_ip": self.options.anonymize_ip,
                    "custom_map": {
                        "campaign_id": event.campaign,
                        "destination_url": event.destination,
                    },
                }),
            });
        }

        if let Some(domain) = &self.options.plausible_domain {
            beacons.push(Beacon::Plausible {
                domain: domain.clone(),
                event_name: event.name.clone(),
                props: json!({
                    "category": event.category,
                    "campaign": event.campaign,
                    "qr_id": event.campaign,
                }),
            });
        }

        beacons
    }
}

/// Metadata attached to QR scan events
pub fn scan_metadata(campaign_id: &str, destination: Option<&str>) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert(
        "campaign_name".to_string(),
        Value::String(campaign_id.to_string()),
    );
    meta.insert(
        "destination_url".to_string(),
        destination.map_or(Value::Null, |d| Value::String(d.to_string())),
    );
    meta
}
