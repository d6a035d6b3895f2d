//! Redirect and tracked URL composition

use crate::campaign::CampaignCatalog;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use url::Url;

/// Append `campaign_id` as a path segment of `base_url`.
///
/// Exactly one `/` separates the base path and the id, whether or not the base
/// ends with a slash.
pub fn resolve_redirect_url(
    catalog: &CampaignCatalog,
    campaign_id: &str,
    base_url: &str,
) -> Result<String> {
    catalog.get(campaign_id)?;

    let mut url = parse_url(base_url)?;
    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl {
            url: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        })?
        .pop_if_empty()
        .push(campaign_id);

    Ok(url.to_string())
}

/// Set each UTM parameter on the query string of `destination_url`.
///
/// Parameters are applied in insertion order. A key already present in the
/// destination keeps its position with the new value and any repeats are
/// dropped. With no parameters the destination is returned untouched.
pub fn build_tracked_url(
    destination_url: &str,
    utm_params: &IndexMap<String, String>,
) -> Result<String> {
    if utm_params.is_empty() {
        return Ok(destination_url.to_string());
    }

    let mut url = parse_url(destination_url)?;
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for (key, value) in utm_params {
        match pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                pairs[first].1 = value.clone();
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.clone(), value.clone())),
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    Ok(url.to_string())
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_redirect_url_with_and_without_trailing_slash() {
        let catalog = CampaignCatalog::builtin();
        for base in ["https://x.github.io/site/", "https://x.github.io/site"] {
            let url = resolve_redirect_url(&catalog, "msft-2025", base).unwrap();
            assert_eq!(url, "https://x.github.io/site/msft-2025");
        }
    }

    #[test]
    fn test_redirect_url_at_domain_root() {
        let catalog = CampaignCatalog::builtin();
        let url = resolve_redirect_url(&catalog, "business-cards", "https://x.github.io").unwrap();
        assert_eq!(url, "https://x.github.io/business-cards");
    }

    #[test]
    fn test_redirect_url_has_no_double_slash_for_all_campaigns() {
        let catalog = CampaignCatalog::builtin();
        for id in catalog.ids() {
            let url = resolve_redirect_url(&catalog, id, "https://x.github.io/site/").unwrap();
            assert_eq!(url, format!("https://x.github.io/site/{id}"));
            assert!(!url["https://".len()..].contains("//"));
        }
    }

    #[test]
    fn test_redirect_url_unknown_campaign() {
        let catalog = CampaignCatalog::builtin();
        let err = resolve_redirect_url(&catalog, "nope", "https://x.github.io/").unwrap_err();
        assert!(matches!(err, Error::UnknownCampaign { .. }));
    }

    #[test]
    fn test_redirect_url_invalid_base() {
        let catalog = CampaignCatalog::builtin();
        let err = resolve_redirect_url(&catalog, "msft-2025", "not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
        let err = resolve_redirect_url(&catalog, "msft-2025", "mailto:me@example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_tracked_url_round_trip() {
        let tracked =
            build_tracked_url("https://example.com/landing/page", &params(&[("a", "1"), ("b", "2")]))
                .unwrap();
        assert!(tracked.contains("a=1"));
        assert!(tracked.contains("b=2"));

        let reparsed = Url::parse(&tracked).unwrap();
        assert_eq!(reparsed.path(), "/landing/page");
        let pairs: Vec<(String, String)> = reparsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_tracked_url_empty_params_unchanged() {
        let raw = "https://example.com/contact?ref=x#top";
        assert_eq!(build_tracked_url(raw, &IndexMap::new()).unwrap(), raw);
    }

    #[test]
    fn test_tracked_url_encodes_values() {
        let tracked =
            build_tracked_url("https://example.com/", &params(&[("utm_campaign", "spring sale&more")]))
                .unwrap();
        let reparsed = Url::parse(&tracked).unwrap();
        let value = reparsed
            .query_pairs()
            .find(|(k, _)| k == "utm_campaign")
            .map(|(_, v)| v.into_owned());
        assert_eq!(value.as_deref(), Some("spring sale&more"));
    }

    #[test]
    fn test_tracked_url_overwrites_existing_keys() {
        let tracked = build_tracked_url(
            "https://example.com/?utm_source=old&keep=1&utm_source=older",
            &params(&[("utm_source", "new"), ("utm_medium", "qr")]),
        )
        .unwrap();
        assert_eq!(
            tracked,
            "https://example.com/?utm_source=new&keep=1&utm_medium=qr"
        );
    }

    #[test]
    fn test_tracked_url_malformed_destination() {
        let err = build_tracked_url("::not-a-url", &params(&[("a", "1")])).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
