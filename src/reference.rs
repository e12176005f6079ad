//! Reference-image retrieval.
//!
//! A generation request is seeded with a real picture of the chosen point. A
//! street-level panorama is preferred; when none exists near the point (or the
//! fetch fails for any other reason) a top-down roadmap with a marker on the
//! point is fetched instead, exactly once. Both failing is fatal.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::UpstreamEndpoints;
use crate::constants::{REFERENCE_IMAGE_SIZE, STATIC_MAP_ZOOM, STREET_VIEW_FOV};
use crate::error::TerraformerError;

/// Which static-imagery source produced the reference image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReferenceKind {
    /// Street-level panorama.
    StreetView,
    /// Top-down annotated roadmap.
    Roadmap,
}

/// Camera direction for street-level panoramas.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct StreetViewPov {
    /// Compass heading in degrees.
    pub heading: f64,
    /// Camera pitch in degrees.
    pub pitch: f64,
}

/// A reference image ready to embed in a generation call.
#[derive(Clone, Debug)]
pub struct ReferenceImage {
    /// Raw image bytes from the upstream service.
    pub bytes: Vec<u8>,
    /// Declared media type of the payload.
    pub mime_type: &'static str,
    /// The URL the bytes were fetched from.
    pub url: String,
    /// Which source ultimately produced the image.
    pub kind: ReferenceKind,
}

/// Builds the street-level panorama URL for a point.
///
/// `return_error_code` makes the API answer with a non-OK status when no
/// panorama exists near the point, which is what triggers the roadmap
/// fallback.
pub fn street_view_url(
    endpoint: &str,
    latitude: f64,
    longitude: f64,
    pov: Option<&StreetViewPov>,
    key: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("location", &format!("{latitude},{longitude}"));
        pairs.append_pair("size", REFERENCE_IMAGE_SIZE);
        pairs.append_pair("fov", STREET_VIEW_FOV);
        if let Some(pov) = pov {
            pairs.append_pair("heading", &pov.heading.to_string());
            pairs.append_pair("pitch", &pov.pitch.to_string());
        }
        pairs.append_pair("return_error_code", "true");
        pairs.append_pair("key", key);
    }
    Ok(url)
}

/// Builds the roadmap URL for a point, with a red marker on it.
pub fn static_map_url(
    endpoint: &str,
    latitude: f64,
    longitude: f64,
    key: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("center", &format!("{latitude},{longitude}"));
        pairs.append_pair("zoom", STATIC_MAP_ZOOM);
        pairs.append_pair("size", REFERENCE_IMAGE_SIZE);
        pairs.append_pair("maptype", "roadmap");
        pairs.append_pair("markers", &format!("color:red|{latitude},{longitude}"));
        pairs.append_pair("key", key);
    }
    Ok(url)
}

/// Strips the `key` query pair from a fetched reference URL so it can be
/// echoed to a caller that never supplied that key.
#[must_use]
pub fn redact_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .filter(|(name, _)| name != "key")
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect();
            {
                let mut editor = parsed.query_pairs_mut();
                editor.clear();
                for (name, value) in &pairs {
                    editor.append_pair(name, value);
                }
            }
            if parsed.query() == Some("") {
                parsed.set_query(None);
            }
            parsed.to_string()
        }
        // not parseable, keep the path part only
        Err(_) => url.split('?').next().unwrap_or_default().to_string(),
    }
}

/// Fetches one URL, treating any non-OK status as a failure.
///
/// Error strings deliberately avoid the full URL so the API key never lands
/// in a log line or response body.
async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| err.without_url().to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("{} returned HTTP {}", url.path(), status));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| err.without_url().to_string())?;
    Ok(bytes.to_vec())
}

/// Fetches a reference image for a point, preferring street-level imagery and
/// falling back once to a roadmap.
pub async fn fetch_reference_image(
    client: &Client,
    endpoints: &UpstreamEndpoints,
    latitude: f64,
    longitude: f64,
    pov: Option<&StreetViewPov>,
    maps_api_key: &str,
) -> Result<ReferenceImage, TerraformerError> {
    let street_url =
        street_view_url(&endpoints.street_view, latitude, longitude, pov, maps_api_key)?;
    match fetch_bytes(client, &street_url).await {
        Ok(bytes) => {
            debug!("Using street-level reference for {},{}", latitude, longitude);
            return Ok(ReferenceImage {
                bytes,
                mime_type: "image/jpeg",
                url: street_url.to_string(),
                kind: ReferenceKind::StreetView,
            });
        }
        Err(err) => {
            warn!("Street-level fetch failed ({}), falling back to roadmap", err);
        }
    }

    let map_url = static_map_url(&endpoints.static_map, latitude, longitude, maps_api_key)?;
    let bytes = fetch_bytes(client, &map_url)
        .await
        .map_err(TerraformerError::ReferenceFetch)?;
    Ok(ReferenceImage {
        bytes,
        mime_type: "image/png",
        url: map_url.to_string(),
        kind: ReferenceKind::Roadmap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constants::{STATIC_MAP_ENDPOINT, STREET_VIEW_ENDPOINT};

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn street_view_url_carries_location_and_pov() {
        let pov = StreetViewPov {
            heading: 120.0,
            pitch: -10.0,
        };
        let url = street_view_url(STREET_VIEW_ENDPOINT, 41.4036, 2.1744, Some(&pov), "k")
            .expect("build url");
        let pairs = query(&url);
        assert!(pairs.contains(&("location".to_string(), "41.4036,2.1744".to_string())));
        assert!(pairs.contains(&("heading".to_string(), "120".to_string())));
        assert!(pairs.contains(&("pitch".to_string(), "-10".to_string())));
        assert!(pairs.contains(&("return_error_code".to_string(), "true".to_string())));
        assert!(pairs.contains(&("key".to_string(), "k".to_string())));
    }

    #[test]
    fn street_view_url_omits_pov_when_not_requested() {
        let url = street_view_url(STREET_VIEW_ENDPOINT, 41.4036, 2.1744, None, "k")
            .expect("build url");
        let pairs = query(&url);
        assert!(!pairs.iter().any(|(name, _)| name == "heading"));
        assert!(!pairs.iter().any(|(name, _)| name == "pitch"));
    }

    #[test]
    fn redact_key_drops_only_the_key_pair() {
        let url = street_view_url(STREET_VIEW_ENDPOINT, 41.4036, 2.1744, None, "secret")
            .expect("build url");
        let redacted = redact_key(url.as_str());
        assert!(!redacted.contains("secret"));
        assert!(!redacted.contains("key="));
        assert!(redacted.contains("location=41.4036%2C2.1744"));
    }

    #[test]
    fn static_map_url_marks_the_point() {
        let url = static_map_url(STATIC_MAP_ENDPOINT, 41.4036, 2.1744, "k").expect("build url");
        let pairs = query(&url);
        assert!(pairs.contains(&("center".to_string(), "41.4036,2.1744".to_string())));
        assert!(pairs.contains(&("zoom".to_string(), STATIC_MAP_ZOOM.to_string())));
        assert!(pairs.contains(&("maptype".to_string(), "roadmap".to_string())));
        assert!(pairs.contains(&(
            "markers".to_string(),
            "color:red|41.4036,2.1744".to_string()
        )));
    }
}
