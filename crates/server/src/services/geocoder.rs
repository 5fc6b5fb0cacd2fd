//! Geocoding provider client.
//!
//! Resolves a free-text address into coordinates via an outbound HTTP GET.
//! "Zero results" is data (`Ok(None)`); transport failures, non-success
//! statuses, and malformed payloads are errors. There is no retry policy:
//! callers treat any error as fatal to the request that triggered it.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use foodcart_core::Coordinates;

use crate::config::GeocoderConfig;

/// Errors that can occur when talking to the geocoding provider.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Address-to-coordinates resolution.
///
/// The production implementation is [`GeocoderClient`]; tests substitute
/// counting or canned implementations.
pub trait Geocode {
    /// Resolve an address to coordinates.
    ///
    /// Returns `Ok(None)` when the provider knows no such address.
    fn fetch_coordinates(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocoderError>> + Send;
}

/// HTTP client for the geocoding provider.
#[derive(Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GeocoderClient {
    /// Create a new geocoding client.
    ///
    /// The underlying HTTP client carries the configured request timeout so
    /// a hung provider cannot block a request indefinitely.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocoderError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Geocode for GeocoderClient {
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<Coordinates>, GeocoderError> {
        tracing::debug!(address, "Geocoding address");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.expose_secret()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocoderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocoderError::Parse(e.to_string()))?;

        // The first feature is the most relevant match.
        let Some(found) = body
            .response
            .geo_object_collection
            .feature_member
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        parse_pos(&found.geo_object.point.pos).map(Some)
    }
}

// =============================================================================
// Provider response shape
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    geo_object_collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

/// Parse a provider `pos` payload.
///
/// The provider emits `"lon lat"`; the coordinate order is swapped here so
/// the rest of the codebase only ever sees latitude-first [`Coordinates`].
fn parse_pos(pos: &str) -> Result<Coordinates, GeocoderError> {
    let mut parts = pos.split_whitespace();

    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeocoderError::Parse(format!(
            "expected \"lon lat\" point, got {pos:?}"
        )));
    };

    let longitude: f64 = lon
        .parse()
        .map_err(|_| GeocoderError::Parse(format!("invalid longitude: {lon:?}")))?;
    let latitude: f64 = lat
        .parse()
        .map_err(|_| GeocoderError::Parse(format!("invalid latitude: {lat:?}")))?;

    Ok(Coordinates::new(latitude, longitude))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pos_swaps_coordinate_order() {
        let coords = parse_pos("37.620795 55.753930").unwrap();
        assert!((coords.latitude - 55.753_930).abs() < f64::EPSILON);
        assert!((coords.longitude - 37.620_795).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_pos_rejects_wrong_arity() {
        assert!(matches!(parse_pos(""), Err(GeocoderError::Parse(_))));
        assert!(matches!(parse_pos("37.62"), Err(GeocoderError::Parse(_))));
        assert!(matches!(
            parse_pos("37.62 55.75 0.0"),
            Err(GeocoderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_pos_rejects_garbage() {
        assert!(matches!(
            parse_pos("east north"),
            Err(GeocoderError::Parse(_))
        ));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "response": {
                "GeoObjectCollection": {
                    "featureMember": [
                        {"GeoObject": {"Point": {"pos": "37.620795 55.753930"}}}
                    ]
                }
            }
        }"#;

        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let first = body
            .response
            .geo_object_collection
            .feature_member
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(first.geo_object.point.pos, "37.620795 55.753930");
    }

    #[test]
    fn test_empty_feature_collection_deserializes() {
        // featureMember may be omitted entirely for unknown addresses
        let json = r#"{"response": {"GeoObjectCollection": {}}}"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert!(body.response.geo_object_collection.feature_member.is_empty());
    }
}
