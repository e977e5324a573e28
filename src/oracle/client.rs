use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::json;

use crate::config::EngineConfig;
use crate::domain::TransportType;
use crate::geo::Location;

use super::error::OracleError;
use super::response::{DirectionsResponse, SnapResponse};
use super::{match_profile, sea_vessel_directions, Directions, Profile, RoutingOracle};

/// Blocking HTTP client for the external directions/snap oracle.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    base_url: String,
}

impl HttpOracle {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is valid");
        HttpOracle { client, base_url: base_url.into() }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        HttpOracle::new(cfg.oracle_base_url.clone(), cfg.oracle_timeout)
    }

    fn directions_url(&self, profile: Profile, from: Location, to: Location) -> Result<Url, OracleError> {
        let mut url = Url::parse(&format!("{}/v2/directions/{}", self.base_url, profile.as_str()))
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("start", &format!("{},{}", from.lng, from.lat))
            .append_pair("end", &format!("{},{}", to.lng, to.lat));
        Ok(url)
    }

    fn snap_url(&self, profile: Profile) -> Result<Url, OracleError> {
        Url::parse(&format!("{}/v2/snap/{}/json", self.base_url, profile.as_str()))
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))
    }
}

impl RoutingOracle for HttpOracle {
    fn snap(&self, locations: &[Location], profile: Profile, radius_m: f64) -> Result<Vec<Location>, OracleError> {
        let url = self.snap_url(profile)?;
        let body = json!({
            "locations": locations.iter().map(|l| [l.lng, l.lat]).collect::<Vec<_>>(),
            "radius": radius_m,
        });

        let resp: SnapResponse = self.client.post(url).json(&body).send()?.error_for_status()?.json()?;

        if resp.locations.len() != locations.len() {
            return Err(OracleError::MalformedResponse(format!(
                "expected {} snapped locations, got {}",
                locations.len(),
                resp.locations.len()
            )));
        }

        resp.locations
            .into_iter()
            .map(|l| {
                Location::new(l.location[1], l.location[0])
                    .map_err(|e| OracleError::MalformedResponse(e.to_string()))
            })
            .collect()
    }

    fn directions(&self, from: Location, to: Location, mot: TransportType) -> Result<Directions, OracleError> {
        if mot == TransportType::SeaVessel {
            return Ok(sea_vessel_directions(from, to));
        }

        let profile = match_profile(mot)?;
        let url = self.directions_url(profile, from, to)?;

        let resp: DirectionsResponse = self.client.get(url).send()?.error_for_status()?.json()?;
        let feature = resp.features.first().ok_or(OracleError::NoMatch)?;

        let polyline = feature
            .geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| {
                Location::new(*lat, *lng).map_err(|e| OracleError::MalformedResponse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Directions {
            distance_m: feature.properties.summary.distance,
            duration_s: feature.properties.summary.duration,
            polyline,
        })
    }
}
