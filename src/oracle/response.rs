//! Wire shapes returned by the directions/snap oracle (§6).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsResponse {
    pub(super) features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsFeature {
    pub(super) properties: DirectionsProperties,
    pub(super) geometry: DirectionsGeometry,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsProperties {
    pub(super) summary: DirectionsSummary,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsSummary {
    pub(super) distance: f64,
    pub(super) duration: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsGeometry {
    /// `[lng, lat]` pairs.
    pub(super) coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SnapResponse {
    pub(super) locations: Vec<SnapLocation>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SnapLocation {
    /// `[lng, lat]`.
    pub(super) location: [f64; 2],
}
