//! Runway geometry table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::APPROACH_DIST_M;
use crate::geo;
use crate::types::GeoPosition;

/// Which threshold aircraft depart from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayEnd {
    A,
    B,
}

/// A single runway surface. Aircraft depart from the preferred end and
/// land toward it, so both movements share one direction of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayDef {
    pub name: String,
    pub threshold_a: GeoPosition,
    pub threshold_b: GeoPosition,
    pub preferred_departure_end: RunwayEnd,
}

impl RunwayDef {
    pub fn departure_threshold(&self) -> GeoPosition {
        match self.preferred_departure_end {
            RunwayEnd::A => self.threshold_a,
            RunwayEnd::B => self.threshold_b,
        }
    }

    /// Threshold at which arriving aircraft touch down.
    pub fn arrival_threshold(&self) -> GeoPosition {
        match self.preferred_departure_end {
            RunwayEnd::A => self.threshold_b,
            RunwayEnd::B => self.threshold_a,
        }
    }

    pub fn departure_heading(&self) -> f64 {
        geo::bearing(&self.departure_threshold(), &self.arrival_threshold())
    }

    pub fn landing_heading(&self) -> f64 {
        geo::normalize_heading(self.departure_heading() + 180.0)
    }

    pub fn length_m(&self) -> f64 {
        geo::distance(&self.threshold_a, &self.threshold_b)
    }

    /// Approach fix: `APPROACH_DIST_M` out from the arrival threshold,
    /// on the extended centerline.
    pub fn approach_point(&self) -> GeoPosition {
        let outbound = geo::normalize_heading(self.landing_heading() + 180.0);
        geo::translate(&self.arrival_threshold(), outbound, APPROACH_DIST_M)
    }

    /// Point `progress_m` down the runway from the departure threshold.
    pub fn along_takeoff_roll(&self, progress_m: f64) -> GeoPosition {
        geo::translate(&self.departure_threshold(), self.departure_heading(), progress_m)
    }

    /// Point `progress_m` down the runway from the arrival threshold.
    pub fn along_landing_roll(&self, progress_m: f64) -> GeoPosition {
        geo::translate(&self.arrival_threshold(), self.landing_heading(), progress_m)
    }
}

/// Runways keyed by the owning base's entity id. The first runway listed
/// for a base is its primary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunwayTable {
    runways: BTreeMap<String, Vec<RunwayDef>>,
}

impl RunwayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base_id: impl Into<String>, runway: RunwayDef) {
        self.runways.entry(base_id.into()).or_default().push(runway);
    }

    pub fn primary(&self, base_id: &str) -> Option<&RunwayDef> {
        self.runways.get(base_id).and_then(|list| list.first())
    }
}
