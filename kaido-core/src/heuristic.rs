//! Distance heuristics for the A* engine.
//!
//! The base estimate is the great-circle distance between two nodes. An
//! optional penalty region models a cost bias against sources inside a
//! latitude/longitude rectangle; the penalty deliberately breaks
//! admissibility, trading optimality for steering power.

use std::fmt;

use thiserror::Error;

use crate::graph::RoadNode;

/// Mean Earth radius in kilometres used by the great-circle estimate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two nodes in kilometres (haversine form).
///
/// # Examples
/// ```
/// use kaido_core::{NodeId, RoadNode, great_circle_km};
///
/// let london = RoadNode { id: NodeId::new(1), lat: 51.5074, lon: -0.1278 };
/// let paris = RoadNode { id: NodeId::new(2), lat: 48.8566, lon: 2.3522 };
/// let distance = great_circle_km(&london, &paris);
/// assert!((distance - 343.5).abs() < 1.0);
/// ```
#[must_use]
pub fn great_circle_km(a: &RoadNode, b: &RoadNode) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Axis a penalty-region bound belongs to; used in validation errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundsAxis {
    /// Latitude bounds.
    Latitude,
    /// Longitude bounds.
    Longitude,
}

impl fmt::Display for BoundsAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latitude => f.write_str("latitude"),
            Self::Longitude => f.write_str("longitude"),
        }
    }
}

/// Stable codes describing [`HeuristicError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum HeuristicErrorCode {
    /// A bound was inverted or non-finite.
    InvalidBounds,
    /// The penalty was negative or non-finite.
    InvalidPenalty,
}

impl HeuristicErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidBounds => "HEURISTIC_INVALID_BOUNDS",
            Self::InvalidPenalty => "HEURISTIC_INVALID_PENALTY",
        }
    }
}

impl fmt::Display for HeuristicErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while validating a [`PenaltyRegion`].
///
/// A region whose minimum exceeds its maximum would silently never trigger,
/// so inverted bounds are rejected at construction time instead.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HeuristicError {
    /// A bound pair was inverted or contained a non-finite value.
    #[error("{axis} bounds are invalid: min {min} must be finite and not exceed max {max}")]
    InvalidBounds {
        /// Axis the offending pair belongs to.
        axis: BoundsAxis,
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
    /// The penalty must be a finite, non-negative distance.
    #[error("penalty {penalty_km} km must be finite and non-negative")]
    InvalidPenalty {
        /// Penalty as supplied.
        penalty_km: f64,
    },
}

impl HeuristicError {
    /// Retrieve the stable [`HeuristicErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> HeuristicErrorCode {
        match self {
            Self::InvalidBounds { .. } => HeuristicErrorCode::InvalidBounds,
            Self::InvalidPenalty { .. } => HeuristicErrorCode::InvalidPenalty,
        }
    }
}

/// Rectangular latitude/longitude region adding a fixed cost bias.
///
/// # Examples
/// ```
/// use kaido_core::PenaltyRegion;
///
/// let region = PenaltyRegion::new(35.0, 60.0, 119.0, 139.0, 1000.0)
///     .expect("bounds are ordered");
/// assert_eq!(region.penalty_km(), 1000.0);
///
/// let inverted = PenaltyRegion::new(35.0, 60.0, 139.0, 119.0, 1000.0);
/// assert!(inverted.is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenaltyRegion {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    penalty_km: f64,
}

impl PenaltyRegion {
    /// Validates the bounds and builds a region.
    ///
    /// # Errors
    /// Returns [`HeuristicError::InvalidBounds`] when a bound pair is
    /// inverted or non-finite, and [`HeuristicError::InvalidPenalty`] when
    /// the penalty is negative or non-finite.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        penalty_km: f64,
    ) -> Result<Self, HeuristicError> {
        validate_bounds(BoundsAxis::Latitude, min_lat, max_lat)?;
        validate_bounds(BoundsAxis::Longitude, min_lon, max_lon)?;
        if !penalty_km.is_finite() || penalty_km < 0.0 {
            return Err(HeuristicError::InvalidPenalty { penalty_km });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            penalty_km,
        })
    }

    /// Returns whether `node` lies inside the region (bounds inclusive).
    #[must_use]
    pub fn contains(&self, node: &RoadNode) -> bool {
        node.lat >= self.min_lat
            && node.lat <= self.max_lat
            && node.lon >= self.min_lon
            && node.lon <= self.max_lon
    }

    /// The fixed penalty in kilometres.
    #[must_use]
    pub fn penalty_km(&self) -> f64 {
        self.penalty_km
    }
}

fn validate_bounds(axis: BoundsAxis, min: f64, max: f64) -> Result<(), HeuristicError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(HeuristicError::InvalidBounds { axis, min, max });
    }
    Ok(())
}

/// Heuristic used to order the A* frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Heuristic {
    /// Great-circle distance only; admissible for distance-weighted graphs.
    #[default]
    GreatCircle,
    /// Great-circle distance plus a fixed penalty when the source node lies
    /// inside the region. Not admissible.
    Penalised(PenaltyRegion),
}

impl Heuristic {
    /// Estimated remaining cost from `from` to `to` in kilometres.
    ///
    /// Pure function of the node attributes.
    #[must_use]
    pub fn estimate_km(&self, from: &RoadNode, to: &RoadNode) -> f64 {
        let base = great_circle_km(from, to);
        match self {
            Self::GreatCircle => base,
            Self::Penalised(region) if region.contains(from) => base + region.penalty_km(),
            Self::Penalised(_) => base,
        }
    }
}
