//! Scheduling constraints attached to an observing block.
//!
//! Each constraint kind carries typed bounds that are checked when the
//! constraint is created. The core does not decide whether a block is
//! observable; it only guarantees that the bounds it hands to the scheduler
//! are well formed. How several constraints combine is the scheduler's call.
//!
//! On the wire a constraint is an object tagged by its `name`:
//!
//! ```json
//! {"name": "sky_brightness", "max": 19.5, "band": "r"}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::time::ModifiedJulianDate;
use crate::error::ValidationError;

fn invalid(constraint: &'static str, reason: String) -> ValidationError {
    ValidationError::InvalidConstraint { constraint, reason }
}

fn check_range(constraint: &'static str, what: &str, v: f64, lo: f64, hi: f64) -> Result<(), ValidationError> {
    if !v.is_finite() {
        return Err(invalid(constraint, format!("{} must be finite, not {}", what, v)));
    }
    if v < lo || v > hi {
        let reason = if hi.is_infinite() {
            format!("{} must be >= {}, not {}", what, lo, v)
        } else {
            format!("{} must be between {} and {}, not {}", what, lo, hi, v)
        };
        return Err(invalid(constraint, reason));
    }
    Ok(())
}

/// Lower and upper limits a constraint imposes on its quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Defines a constraint that only carries a `max` value within `[lo, hi]`.
macro_rules! define_max_constraint {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $lo:expr, $hi:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $ty {
            max: f64,
        }

        impl $ty {
            pub const NAME: &'static str = $name;

            pub fn new(max: f64) -> Result<Self, ValidationError> {
                let constraint = Self { max };
                constraint.validate()?;
                Ok(constraint)
            }

            pub fn max(&self) -> f64 {
                self.max
            }

            pub fn validate(&self) -> Result<(), ValidationError> {
                check_range(Self::NAME, "max", self.max, $lo, $hi)
            }
        }
    };
}

define_max_constraint!(
    /// Maximum airmass of the target.
    AirmassConstraint,
    "airmass",
    1.0,
    f64::INFINITY
);

define_max_constraint!(
    /// Maximum relative Moon brightness (0.0 to 1.0).
    MoonBrightnessConstraint,
    "moon_brightness",
    0.0,
    1.0
);

define_max_constraint!(
    /// Minimum angular distance between target and Moon, in degrees.
    ///
    /// The wire field is called `max` for compatibility with existing
    /// documents; [`SchedulingConstraint::bounds`] reports it as a lower limit.
    MoonDistanceConstraint,
    "moon_distance",
    0.0,
    180.0
);

define_max_constraint!(
    /// Maximum cloud extinction.
    CloudExtinctionConstraint,
    "cloud_extinction",
    0.0,
    f64::INFINITY
);

define_max_constraint!(
    /// Maximum DIMM seeing in arcsec.
    SeeingConstraint,
    "seeing",
    0.0,
    f64::INFINITY
);

/// Photometric band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    U,
    G,
    R,
    I,
    Z,
    Y,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::U => "u",
            Band::G => "g",
            Band::R => "r",
            Band::I => "i",
            Band::Z => "z",
            Band::Y => "y",
        }
    }
}

impl FromStr for Band {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" => Ok(Band::U),
            "g" => Ok(Band::G),
            "r" => Ok(Band::R),
            "i" => Ok(Band::I),
            "z" => Ok(Band::Z),
            "y" => Ok(Band::Y),
            other => Err(invalid(
                SkyBrightnessConstraint::NAME,
                format!("band must be one of ugrizy, not {:?}", other),
            )),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum sky brightness (mag) in a given band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyBrightnessConstraint {
    max: f64,
    band: Band,
}

impl SkyBrightnessConstraint {
    pub const NAME: &'static str = "sky_brightness";

    pub fn new(max: f64, band: Band) -> Result<Self, ValidationError> {
        let constraint = Self { max, band };
        constraint.validate()?;
        Ok(constraint)
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(Self::NAME, "max", self.max, 0.0, f64::INFINITY)
    }
}

/// Target altitude window in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

impl AltitudeConstraint {
    pub const NAME: &'static str = "altitude";

    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, ValidationError> {
        let constraint = Self { min, max };
        constraint.validate()?;
        Ok(constraint)
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(min) = self.min {
            check_range(Self::NAME, "min", min, 0.0, 90.0)?;
        }
        if let Some(max) = self.max {
            check_range(Self::NAME, "max", max, 0.0, 90.0)?;
        }
        match (self.min, self.max) {
            (None, None) => Err(invalid(Self::NAME, "at least one of min and max is required".to_string())),
            (Some(min), Some(max)) if min > max => {
                Err(invalid(Self::NAME, format!("min {} is above max {}", min, max)))
            }
            _ => Ok(()),
        }
    }
}

/// Period during which the block may run, as Modified Julian Dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<ModifiedJulianDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<ModifiedJulianDate>,
}

impl TimeWindowConstraint {
    pub const NAME: &'static str = "time_window";

    pub fn new(start: Option<ModifiedJulianDate>, end: Option<ModifiedJulianDate>) -> Result<Self, ValidationError> {
        let constraint = Self { start, end };
        constraint.validate()?;
        Ok(constraint)
    }

    /// Window between two UTC instants.
    pub fn between(
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            Some(ModifiedJulianDate::from_datetime(start)),
            Some(ModifiedJulianDate::from_datetime(end)),
        )
    }

    pub fn start(&self) -> Option<ModifiedJulianDate> {
        self.start
    }

    pub fn end(&self) -> Option<ModifiedJulianDate> {
        self.end
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (what, bound) in [("start", self.start), ("end", self.end)] {
            if let Some(mjd) = bound {
                check_range(Self::NAME, what, mjd.value(), f64::MIN, f64::MAX)?;
            }
        }
        match (self.start, self.end) {
            (None, None) => Err(invalid(Self::NAME, "at least one of start and end is required".to_string())),
            (Some(start), Some(end)) if start > end => Err(invalid(
                Self::NAME,
                format!("start {} is after end {}", start.value(), end.value()),
            )),
            _ => Ok(()),
        }
    }
}

/// Any constraint that can be attached to an observing block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum SchedulingConstraint {
    Airmass(AirmassConstraint),
    MoonBrightness(MoonBrightnessConstraint),
    MoonDistance(MoonDistanceConstraint),
    SkyBrightness(SkyBrightnessConstraint),
    CloudExtinction(CloudExtinctionConstraint),
    Seeing(SeeingConstraint),
    Altitude(AltitudeConstraint),
    TimeWindow(TimeWindowConstraint),
}

impl SchedulingConstraint {
    pub fn airmass(max: f64) -> Result<Self, ValidationError> {
        AirmassConstraint::new(max).map(Self::Airmass)
    }

    pub fn moon_brightness(max: f64) -> Result<Self, ValidationError> {
        MoonBrightnessConstraint::new(max).map(Self::MoonBrightness)
    }

    pub fn moon_distance(min_distance: f64) -> Result<Self, ValidationError> {
        MoonDistanceConstraint::new(min_distance).map(Self::MoonDistance)
    }

    pub fn sky_brightness(max: f64, band: Band) -> Result<Self, ValidationError> {
        SkyBrightnessConstraint::new(max, band).map(Self::SkyBrightness)
    }

    pub fn cloud_extinction(max: f64) -> Result<Self, ValidationError> {
        CloudExtinctionConstraint::new(max).map(Self::CloudExtinction)
    }

    pub fn seeing(max: f64) -> Result<Self, ValidationError> {
        SeeingConstraint::new(max).map(Self::Seeing)
    }

    pub fn altitude(min: Option<f64>, max: Option<f64>) -> Result<Self, ValidationError> {
        AltitudeConstraint::new(min, max).map(Self::Altitude)
    }

    pub fn time_window(start: Option<ModifiedJulianDate>, end: Option<ModifiedJulianDate>) -> Result<Self, ValidationError> {
        TimeWindowConstraint::new(start, end).map(Self::TimeWindow)
    }

    /// Wire name of the constraint kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Airmass(_) => AirmassConstraint::NAME,
            Self::MoonBrightness(_) => MoonBrightnessConstraint::NAME,
            Self::MoonDistance(_) => MoonDistanceConstraint::NAME,
            Self::SkyBrightness(_) => SkyBrightnessConstraint::NAME,
            Self::CloudExtinction(_) => CloudExtinctionConstraint::NAME,
            Self::Seeing(_) => SeeingConstraint::NAME,
            Self::Altitude(_) => AltitudeConstraint::NAME,
            Self::TimeWindow(_) => TimeWindowConstraint::NAME,
        }
    }

    /// Key under which at most one constraint may exist when uniqueness is enforced.
    pub fn kind_key(&self) -> String {
        match self {
            Self::SkyBrightness(c) => format!("{}[{}]", SkyBrightnessConstraint::NAME, c.band()),
            other => other.name().to_string(),
        }
    }

    /// Re-check the bounds, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Airmass(c) => c.validate(),
            Self::MoonBrightness(c) => c.validate(),
            Self::MoonDistance(c) => c.validate(),
            Self::SkyBrightness(c) => c.validate(),
            Self::CloudExtinction(c) => c.validate(),
            Self::Seeing(c) => c.validate(),
            Self::Altitude(c) => c.validate(),
            Self::TimeWindow(c) => c.validate(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        let upper = |max| Bounds { min: None, max: Some(max) };
        match self {
            Self::Airmass(c) => upper(c.max()),
            Self::MoonBrightness(c) => upper(c.max()),
            Self::MoonDistance(c) => Bounds { min: Some(c.max()), max: None },
            Self::SkyBrightness(c) => upper(c.max()),
            Self::CloudExtinction(c) => upper(c.max()),
            Self::Seeing(c) => upper(c.max()),
            Self::Altitude(c) => Bounds { min: c.min(), max: c.max() },
            Self::TimeWindow(c) => Bounds {
                min: c.start().map(|t| t.value()),
                max: c.end().map(|t| t.value()),
            },
        }
    }
}

impl fmt::Display for SchedulingConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SkyBrightness(c) => format!("{}[{}]", self.name(), c.band()),
            _ => self.name().to_string(),
        };
        match self.bounds() {
            Bounds { min: Some(min), max: Some(max) } => write!(f, "{} <= {} <= {}", min, label, max),
            Bounds { min: Some(min), max: None } => write!(f, "{} >= {}", label, min),
            Bounds { min: None, max: Some(max) } => write!(f, "{} <= {}", label, max),
            Bounds { min: None, max: None } => write!(f, "{} unconstrained", label),
        }
    }
}
