// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed catalogs of monitored units, equipment and vibration parameters.

use crate::error::DomainError;
use serde::Serialize;
use std::str::FromStr;

/// A production line whose equipment is monitored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Unit {
    /// Direct reduction unit 1.
    #[serde(rename = "DRI1")]
    Dri1,
    /// Direct reduction unit 2.
    #[serde(rename = "DRI2")]
    Dri2,
}

impl Unit {
    /// Returns the catalog identifier of this unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dri1 => "DRI1",
            Self::Dri2 => "DRI2",
        }
    }
}

impl FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRI1" => Ok(Self::Dri1),
            "DRI2" => Ok(Self::Dri2),
            _ => Err(DomainError::InvalidUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display information for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitInfo {
    /// The unit identifier.
    pub id: Unit,
    /// Human-readable name.
    pub name: &'static str,
    /// Short plant code.
    pub code: &'static str,
}

/// A monitored physical asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Equipment {
    /// Catalog identifier (e.g. `GB-cp48A`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Plant tag code.
    pub code: &'static str,
}

/// The physical quantity a parameter channel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    /// Vibration velocity (mm/s).
    Velocity,
    /// Vibration acceleration (g).
    Acceleration,
}

/// A vibration measurement channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Catalog identifier (e.g. `V1`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Maximum accepted value (inclusive).
    pub max_value: f64,
    /// What the channel measures.
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
}

/// The monitored units.
pub const UNITS: [UnitInfo; 2] = [
    UnitInfo {
        id: Unit::Dri1,
        name: "Direct Reduction Unit 1",
        code: "DRI 1",
    },
    UnitInfo {
        id: Unit::Dri2,
        name: "Direct Reduction Unit 2",
        code: "DRI 2",
    },
];

/// The equipment catalog, shared by both units.
pub const EQUIPMENT: [Equipment; 12] = [
    Equipment {
        id: "GB-cp48A",
        name: "Compressor 48A Gearbox",
        code: "GB-cp 48A",
    },
    Equipment {
        id: "CP-cp48A",
        name: "Compressor 48A",
        code: "CP-cp 48A",
    },
    Equipment {
        id: "GB-cp48B",
        name: "Compressor 48B Gearbox",
        code: "GB-cp 48B",
    },
    Equipment {
        id: "CP-cp48B",
        name: "Compressor 48B",
        code: "CP-cp 48B",
    },
    Equipment {
        id: "GB-cp51",
        name: "Compressor 51 Gearbox",
        code: "GB-cp 51",
    },
    Equipment {
        id: "CP-cp51",
        name: "Compressor 51",
        code: "CP-cp 51",
    },
    Equipment {
        id: "GB-cp71",
        name: "Compressor 71 Gearbox",
        code: "GB-cp 71",
    },
    Equipment {
        id: "CP-cp71",
        name: "Compressor 71",
        code: "CP-cp 71",
    },
    Equipment {
        id: "CP-cpSGC",
        name: "Seal Gas Compressor",
        code: "CP-cp SGC",
    },
    Equipment {
        id: "FN-fnESF",
        name: "Stack Fan",
        code: "FN-fn ESF",
    },
    Equipment {
        id: "FN-fnAUX",
        name: "Auxiliary Fan",
        code: "FN-fn AUX",
    },
    Equipment {
        id: "FN-fnMAB",
        name: "Main Air Blower",
        code: "FN-fn MAB",
    },
];

/// The parameter catalog.
///
/// Suffix `1` is the drive-end (coupled) bearing, suffix `2` the free end.
pub const PARAMETERS: [Parameter; 12] = [
    Parameter {
        id: "V1",
        name: "Vertical Velocity (coupled)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GV1",
        name: "Vertical Acceleration (coupled)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
    Parameter {
        id: "H1",
        name: "Horizontal Velocity (coupled)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GH1",
        name: "Horizontal Acceleration (coupled)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
    Parameter {
        id: "A1",
        name: "Axial Velocity (coupled)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GA1",
        name: "Axial Acceleration (coupled)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
    Parameter {
        id: "V2",
        name: "Vertical Velocity (free)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GV2",
        name: "Vertical Acceleration (free)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
    Parameter {
        id: "H2",
        name: "Horizontal Velocity (free)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GH2",
        name: "Horizontal Acceleration (free)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
    Parameter {
        id: "A2",
        name: "Axial Velocity (free)",
        max_value: 20.0,
        kind: MeasurementKind::Velocity,
    },
    Parameter {
        id: "GA2",
        name: "Axial Acceleration (free)",
        max_value: 2.0,
        kind: MeasurementKind::Acceleration,
    },
];

/// Looks up an equipment entry by its catalog identifier.
#[must_use]
pub fn find_equipment(id: &str) -> Option<&'static Equipment> {
    EQUIPMENT.iter().find(|equipment| equipment.id == id)
}

/// Looks up a parameter entry by its catalog identifier.
#[must_use]
pub fn find_parameter(id: &str) -> Option<&'static Parameter> {
    PARAMETERS.iter().find(|parameter| parameter.id == id)
}
