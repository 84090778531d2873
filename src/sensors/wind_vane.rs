//! Resistor-ladder wind vane decoder.
//!
//! The vane switches one of 16 resistors into a voltage divider, so each
//! compass sector lands in its own ADC band. The bands below were measured
//! on the installed vane with a 10-bit-normalised reading (raw 16-bit / 64).
//! A floating input (vane unplugged) falls outside every band and decodes
//! to [`WindSector::NotAvailable`].

use serde::Serialize;

/// Divide a 16-bit ADC reading down to the 0–1023 range the table uses.
pub const ADC_NORMALISE_SHIFT: u32 = 6;

/// Heading reported when no sector matches.
pub const NO_READING_DEGREES: f32 = 999.9;

/// Compass sector reported by the vane.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindSector {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl WindSector {
    pub const fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
            Self::NotAvailable => "N/A",
        }
    }

    /// Heading in degrees. SE keeps the 135.5 of the calibrated table
    /// rather than the 135.0 of the 22.5° grid.
    pub const fn degrees(self) -> f32 {
        match self {
            Self::N => 0.0,
            Self::NNE => 22.5,
            Self::NE => 45.0,
            Self::ENE => 67.5,
            Self::E => 90.0,
            Self::ESE => 112.5,
            Self::SE => 135.5,
            Self::SSE => 157.5,
            Self::S => 180.0,
            Self::SSW => 202.5,
            Self::SW => 225.0,
            Self::WSW => 247.5,
            Self::W => 270.0,
            Self::WNW => 292.5,
            Self::NW => 315.0,
            Self::NNW => 337.5,
            Self::NotAvailable => NO_READING_DEGREES,
        }
    }
}

/// Inclusive ADC bands, ascending and non-overlapping.
pub const SECTOR_TABLE: [(i32, i32, WindSector); 16] = [
    (250, 284, WindSector::ESE),
    (285, 304, WindSector::ENE),
    (305, 324, WindSector::E),
    (325, 374, WindSector::SSE),
    (375, 450, WindSector::SE),
    (451, 509, WindSector::SSW),
    (510, 549, WindSector::S),
    (550, 649, WindSector::NNE),
    (650, 724, WindSector::NE),
    (725, 797, WindSector::WSW),
    (798, 824, WindSector::SW),
    (825, 874, WindSector::NNW),
    (875, 909, WindSector::N),
    (910, 934, WindSector::WNW),
    (935, 974, WindSector::NW),
    (975, 1023, WindSector::W),
];

/// Map a normalised reading to its sector and heading. Total over `i32`.
pub fn decode(reading: i32) -> (WindSector, f32) {
    let sector = SECTOR_TABLE
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&reading))
        .map_or(WindSector::NotAvailable, |(_, _, s)| *s);
    (sector, sector.degrees())
}

/// Decode straight from a 16-bit ADC sample.
pub fn decode_raw(raw: u16) -> (WindSector, f32) {
    decode(i32::from(raw >> ADC_NORMALISE_SHIFT))
}
