//! Standardised units for quantitative habits.
//!
//! The table is ordered by category (percentage, duration, distance, volume, mass,
//! energy, currency). Lookups by name return the first match in that order, which
//! matters for `pounds`: it exists both as a mass unit and as a currency, and the
//! mass unit wins.

use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

/// UnitCategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UnitCategory {
    Percentage,
    Duration,
    Distance,
    Volume,
    Mass,
    Energy,
    Currency,
    Custom,
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Percentage => "percentage",
            UnitCategory::Duration => "duration",
            UnitCategory::Distance => "distance",
            UnitCategory::Volume => "volume",
            UnitCategory::Mass => "mass",
            UnitCategory::Energy => "energy",
            UnitCategory::Currency => "currency",
            UnitCategory::Custom => "custom",
        }
    }

    /// Parses a category name as it appears on the wire.
    pub fn parse(name: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .chain(std::iter::once(&UnitCategory::Custom))
            .find(|c| c.as_str() == name)
            .copied()
    }
}

/// UnitMapping
///
/// A unit's display symbol and the value suggested when a habit uses it.
#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UnitMapping {
    pub name: String,
    pub symbol: String,
    pub default_value: f64,
    pub category: UnitCategory,
}

/// Static row of the unit table. `UnitMapping` owns its strings so custom units
/// can be built at runtime; the table itself stays `'static`.
#[derive(Debug, Clone, Copy)]
pub struct StaticUnit {
    pub name: &'static str,
    pub symbol: &'static str,
    pub default_value: f64,
    pub category: UnitCategory,
}

impl StaticUnit {
    pub fn to_mapping(&self) -> UnitMapping {
        UnitMapping {
            name: self.name.to_string(),
            symbol: self.symbol.to_string(),
            default_value: self.default_value,
            category: self.category,
        }
    }
}

const fn unit(
    name: &'static str,
    symbol: &'static str,
    default_value: f64,
    category: UnitCategory,
) -> StaticUnit {
    StaticUnit {
        name,
        symbol,
        default_value,
        category,
    }
}

use UnitCategory::*;

/// Every built-in unit, in lookup order.
pub static ALL_UNITS: &[StaticUnit] = &[
    unit("percent", "%", 100.0, Percentage),
    unit("seconds", "s", 60.0, Duration),
    unit("minutes", "min", 30.0, Duration),
    unit("hours", "h", 2.0, Duration),
    unit("kilometers", "km", 5.0, Distance),
    unit("meters", "m", 1000.0, Distance),
    unit("miles", "mi", 3.0, Distance),
    unit("yards", "yd", 500.0, Distance),
    unit("feet", "ft", 1000.0, Distance),
    unit("liters", "L", 2.5, Volume),
    unit("milliliters", "ml", 500.0, Volume),
    unit("glasses", "gl", 8.0, Volume),
    unit("cups", "cups", 6.0, Volume),
    unit("bottles", "btl", 3.0, Volume),
    unit("gallons", "gal", 1.0, Volume),
    unit("kilograms", "kg", 70.0, Mass),
    unit("grams", "g", 500.0, Mass),
    unit("pounds", "lbs", 150.0, Mass),
    unit("ounces", "oz", 16.0, Mass),
    unit("tons", "t", 1.0, Mass),
    unit("calories", "kcal", 300.0, Energy),
    unit("euros", "€", 50.0, Currency),
    unit("dollars", "$", 50.0, Currency),
    unit("pounds", "£", 40.0, Currency),
    unit("yen", "¥", 5000.0, Currency),
    unit("francs", "CHF", 45.0, Currency),
    unit("canadian_dollars", "CAD", 60.0, Currency),
    unit("australian_dollars", "AUD", 70.0, Currency),
    unit("yuan", "¥", 300.0, Currency),
    unit("won", "₩", 60000.0, Currency),
    unit("bitcoin", "₿", 0.001, Currency),
    unit("ethereum", "ETH", 0.02, Currency),
];

/// Built-in categories, in table order.
pub static CATEGORIES: &[UnitCategory] = &[
    Percentage, Duration, Distance, Volume, Mass, Energy, Currency,
];

/// Value used when nothing better is known about a unit.
pub const FALLBACK_DEFAULT_VALUE: f64 = 1.0;

pub fn unit_by_name(name: &str) -> Option<&'static StaticUnit> {
    ALL_UNITS.iter().find(|u| u.name == name)
}

pub fn units_by_category(category: UnitCategory) -> Vec<&'static StaticUnit> {
    ALL_UNITS.iter().filter(|u| u.category == category).collect()
}

/// Suggested default for `name`, or [`FALLBACK_DEFAULT_VALUE`] for unknown units.
pub fn default_value(name: &str) -> f64 {
    unit_by_name(name)
        .map(|u| u.default_value)
        .unwrap_or(FALLBACK_DEFAULT_VALUE)
}

pub fn categories() -> &'static [UnitCategory] {
    CATEGORIES
}

pub fn custom_unit(name: &str, symbol: &str, default_value: f64) -> UnitMapping {
    UnitMapping {
        name: name.to_string(),
        symbol: symbol.to_string(),
        default_value,
        category: UnitCategory::Custom,
    }
}

/// `"8 gl"` for a known unit, the bare value otherwise.
pub fn format_value(value: f64, unit_name: &str) -> String {
    match unit_by_name(unit_name) {
        Some(unit) => format!("{} {}", value, unit.symbol),
        None => format!("{}", value),
    }
}

/// HabitPreset
///
/// A ready-made habit with a unit and a few target suggestions.
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HabitPreset {
    pub name: String,
    pub unit: UnitMapping,
    pub suggestions: Vec<f64>,
}

pub fn habit_presets() -> Vec<HabitPreset> {
    [
        ("Daily Walk", "minutes", [15.0, 30.0, 45.0, 60.0]),
        ("Water Intake", "glasses", [6.0, 8.0, 10.0, 12.0]),
        ("Meditation", "minutes", [5.0, 10.0, 15.0, 20.0]),
        ("Workout", "calories", [200.0, 300.0, 400.0, 500.0]),
    ]
    .into_iter()
    .filter_map(|(name, unit_name, suggestions)| {
        unit_by_name(unit_name).map(|unit| HabitPreset {
            name: name.to_string(),
            unit: unit.to_mapping(),
            suggestions: suggestions.to_vec(),
        })
    })
    .collect()
}
