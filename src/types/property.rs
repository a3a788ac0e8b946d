//! Property attributes entered on the valuation form

use serde::{Deserialize, Serialize};

/// Bounds, default and display label of one form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Field name as it appears in requests
    pub name: &'static str,
    /// Human-facing label
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldSpec {
    /// Clamp a value into this field's domain.
    ///
    /// NaN collapses to the default so a bad value can never reach the model.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const AVERAGE_AREA_INCOME: FieldSpec = FieldSpec {
    name: "average_area_income",
    label: "Average Area Income ($)",
    min: 10_000.0,
    max: 200_000.0,
    default: 50_000.0,
};

pub const AVERAGE_HOUSE_AGE: FieldSpec = FieldSpec {
    name: "average_house_age",
    label: "Average House Age (Years)",
    min: 1.0,
    max: 20.0,
    default: 5.0,
};

pub const NUMBER_OF_ROOMS: FieldSpec = FieldSpec {
    name: "number_of_rooms",
    label: "Number of Rooms",
    min: 1.0,
    max: 10.0,
    default: 5.0,
};

pub const NUMBER_OF_BEDROOMS: FieldSpec = FieldSpec {
    name: "number_of_bedrooms",
    label: "Number of Bedrooms",
    min: 1.0,
    max: 6.0,
    default: 3.0,
};

pub const AREA_POPULATION: FieldSpec = FieldSpec {
    name: "area_population",
    label: "Area Population",
    min: 1_000.0,
    max: 100_000.0,
    default: 30_000.0,
};

/// All form fields, in model column order.
pub const FIELDS: [FieldSpec; 5] = [
    AVERAGE_AREA_INCOME,
    AVERAGE_HOUSE_AGE,
    NUMBER_OF_ROOMS,
    NUMBER_OF_BEDROOMS,
    AREA_POPULATION,
];

fn default_income() -> f64 {
    AVERAGE_AREA_INCOME.default
}

fn default_age() -> f64 {
    AVERAGE_HOUSE_AGE.default
}

fn default_rooms() -> f64 {
    NUMBER_OF_ROOMS.default
}

fn default_bedrooms() -> f64 {
    NUMBER_OF_BEDROOMS.default
}

fn default_population() -> f64 {
    AREA_POPULATION.default
}

/// The five attributes of a property to value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyInputs {
    /// Average income of residents in the area, in dollars
    #[serde(default = "default_income")]
    pub average_area_income: f64,

    /// Average age of houses in the area, in years
    #[serde(default = "default_age")]
    pub average_house_age: f64,

    /// Number of rooms
    #[serde(default = "default_rooms")]
    pub number_of_rooms: f64,

    /// Number of bedrooms
    #[serde(default = "default_bedrooms")]
    pub number_of_bedrooms: f64,

    /// Population of the area
    #[serde(default = "default_population")]
    pub area_population: f64,
}

impl PropertyInputs {
    pub fn new(
        average_area_income: f64,
        average_house_age: f64,
        number_of_rooms: f64,
        number_of_bedrooms: f64,
        area_population: f64,
    ) -> Self {
        Self {
            average_area_income,
            average_house_age,
            number_of_rooms,
            number_of_bedrooms,
            area_population,
        }
    }

    /// Copy with every field clamped into its domain
    pub fn clamped(&self) -> Self {
        Self {
            average_area_income: AVERAGE_AREA_INCOME.clamp(self.average_area_income),
            average_house_age: AVERAGE_HOUSE_AGE.clamp(self.average_house_age),
            number_of_rooms: NUMBER_OF_ROOMS.clamp(self.number_of_rooms),
            number_of_bedrooms: NUMBER_OF_BEDROOMS.clamp(self.number_of_bedrooms),
            area_population: AREA_POPULATION.clamp(self.area_population),
        }
    }

    /// True when every field already lies within its domain
    pub fn is_within_bounds(&self) -> bool {
        FIELDS
            .iter()
            .zip(self.values())
            .all(|(field, value)| field.contains(value))
    }

    /// Field values in model column order
    pub fn values(&self) -> [f64; 5] {
        [
            self.average_area_income,
            self.average_house_age,
            self.number_of_rooms,
            self.number_of_bedrooms,
            self.area_population,
        ]
    }

    /// Build inputs from values in model column order
    pub fn from_values(values: [f64; 5]) -> Self {
        let [income, age, rooms, bedrooms, population] = values;
        Self::new(income, age, rooms, bedrooms, population)
    }
}

impl Default for PropertyInputs {
    fn default() -> Self {
        Self::from_values(FIELDS.map(|field| field.default))
    }
}
