use csv::StringRecord;
use std::fmt;

use crate::error::RowError;
use crate::headers::{Field, ResolvedHeaders};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Season {
    Spring,
    Fall,
    Other(String),
}

impl Season {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "spring" => Season::Spring,
            "fall" => Season::Fall,
            other => Season::Other(other.to_string()),
        }
    }

    /// SMARTS season token. Both migrations fly in calendar summer, so spring
    /// and fall map to the same reference atmosphere.
    pub fn smarts_token(&self) -> Result<&'static str, RowError> {
        match self {
            Season::Spring | Season::Fall => Ok("'SUMMER'"),
            Season::Other(label) => Err(RowError::Season(label.clone())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "spring"),
            Season::Fall => write!(f, "fall"),
            Season::Other(label) => write!(f, "{}", label),
        }
    }
}

/// One tracking fix, already mapped onto the logical fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
    pub season: Season,
    pub altitude_asl: f64, // m above sea level
    pub altitude_agl: f64, // m above ground level
    pub temperature: f64,
    pub relative_humidity: f64,
}

impl ObservationRecord {
    /// Terrain elevation under the bird, in metres.
    pub fn ground_level(&self) -> f64 {
        self.altitude_asl - self.altitude_agl
    }

    pub fn from_record(record: &StringRecord, headers: &ResolvedHeaders) -> Result<Self, RowError> {
        let row = RowReader { record, headers };

        Ok(Self {
            year: row.integer(Field::Year)?,
            month: row.integer(Field::Month)?,
            day: row.integer(Field::Day)?,
            hour: row.integer(Field::Hour)?,
            minute: row.optional_integer(Field::Minute)?,
            second: row.optional_integer(Field::Second)?,
            latitude: row.real(Field::Latitude)?,
            longitude: row.real(Field::Longitude)?,
            season: Season::parse(row.text(Field::Season)?),
            altitude_asl: row.real(Field::AltitudeAsl)?,
            altitude_agl: row.real(Field::AltitudeAgl)?,
            temperature: row.real(Field::Temperature)?,
            relative_humidity: row.real(Field::RelativeHumidity)?,
        })
    }
}

struct RowReader<'a> {
    record: &'a StringRecord,
    headers: &'a ResolvedHeaders,
}

impl RowReader<'_> {
    fn lookup(&self, field: Field) -> Option<&str> {
        let column = self.headers.get(field)?;
        self.record
            .get(column.index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn text(&self, field: Field) -> Result<&str, RowError> {
        self.lookup(field).ok_or(RowError::MissingValue(field))
    }

    fn real(&self, field: Field) -> Result<f64, RowError> {
        let value = self.text(field)?;
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RowError::InvalidValue {
                field,
                value: value.to_string(),
            })
    }

    // Dataframe exports often write integer columns as "2023.0".
    fn integer<T: TryFrom<i64>>(&self, field: Field) -> Result<T, RowError> {
        let value = self.text(field)?;
        let invalid = || RowError::InvalidValue {
            field,
            value: value.to_string(),
        };

        let parsed = match value.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                let v = value.parse::<f64>().map_err(|_| invalid())?;
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(invalid());
                }
                v as i64
            }
        };

        T::try_from(parsed).map_err(|_| invalid())
    }

    fn optional_integer<T: TryFrom<i64>>(&self, field: Field) -> Result<Option<T>, RowError> {
        match self.lookup(field) {
            Some(_) => self.integer(field).map(Some),
            None => Ok(None),
        }
    }
}
