//! Maps the loosely named columns of a tracking table onto the fixed set of
//! logical fields the encoder needs.

use log::{debug, error, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RunError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Latitude,
    Longitude,
    Season,
    AltitudeAsl,
    AltitudeAgl,
    Temperature,
    RelativeHumidity,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Latitude,
        Field::Longitude,
        Field::Season,
        Field::AltitudeAsl,
        Field::AltitudeAgl,
        Field::Temperature,
        Field::RelativeHumidity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Season => "season",
            Field::AltitudeAsl => "asl",
            Field::AltitudeAgl => "agl",
            Field::Temperature => "temperature",
            Field::RelativeHumidity => "relative_humidity",
        }
    }

    /// Minute and second are carried along but no card consumes them.
    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Minute | Field::Second)
    }

    fn default_aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Year => &["Year", "year", "YEAR", "yr", "YR", "YY", "YYYY"],
            Field::Month => &["Month", "month", "MONTH", "mon", "MON", "MM"],
            Field::Day => &["Day", "day", "DAY"],
            Field::Hour => &["Hour", "hour", "HOUR"],
            Field::Minute => &["Minute", "minute", "MINUTE"],
            Field::Second => &["Second", "second", "SECOND"],
            Field::Latitude => &["Latitude", "latitude", "LATITUDE", "track_latitude"],
            Field::Longitude => &["Longitude", "longitude", "LONGITUDE", "track_longitude"],
            Field::Season => &["Season", "season", "SEASON"],
            Field::AltitudeAsl => &["Asl", "asl", "ASL"],
            Field::AltitudeAgl => &["Agl", "agl", "AGL"],
            Field::Temperature => &["column_temperature"],
            Field::RelativeHumidity => &["column_relhum"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Ordered spellings accepted for every logical field. Order matters: it is
/// the tie-break when a table carries more than one spelling.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<Field, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let aliases = Field::ALL
            .into_iter()
            .map(|field| {
                let names = field.default_aliases().iter().map(|s| s.to_string()).collect();
                (field, names)
            })
            .collect();
        Self { aliases }
    }
}

impl AliasTable {
    /// Appends spellings after the built-in ones, skipping duplicates.
    pub fn extend(&mut self, field: Field, extra: &[String]) {
        let names = self.aliases.entry(field).or_default();
        for alias in extra {
            if !names.contains(alias) {
                names.push(alias.clone());
            }
        }
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Binds every logical field to one of the present column names.
    ///
    /// A field with several present spellings is bound to the first one in
    /// alias order and reported as ambiguous. A field with none is recorded as
    /// missing; callers decide whether that is fatal via
    /// [`ResolvedHeaders::ensure_required`].
    pub fn resolve<S: AsRef<str>>(&self, columns: &[S]) -> ResolvedHeaders {
        debug!(
            "all headers: {:?}",
            columns.iter().map(|c| c.as_ref()).collect::<Vec<&str>>()
        );

        let mut bound = HashMap::new();
        let mut missing = Vec::new();

        for field in Field::ALL {
            let matches: Vec<(&str, usize)> = self
                .aliases(field)
                .iter()
                .filter_map(|alias| {
                    columns
                        .iter()
                        .position(|c| c.as_ref() == alias.as_str())
                        .map(|idx| (alias.as_str(), idx))
                })
                .collect();

            match matches.as_slice() {
                [] => {
                    error!(
                        "no header match for {} from valid options {:?}, please check your input csv",
                        field,
                        self.aliases(field)
                    );
                    missing.push(field);
                }
                [(name, idx)] => {
                    debug!("header match for {}: {}", field, name);
                    bound.insert(field, Column::new(name, *idx));
                }
                [(name, idx), ..] => {
                    warn!(
                        "header has more than one match for {}: {:?}, using {}",
                        field,
                        matches.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
                        name
                    );
                    bound.insert(field, Column::new(name, *idx));
                }
            }
        }

        ResolvedHeaders { bound, missing }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub index: usize,
}

impl Column {
    fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedHeaders {
    bound: HashMap<Field, Column>,
    missing: Vec<Field>,
}

impl ResolvedHeaders {
    pub fn get(&self, field: Field) -> Option<&Column> {
        self.bound.get(&field)
    }

    pub fn missing(&self) -> &[Field] {
        &self.missing
    }

    pub fn ensure_required(&self, aliases: &AliasTable) -> Result<(), RunError> {
        match self.missing.iter().find(|field| field.is_required()) {
            Some(field) => Err(RunError::MissingColumn {
                field: *field,
                aliases: aliases.aliases(*field).to_vec(),
            }),
            None => Ok(()),
        }
    }
}
