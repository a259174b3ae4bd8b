//! Encodes one observation as a SMARTS input deck.
//!
//! SMARTS reads its input as a fixed sequence of list-directed "cards", one
//! per line. Which cards follow depends on the mode selected by the card
//! before, so the order below is part of the format:
//!
//! | Card | Content |
//! | ---- | ------- |
//! | 1    | comment (`'NNNNNN_tag'`) |
//! | 2/2a | pressure mode 2: latitude, ground altitude (km), height above ground (km) |
//! | 3/3a | reference atmosphere 0: air temperature, RH, season, daily mean temperature |
//! | 4-6  | water vapour, ozone and trace-gas defaults |
//! | 7/7a | CO2 (ppm), extraterrestrial spectrum |
//! | 8    | aerosol model |
//! | 9/9a | turbidity mode 5: aerosol optical depth at 550 nm |
//! | 10   | far-field albedo, no tilt |
//! | 11   | spectral range, sun-distance correction, solar constant |
//! | 12   | printed output selection |
//! | 13   | no circumsolar calculation |
//! | 14   | smoothing filter |
//! | 15/16| no illuminance, no UV |
//! | 17/17a | air mass mode 3: date, hour, position, time zone |

use log::error;
use std::fmt;

use crate::config::{ModelSettings, SeasonPolicy};
use crate::error::RowError;
use crate::observation::ObservationRecord;

/// Rendered lines of one input file. Built once, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    cards: Vec<String>,
}

impl InputDocument {
    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    /// File contents: cards joined with newlines, no trailing newline.
    pub fn render(&self) -> String {
        self.cards.join("\n")
    }
}

impl fmt::Display for InputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[derive(Debug, Clone)]
pub struct InputDeckEncoder {
    model: ModelSettings,
    season_policy: SeasonPolicy,
}

impl InputDeckEncoder {
    pub fn new(model: ModelSettings, season_policy: SeasonPolicy) -> Self {
        Self {
            model,
            season_policy,
        }
    }

    pub fn encode(&self, record: &ObservationRecord, row_id: &str) -> Result<InputDocument, RowError> {
        let season = match record.season.smarts_token() {
            Ok(token) => token.to_string(),
            Err(e) => {
                error!("Season mismatch in row {}: {}", row_id, e);
                if self.season_policy == SeasonPolicy::Strict {
                    return Err(e);
                }
                record.season.to_string()
            }
        };

        let model = &self.model;
        let cards = vec![
            // 1 comnt
            format!("'{}_{}'", row_id, model.comment_tag),
            // 2 ispr
            "2".to_string(),
            // 2a latit, altit, height
            format!(
                "{} {} {}",
                real(record.latitude),
                real(record.ground_level() / 1000.0),
                real(record.altitude_agl / 1000.0)
            ),
            // 3 iatmos
            "0".to_string(),
            // 3a tair, rh, season, tday
            format!(
                "{} {} {} {}",
                real(record.temperature),
                real(record.relative_humidity),
                season,
                model.daytime_temperature
            ),
            // 4 ih2o
            "1".to_string(),
            // 5 io3
            "1".to_string(),
            // 6 igas
            "1".to_string(),
            // 7 qco2
            model.co2_ppm.to_string(),
            // 7a ispctr
            "1".to_string(),
            // 8 aeros
            format!("'{}'", model.aerosol_model),
            // 9 iturb
            "5".to_string(),
            // 9a tau550
            real(model.tau550),
            // 10 ialbdx
            "-1".to_string(),
            // 10a rhox
            real(model.albedo),
            // 10b itilt
            "0".to_string(),
            // 11 wlmn, wlmx, suncor, solarc
            "280 4000 1.024 1367.0".to_string(),
            // 12 iprt
            "2".to_string(),
            // 12a wpmn, wpmx, intvl
            "280 4000 .5".to_string(),
            // 12b iotot
            "6".to_string(),
            // 12c iout
            "2 7 8 9 10 30".to_string(),
            // 13 icirc
            "0".to_string(),
            // 14 iscan
            "1".to_string(),
            // 14a ifilt, wv1, wv2, step, fwhm
            "1 310 3970 2.5 30".to_string(),
            // 15 illum
            "0".to_string(),
            // 16 iuv
            "0".to_string(),
            // 17 imass
            "3".to_string(),
            // 17a year, month, day, hour, latit, longit, zone
            format!(
                "{} {} {} {} {} {} 0",
                record.year,
                record.month,
                record.day,
                record.hour,
                real(record.latitude),
                real(record.longitude)
            ),
        ];

        Ok(InputDocument { cards })
    }
}

/// Shortest round-trip form that always keeps a fractional part (`1.0`, `0.5`).
fn real(value: f64) -> String {
    format!("{:?}", value)
}
