//! Classification of the SMARTS printed report.
//!
//! The program has no machine-readable status, so the outcome is recovered by
//! matching fixed phrases of its report. All phrases live in [`MARKERS`].

use super::results::ResultCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Terrestrial,
    ZenithExceeded,
    TurbidityTooLarge,
}

const MARKERS: [(&str, Marker); 3] = [
    ("Terrestrial = ", Marker::Terrestrial),
    ("> 90 deg. RUN ABORTED!", Marker::ZenithExceeded),
    ("turbidity is too large", Marker::TurbidityTooLarge),
];

/// Classifies a full report. An irradiance value wins over any failure
/// marker; a zenith abort wins over a turbidity failure.
pub fn classify(report: &str) -> ResultCode {
    let mut zenith = false;
    let mut turbidity = false;

    for line in report.lines() {
        for (phrase, marker) in MARKERS {
            let Some(pos) = line.find(phrase) else {
                continue;
            };
            match marker {
                Marker::Terrestrial => {
                    if let Some(value) = irradiance_value(&line[pos + phrase.len()..]) {
                        return ResultCode::Irradiance(value);
                    }
                }
                Marker::ZenithExceeded => zenith = true,
                Marker::TurbidityTooLarge => turbidity = true,
            }
        }
    }

    if zenith {
        ResultCode::Nighttime
    } else if turbidity {
        ResultCode::Turbidity
    } else {
        ResultCode::Unclassified
    }
}

// Reads what follows the marker rather than the third '='-field; both give
// the same value on a SMARTS direct-beam line. Only spaces are dropped.
// "  886.37     Atmospheric Transmittance = 0.6430" -> "886.37"
fn irradiance_value(rest: &str) -> Option<String> {
    let compact: String = rest.chars().filter(|c| *c != ' ').collect();
    let value = match compact.find('A') {
        Some(end) => &compact[..end],
        None => compact.as_str(),
    };
    (!value.is_empty()).then(|| value.to_string())
}
