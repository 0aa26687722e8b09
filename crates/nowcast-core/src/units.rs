//! Unit conversions and label lookups applied during normalization
//!
//! Output must stay compatible with records written by earlier deployments,
//! so the pressure conversion truncates instead of rounding.

use std::fmt;

/// hPa per mmHg, as used by the stored records
pub const HPA_PER_MMHG: f64 = 1.333;

/// Label used for weather codes missing from the lookup table
pub const UNKNOWN_WEATHER: &str = "unknown";

/// Label used in the spreadsheet for weather codes missing from the lookup table
pub const UNKNOWN_WEATHER_RU: &str = "неизвестно";

/// Convert surface pressure from hPa to mmHg, truncating toward negative infinity
pub fn hpa_to_mmhg(hpa: f64) -> f64 {
    floor_div(hpa, HPA_PER_MMHG)
}

/// Floor of the exact quotient `x / y`
///
/// `(x / y).floor()` rounds the quotient first and lands one too high when
/// the true value sits just under an integer. Working from the remainder
/// keeps the result exact.
fn floor_div(x: f64, y: f64) -> f64 {
    let rem = x % y;
    let mut div = (x - rem) / y;
    if rem != 0.0 && (y < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }

    if div == 0.0 {
        return 0.0_f64.copysign(x / y);
    }

    let mut floor = div.floor();
    if div - floor > 0.5 {
        floor += 1.0;
    }
    floor
}

/// Four-way bucketing of a wind bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindDirection {
    North,
    East,
    South,
    West,
}

impl WindDirection {
    /// Bucket a bearing in degrees.
    ///
    /// Intervals: `(315, 360] ∪ [0, 45]` North, `(45, 135]` East,
    /// `(135, 225]` South, `(225, 315]` West. Returns `None` outside
    /// `[0, 360]` or for NaN.
    pub fn from_bearing(degrees: f64) -> Option<Self> {
        if !(0.0..=360.0).contains(&degrees) {
            return None;
        }

        Some(if degrees <= 45.0 || degrees > 315.0 {
            WindDirection::North
        } else if degrees <= 135.0 {
            WindDirection::East
        } else if degrees <= 225.0 {
            WindDirection::South
        } else {
            WindDirection::West
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::East => "East",
            WindDirection::South => "South",
            WindDirection::West => "West",
        }
    }

    /// Inverse of [`WindDirection::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "North" => Some(WindDirection::North),
            "East" => Some(WindDirection::East),
            "South" => Some(WindDirection::South),
            "West" => Some(WindDirection::West),
            _ => None,
        }
    }

    /// Label shown in the spreadsheet
    pub fn label_ru(self) -> &'static str {
        match self {
            WindDirection::North => "Север",
            WindDirection::East => "Восток",
            WindDirection::South => "Юг",
            WindDirection::West => "Запад",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// WMO weather interpretation codes: (code, stored label, spreadsheet label)
///
/// Codes follow the table published with the Open-Meteo forecast API.
const WEATHER_CODES: [(i64, &str, &str); 28] = [
    (0, "Clear sky", "Ясно"),
    (1, "Mainly clear", "Преимущественно ясно"),
    (2, "Partly cloudy", "Переменная облачность"),
    (3, "Overcast", "Пасмурно"),
    (45, "Fog", "Туман"),
    (48, "Depositing rime fog", "Туман с изморозью"),
    (51, "Light drizzle", "Слабая морось"),
    (53, "Moderate drizzle", "Умеренная морось"),
    (55, "Dense drizzle", "Сильная морось"),
    (56, "Light freezing drizzle", "Слабая ледяная морось"),
    (57, "Dense freezing drizzle", "Сильная ледяная морось"),
    (61, "Slight rain", "Небольшой дождь"),
    (63, "Moderate rain", "Умеренный дождь"),
    (65, "Heavy rain", "Сильный дождь"),
    (66, "Light freezing rain", "Слабый ледяной дождь"),
    (67, "Heavy freezing rain", "Сильный ледяной дождь"),
    (71, "Slight snow fall", "Небольшой снег"),
    (73, "Moderate snow fall", "Умеренный снег"),
    (75, "Heavy snow fall", "Сильный снег"),
    (77, "Snow grains", "Снежные зёрна"),
    (80, "Slight rain showers", "Слабый ливень"),
    (81, "Moderate rain showers", "Умеренный ливень"),
    (82, "Violent rain showers", "Сильный ливень"),
    (85, "Slight snow showers", "Слабый снегопад"),
    (86, "Heavy snow showers", "Сильный снегопад"),
    (95, "Thunderstorm", "Гроза"),
    (96, "Thunderstorm with slight hail", "Гроза со слабым градом"),
    (99, "Thunderstorm with heavy hail", "Гроза с сильным градом"),
];

/// Map a WMO weather interpretation code to a label
///
/// Anything outside the table yields [`UNKNOWN_WEATHER`].
pub fn weather_label(code: i64) -> &'static str {
    WEATHER_CODES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, label, _)| *label)
        .unwrap_or(UNKNOWN_WEATHER)
}

/// Spreadsheet label for a stored weather label, `None` if it is not ours
pub fn weather_label_ru(label: &str) -> Option<&'static str> {
    if label == UNKNOWN_WEATHER {
        return Some(UNKNOWN_WEATHER_RU);
    }
    WEATHER_CODES
        .iter()
        .find(|(_, stored, _)| *stored == label)
        .map(|(_, _, ru)| *ru)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_truncates() {
        // 1013 / 1.333 = 759.94..., rounding would give 760
        assert_eq!(hpa_to_mmhg(1013.0), 759.0);
        assert_eq!(hpa_to_mmhg(1333.0), 1000.0);
        assert_eq!(hpa_to_mmhg(999.9), 750.0);
        assert_eq!(hpa_to_mmhg(0.0), 0.0);
    }

    #[test]
    fn test_pressure_floors_exact_quotient() {
        // The rounded quotient of each lands on the next integer
        assert_eq!(hpa_to_mmhg(799.8), 599.0);
        assert_eq!(hpa_to_mmhg(1466.3), 1099.0);
        assert_eq!(hpa_to_mmhg(1599.6), 1199.0);
        assert_eq!(hpa_to_mmhg(839.79), 629.0);
        assert_eq!(hpa_to_mmhg(946.43), 709.0);
        assert_eq!(hpa_to_mmhg(-5.0), -4.0);
    }

    #[test]
    fn test_wind_direction_boundaries() {
        assert_eq!(WindDirection::from_bearing(0.0), Some(WindDirection::North));
        assert_eq!(WindDirection::from_bearing(45.0), Some(WindDirection::North));
        assert_eq!(WindDirection::from_bearing(45.0001), Some(WindDirection::East));
        assert_eq!(WindDirection::from_bearing(135.0), Some(WindDirection::East));
        assert_eq!(WindDirection::from_bearing(135.5), Some(WindDirection::South));
        assert_eq!(WindDirection::from_bearing(225.0), Some(WindDirection::South));
        assert_eq!(WindDirection::from_bearing(225.1), Some(WindDirection::West));
        assert_eq!(WindDirection::from_bearing(315.0), Some(WindDirection::West));
        assert_eq!(WindDirection::from_bearing(315.1), Some(WindDirection::North));
        assert_eq!(WindDirection::from_bearing(360.0), Some(WindDirection::North));
    }

    #[test]
    fn test_wind_direction_covers_whole_circle() {
        let mut tenth = 0;
        while tenth <= 3600 {
            let bearing = tenth as f64 / 10.0;
            assert!(
                WindDirection::from_bearing(bearing).is_some(),
                "no label for {bearing}"
            );
            tenth += 1;
        }
    }

    #[test]
    fn test_wind_direction_rejects_out_of_range() {
        assert_eq!(WindDirection::from_bearing(-0.1), None);
        assert_eq!(WindDirection::from_bearing(360.1), None);
        assert_eq!(WindDirection::from_bearing(f64::NAN), None);
    }

    #[test]
    fn test_weather_labels() {
        assert_eq!(weather_label(0), "Clear sky");
        assert_eq!(weather_label(63), "Moderate rain");
        assert_eq!(weather_label(99), "Thunderstorm with heavy hail");
        assert_eq!(weather_label(4), UNKNOWN_WEATHER);
        assert_eq!(weather_label(-1), UNKNOWN_WEATHER);
    }

    #[test]
    fn test_wind_direction_display() {
        assert_eq!(WindDirection::South.to_string(), "South");
    }

    #[test]
    fn test_spreadsheet_labels() {
        for direction in [
            WindDirection::North,
            WindDirection::East,
            WindDirection::South,
            WindDirection::West,
        ] {
            assert_eq!(WindDirection::from_label(direction.label()), Some(direction));
        }
        assert_eq!(WindDirection::North.label_ru(), "Север");
        assert_eq!(WindDirection::from_label("north"), None);

        assert_eq!(weather_label_ru(weather_label(0)), Some("Ясно"));
        assert_eq!(weather_label_ru(weather_label(95)), Some("Гроза"));
        assert_eq!(weather_label_ru(UNKNOWN_WEATHER), Some(UNKNOWN_WEATHER_RU));
        assert_eq!(weather_label_ru("Sunny"), None);
    }
}
