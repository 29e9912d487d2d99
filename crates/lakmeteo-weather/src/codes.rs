//! WMO weather code lookup.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Display icon and description for one weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub icon: &'static str,
    pub description: &'static str,
}

/// Returned for any code missing from the table. The code space is owned
/// by the API and may grow.
pub const UNKNOWN: WeatherInfo = WeatherInfo {
    icon: "🌡️",
    description: "Unknown",
};

const fn info(icon: &'static str, description: &'static str) -> WeatherInfo {
    WeatherInfo { icon, description }
}

/// Sorted by code for binary search.
static WEATHER_CODES: [(i32, WeatherInfo); 28] = [
    (0, info("☀️", "Clear sky")),
    (1, info("🌤️", "Mainly clear")),
    (2, info("⛅", "Partly cloudy")),
    (3, info("☁️", "Overcast")),
    (45, info("🌫️", "Fog")),
    (48, info("🌫️", "Depositing rime fog")),
    (51, info("🌦️", "Light drizzle")),
    (53, info("🌦️", "Moderate drizzle")),
    (55, info("🌧️", "Dense drizzle")),
    (56, info("🌧️", "Light freezing drizzle")),
    (57, info("🌧️", "Dense freezing drizzle")),
    (61, info("🌦️", "Slight rain")),
    (63, info("🌧️", "Moderate rain")),
    (65, info("🌧️", "Heavy rain")),
    (66, info("🌨️", "Light freezing rain")),
    (67, info("🌨️", "Heavy freezing rain")),
    (71, info("🌨️", "Slight snow fall")),
    (73, info("🌨️", "Moderate snow fall")),
    (75, info("❄️", "Heavy snow fall")),
    (77, info("❄️", "Snow grains")),
    (80, info("🌦️", "Slight rain showers")),
    (81, info("🌧️", "Moderate rain showers")),
    (82, info("⛈️", "Violent rain showers")),
    (85, info("🌨️", "Slight snow showers")),
    (86, info("❄️", "Heavy snow showers")),
    (95, info("⛈️", "Thunderstorm")),
    (96, info("⛈️", "Thunderstorm with slight hail")),
    (99, info("⛈️", "Thunderstorm with heavy hail")),
];

/// Look up a weather code, falling back to [`UNKNOWN`].
pub fn lookup(code: i32) -> WeatherInfo {
    WEATHER_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|i| WEATHER_CODES[i].1)
        .unwrap_or(UNKNOWN)
}

/// Same as [`lookup`] for a possibly missing code.
pub fn lookup_opt(code: Option<i32>) -> WeatherInfo {
    code.map_or(UNKNOWN, lookup)
}

pub fn icon_for(code: i32) -> &'static str {
    lookup(code).icon
}

pub fn description_for(code: i32) -> &'static str {
    lookup(code).description
}

/// True if the code has its own table entry.
pub fn is_known(code: i32) -> bool {
    WEATHER_CODES.binary_search_by_key(&code, |(c, _)| *c).is_ok()
}
