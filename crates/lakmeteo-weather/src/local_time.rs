//! Deserializers for the location-local timestamps Open-Meteo returns
//! (`2024-06-01T14:00`, no offset). Used through `deserialize_with`.

use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

pub(crate) fn parse(value: &str) -> Option<NaiveDateTime> {
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub(crate) fn deserialize<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(d)?;
    parse(&value).ok_or_else(|| D::Error::custom(format!("invalid local timestamp: {}", value)))
}

pub(crate) fn deserialize_vec<'de, D>(d: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(d)?
        .iter()
        .map(|value| {
            parse(value)
                .ok_or_else(|| D::Error::custom(format!("invalid local timestamp: {}", value)))
        })
        .collect()
}

/// Like [`deserialize_vec`], but `null` entries become `None`.
pub(crate) fn deserialize_opt_vec<'de, D>(d: D) -> Result<Vec<Option<NaiveDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Option<String>>::deserialize(d)?
        .into_iter()
        .map(|value| match value {
            None => Ok(None),
            Some(value) => parse(&value).map(Some).ok_or_else(|| {
                D::Error::custom(format!("invalid local timestamp: {}", value))
            }),
        })
        .collect()
}
