//! Serde adapter storing a list of shape ids as comma-joined text (`"3,7"`, `""` when empty).

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serializer};

use super::ShapeId;

pub fn serialize<S: Serializer>(ids: &[ShapeId], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ids.iter().join(","))
}

pub fn deserialize<'de, De: Deserializer<'de>>(deserializer: De) -> Result<Vec<ShapeId>, De::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(serde::de::Error::custom)
}

/// Blank tokens are skipped, so `""` and `"[3, ,7]"` are accepted.
pub fn parse(text: &str) -> Result<Vec<ShapeId>, std::num::ParseIntError> {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect::<String>()
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
