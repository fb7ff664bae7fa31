//! Serde helpers for the loosely typed fields chunirec returns.
//!
//! Flags arrive as `true`/`false` on some endpoints and `0`/`1` on others,
//! and numeric fields may be `null` for charts whose constant is not known yet.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Accept a bool, a number (non-zero = true) or `null` (false).
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        Some(FlagRepr::Bool(b)) => b,
        Some(FlagRepr::Int(i)) => i != 0,
        Some(FlagRepr::Float(f)) => f != 0.0,
        None => false,
    })
}

/// Treat `null` as the type's default.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
