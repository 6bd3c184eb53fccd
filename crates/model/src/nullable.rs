use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` as the type's default.
///
/// The server writes nil maps and slices as `null`; struct-level
/// `#[serde(default)]` only covers absent keys.
pub(crate) fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
