pub mod answers;
pub mod history;
pub mod recommendation;
pub mod routine;

use serde::{Deserialize, Deserializer};

/// Reads an optional field, mapping an explicit `null` to the type's default.
/// Pair with `#[serde(default)]` so an absent field behaves the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
