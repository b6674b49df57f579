//! Present/absent wrapper for partial-update fields.
//!
//! `Patch::Absent` means "leave the stored value untouched". For optional
//! columns the payload type is `Option<T>`, so `Patch::Set(None)` is an
//! explicit clear and stays distinguishable from an omitted field.
//!
//! Serde mapping (fields must carry `#[serde(default)]`):
//! - missing key -> `Absent`
//! - `null` -> `Set(None)` when `T = Option<_>`
//! - any other value -> `Set(value)`

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True when a value is present and differs from `current`.
    pub fn differs_from(&self, current: &T) -> bool
    where
        T: PartialEq,
    {
        matches!(self, Self::Set(value) if value != current)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}
