use serde::de::{self, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};

use crate::{Collision, CollisionReport, HashTable, Key, KeyRef, Statistics};

impl Serialize for KeyRef<'_> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        match *self {
            KeyRef::Text(text) => serializer.serialize_str(text),
            KeyRef::Int(n) => serializer.serialize_i64(n),
        }
    }
}

impl Serialize for Key {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        self.view().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}

struct KeyVisitor;

impl Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a string or a whole number")
    }

    fn visit_str<E>(self, v: &str) -> Result<Key, E>
    where
        E: de::Error,
    {
        Ok(Key::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Key, E>
    where
        E: de::Error,
    {
        Ok(Key::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Key, E>
    where
        E: de::Error,
    {
        Ok(Key::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Key, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Key::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Key, E>
    where
        E: de::Error,
    {
        Key::try_from(v).map_err(E::custom)
    }
}

impl<V> Serialize for HashTable<V>
where
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl Serialize for Statistics {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut state = serializer.serialize_struct("Statistics", 5)?;
        state.serialize_field("total_slots", &self.total_slots)?;
        state.serialize_field("occupied", &self.occupied)?;
        state.serialize_field("empty", &self.empty)?;
        state.serialize_field("deleted", &self.deleted)?;
        state.serialize_field("load_factor", &self.load_factor)?;
        state.end()
    }
}

impl Serialize for Collision {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut state = serializer.serialize_struct("Collision", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("base_position", &self.base_position)?;
        state.serialize_field("actual_position", &self.actual_position)?;
        state.serialize_field("offset", &self.offset)?;
        state.end()
    }
}

impl Serialize for CollisionReport {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut state = serializer.serialize_struct("CollisionReport", 2)?;
        state.serialize_field("collisions", &self.collisions)?;
        state.serialize_field("groups", &self.groups())?;
        state.end()
    }
}
