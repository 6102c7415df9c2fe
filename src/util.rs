use core::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserializer;

/// Accepts a JSON string and degrades every other JSON value (number, bool,
/// null, array, object) to an empty string instead of failing.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  struct LenientString;

  impl<'de> Visitor<'de> for LenientString {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
      formatter.write_str("any JSON value, strings are kept")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(value.to_owned())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(value)
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
      Ok(String::new())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
      A: SeqAccess<'de>,
    {
      while seq.next_element::<IgnoredAny>()?.is_some() {}
      Ok(String::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
      A: MapAccess<'de>,
    {
      while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
      Ok(String::new())
    }
  }

  deserializer.deserialize_any(LenientString)
}
