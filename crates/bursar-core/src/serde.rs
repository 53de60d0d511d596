use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        id: Option<Uuid>,
    }

    #[test]
    fn test_empty_string_is_none() {
        let w: Wrapper = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(w.id.is_none());
    }

    #[test]
    fn test_valid_uuid_parses() {
        let w: Wrapper =
            serde_json::from_str(r#"{"id": "550e8400-e29b-41d4-a716-446655440000"}"#).unwrap();
        assert!(w.id.is_some());
    }
}
