use serde::{Deserialize, Deserializer, Serialize};

/// One of the four displayed record fields.
///
/// The order of [`Field::ALL`] is the column order of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The artist name.
    #[default]
    Artist,
    /// The album title.
    Album,
    /// The genre.
    Genre,
    /// The release year.
    Year,
}

impl Field {
    /// All fields, in column order.
    pub const ALL: [Field; 4] = [Field::Artist, Field::Album, Field::Genre, Field::Year];

    /// The key used for this field in the JSON payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Genre => "genre",
            Field::Year => "year",
        }
    }

    /// The column heading for this field.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Artist => "Artist",
            Field::Album => "Album",
            Field::Genre => "Genre",
            Field::Year => "Year",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single album entry.
///
/// Every field is optional on the wire. `year` may be written as either a string
/// or a number and is kept in its textual form. Fields other than the four known
/// ones are kept untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The artist name.
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub artist: Option<String>,
    /// The album title.
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub album: Option<String>,
    /// The genre. Always `Some` once the record has been [normalized](Record::normalized).
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,
    /// The release year, as written in the payload.
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    /// Any other fields present in the payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Gives the record an empty genre if it has none. Everything else is left as-is.
    pub fn normalized(mut self) -> Self {
        if self.genre.as_deref().is_none_or(str::is_empty) {
            self.genre = Some(String::new());
        }
        self
    }

    /// Returns the value of `field`, if present.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Artist => self.artist.as_deref(),
            Field::Album => self.album.as_deref(),
            Field::Genre => self.genre.as_deref(),
            Field::Year => self.year.as_deref(),
        }
    }

    /// Returns the value of `field`, or the empty string if it is absent.
    pub fn field_or_empty(&self, field: Field) -> &str {
        self.field(field).unwrap_or_default()
    }
}

/// Keeps strings, numbers and booleans as text. Null, objects and arrays read as absent
/// so one odd value does not reject the whole payload.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde_json::Value;

    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(number_text(&n)),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => None,
    })
}

/// Integral floats lose their fractional part, so `1992.0` reads as `1992`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_accepts_number_or_string() {
        let numeric: Record = serde_json::from_str(r#"{"artist":"Abba","year":1992}"#).unwrap();
        let textual: Record = serde_json::from_str(r#"{"artist":"Abba","year":"1992"}"#).unwrap();
        assert_eq!(numeric.year.as_deref(), Some("1992"));
        assert_eq!(numeric, textual);
    }

    #[test]
    fn test_integral_float_year_drops_fraction() {
        let record: Record = serde_json::from_str(r#"{"year":1992.0}"#).unwrap();
        assert_eq!(record.year.as_deref(), Some("1992"));

        let record: Record = serde_json::from_str(r#"{"year":1992.5}"#).unwrap();
        assert_eq!(record.year.as_deref(), Some("1992.5"));
    }

    #[test]
    fn test_structured_values_read_as_absent() {
        let record: Record =
            serde_json::from_str(r#"{"artist":{"name":"A"},"album":["Low"],"year":1977}"#)
                .unwrap();
        assert_eq!(record.artist, None);
        assert_eq!(record.album, None);
        assert_eq!(record.year.as_deref(), Some("1977"));
    }

    #[test]
    fn test_missing_and_null_fields_are_absent() {
        let record: Record = serde_json::from_str(r#"{"album":null}"#).unwrap();
        assert_eq!(record.artist, None);
        assert_eq!(record.album, None);
        assert_eq!(record.field_or_empty(Field::Artist), "");
    }

    #[test]
    fn test_normalized_only_touches_genre() {
        let record: Record =
            serde_json::from_str(r#"{"artist":"Bowie","label":"RCA","year":1977}"#).unwrap();
        let normalized = record.clone().normalized();
        assert_eq!(normalized.genre.as_deref(), Some(""));
        assert_eq!(normalized.artist, record.artist);
        assert_eq!(normalized.year, record.year);
        assert_eq!(normalized.extra.get("label"), Some(&serde_json::json!("RCA")));

        let rock = Record {
            genre: Some("Rock".to_string()),
            ..Default::default()
        };
        assert_eq!(rock.normalized().genre.as_deref(), Some("Rock"));
    }
}
