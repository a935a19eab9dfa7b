use mongodb::bson::DateTime;
use mongodb::bson::oid::ObjectId;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A movie document from the `movies` collection.
///
/// Field names match the stored document, except `_id` which is exposed as
/// `id`. Every field is optional; scalar fields tolerate the loosely typed
/// values found in the sample dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    #[serde(
        rename(serialize = "id", deserialize = "_id"),
        serialize_with = "object_id_as_hex"
    )]
    pub id: Option<ObjectId>,
    #[serde(deserialize_with = "lenient_string")]
    pub plot: Option<String>,
    pub genres: Vec<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub runtime: Option<i64>,
    pub cast: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub poster: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub fullplot: Option<String>,
    pub languages: Vec<String>,
    #[serde(serialize_with = "datetime_as_millis")]
    pub released: Option<DateTime>,
    pub directors: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub rated: Option<String>,
    pub awards: Option<Awards>,
    #[serde(deserialize_with = "lenient_string")]
    pub lastupdated: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub year: Option<i64>,
    pub imdb: Option<Imdb>,
    pub countries: Vec<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    pub tomatoes: Option<Tomatoes>,
    #[serde(deserialize_with = "lenient_int")]
    pub num_mflix_comments: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Awards {
    #[serde(deserialize_with = "lenient_int")]
    pub wins: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub nominations: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imdb {
    #[serde(deserialize_with = "lenient_float")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient_int")]
    pub votes: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tomatoes {
    pub viewer: Option<Reviews>,
    pub critic: Option<Reviews>,
    #[serde(deserialize_with = "lenient_int")]
    pub fresh: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub rotten: Option<i64>,
    #[serde(rename = "lastUpdated", serialize_with = "datetime_as_millis")]
    pub last_updated: Option<DateTime>,
}

/// Critic or viewer review aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reviews {
    #[serde(deserialize_with = "lenient_float")]
    pub rating: Option<f64>,
    #[serde(rename = "numReviews", deserialize_with = "lenient_int")]
    pub num_reviews: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub meter: Option<i64>,
}

fn object_id_as_hex<S: Serializer>(id: &Option<ObjectId>, s: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => s.serialize_str(&id.to_hex()),
        None => s.serialize_none(),
    }
}

fn datetime_as_millis<S: Serializer>(dt: &Option<DateTime>, s: S) -> Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => s.serialize_i64(dt.timestamp_millis()),
        None => s.serialize_none(),
    }
}

/// Scalar kinds the lenient visitor can produce
#[derive(Clone, Copy)]
enum Scalar {
    Int,
    Float,
    Text,
}

/// Accepts any scalar and converts it to the wanted kind, yielding `None`
/// for nulls and values that cannot be converted.
struct LenientVisitor(Scalar);

#[derive(Debug, PartialEq)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn from_f64(kind: Scalar, v: f64) -> Option<Self> {
        match kind {
            Scalar::Float => Some(Lenient::Float(v)),
            Scalar::Int if v.is_finite() && v.fract() == 0.0 => Some(Lenient::Int(v as i64)),
            Scalar::Int => None,
            Scalar::Text => Some(Lenient::Text(v.to_string())),
        }
    }

    fn from_i64(kind: Scalar, v: i64) -> Option<Self> {
        match kind {
            Scalar::Int => Some(Lenient::Int(v)),
            Scalar::Float => Some(Lenient::Float(v as f64)),
            Scalar::Text => Some(Lenient::Text(v.to_string())),
        }
    }

    fn from_text(kind: Scalar, v: &str) -> Option<Self> {
        match kind {
            Scalar::Text => Some(Lenient::Text(v.to_string())),
            Scalar::Int => v.trim().parse().ok().map(Lenient::Int),
            Scalar::Float => v.trim().parse().ok().map(Lenient::Float),
        }
    }
}

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Option<Lenient>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a string or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(match self.0 {
            Scalar::Text => Some(Lenient::Text(v.to_string())),
            _ => None,
        })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Lenient::from_i64(self.0, v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        match i64::try_from(v) {
            Ok(v) => Ok(Lenient::from_i64(self.0, v)),
            Err(_) => Ok(Lenient::from_f64(self.0, v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Lenient::from_f64(self.0, v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Lenient::from_text(self.0, v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }
}

fn lenient<'de, D: Deserializer<'de>>(d: D, kind: Scalar) -> Result<Option<Lenient>, D::Error> {
    d.deserialize_any(LenientVisitor(kind))
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match lenient(d, Scalar::Int)? {
        Some(Lenient::Int(v)) => Some(v),
        _ => None,
    })
}

fn lenient_float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match lenient(d, Scalar::Float)? {
        Some(Lenient::Float(v)) => Some(v),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match lenient(d, Scalar::Text)? {
        Some(Lenient::Text(v)) => Some(v),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_loosely_typed_scalars() {
        let movie: Movie = serde_json::from_value(json!({
            "title": 1984,
            "year": "2012è",
            "runtime": 110.0,
            "num_mflix_comments": "4",
            "imdb": { "rating": "", "votes": 1200, "id": 123 },
            "tomatoes": { "viewer": { "rating": 3, "numReviews": 10, "meter": null } }
        }))
        .unwrap();

        assert_eq!(movie.title.as_deref(), Some("1984"));
        assert_eq!(movie.year, None);
        assert_eq!(movie.runtime, Some(110));
        assert_eq!(movie.num_mflix_comments, Some(4));

        let imdb = movie.imdb.unwrap();
        assert_eq!(imdb.rating, None);
        assert_eq!(imdb.votes, Some(1200));

        let viewer = movie.tomatoes.unwrap().viewer.unwrap();
        assert_eq!(viewer.rating, Some(3.0));
        assert_eq!(viewer.num_reviews, Some(10));
        assert_eq!(viewer.meter, None);
    }

    #[test]
    fn missing_fields_default() {
        let movie: Movie = serde_json::from_value(json!({})).unwrap();
        assert_eq!(movie, Movie::default());
    }

    #[test]
    fn rejects_wrong_shapes() {
        let err = serde_json::from_value::<Movie>(json!({ "genres": "Drama" }));
        assert!(err.is_err());

        let err = serde_json::from_value::<Movie>(json!({ "title": ["a", "b"] }));
        assert!(err.is_err());
    }

    #[test]
    fn serializes_with_public_field_names() {
        let id = ObjectId::parse_str("573a1390f29313caabcd4135").unwrap();
        let movie = Movie {
            id: Some(id),
            title: Some("Blacksmith Scene".to_string()),
            released: Some(DateTime::from_millis(-2418768000000)),
            kind: Some("movie".to_string()),
            tomatoes: Some(Tomatoes {
                last_updated: Some(DateTime::from_millis(1_442_593_149_000)),
                critic: Some(Reviews {
                    num_reviews: Some(6),
                    ..Reviews::default()
                }),
                ..Tomatoes::default()
            }),
            ..Movie::default()
        };

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["id"], "573a1390f29313caabcd4135");
        assert!(value.get("_id").is_none());
        assert_eq!(value["released"], -2418768000000_i64);
        assert_eq!(value["type"], "movie");
        assert_eq!(value["tomatoes"]["lastUpdated"], 1_442_593_149_000_i64);
        assert_eq!(value["tomatoes"]["critic"]["numReviews"], 6);
        assert_eq!(value["genres"], json!([]));
        assert!(value["plot"].is_null());
    }
}
