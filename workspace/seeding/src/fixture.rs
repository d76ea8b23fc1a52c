//! Decoding of the JSON seed fixture.
//!
//! A fixture is a Django-style dump: an array of `{ "model": ..., "pk": ..., "fields": {...} }`
//! records in no particular order. Each record is decoded on its own into a [`SeedRecord`],
//! so a single bad payload only marks that record as malformed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const USER_MODEL: &str = "users.user";
pub const TAG_MODEL: &str = "articles.tag";
pub const ARTICLE_MODEL: &str = "articles.article";

/// Record envelope as it appears in the file. `pk` is ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    model: String,
    #[serde(default)]
    fields: Value,
}

/// `users.user` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub email: String,
    /// Plaintext; hashed before it reaches the store.
    pub password: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// `articles.tag` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSeed {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl TagSeed {
    /// Display name, falling back to the id for fixtures that only carry ids.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// `articles.article` payload. The fixture carries no author; see the seeder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArticleSeed {
    pub title: String,
    pub description: String,
    pub body: String,
    pub slug: String,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// One decoded fixture record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedRecord {
    User(UserSeed),
    Tag(TagSeed),
    Article(ArticleSeed),
    /// A known model whose `fields` do not fit its shape.
    Malformed { model: String, reason: String },
    /// A model the seeder does not handle.
    Unknown(String),
}

impl SeedRecord {
    fn decode(raw: RawRecord) -> Self {
        match raw.model.as_str() {
            USER_MODEL => decode_fields(raw, SeedRecord::User),
            TAG_MODEL => decode_fields(raw, SeedRecord::Tag),
            ARTICLE_MODEL => decode_fields(raw, SeedRecord::Article),
            _ => SeedRecord::Unknown(raw.model),
        }
    }

    /// The `model` tag this record was read from.
    pub fn model(&self) -> &str {
        match self {
            SeedRecord::User(_) => USER_MODEL,
            SeedRecord::Tag(_) => TAG_MODEL,
            SeedRecord::Article(_) => ARTICLE_MODEL,
            SeedRecord::Malformed { model, .. } => model,
            SeedRecord::Unknown(model) => model,
        }
    }
}

fn decode_fields<T: DeserializeOwned>(raw: RawRecord, wrap: fn(T) -> SeedRecord) -> SeedRecord {
    match serde_json::from_value::<T>(raw.fields) {
        Ok(seed) => wrap(seed),
        Err(e) => SeedRecord::Malformed {
            model: raw.model,
            reason: e.to_string(),
        },
    }
}

/// A parsed fixture file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixture {
    records: Vec<SeedRecord>,
}

impl Fixture {
    /// Parses a whole fixture document.
    ///
    /// A blank document, `null` and `[]` all give an empty fixture. Anything that is not
    /// an array of objects is an error; a bad `fields` payload is not.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: Option<Vec<RawRecord>> = serde_json::from_str(json)?;
        let records = raw
            .unwrap_or_default()
            .into_iter()
            .map(SeedRecord::decode)
            .collect();

        Ok(Self { records })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    /// Records tagged with `model`, including malformed ones, in file order.
    pub fn records_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a SeedRecord> + 'a {
        self.records.iter().filter(move |r| r.model() == model)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps and offset-less ISO 8601 ones, the latter read as UTC.
fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| D::Error::custom(format!("invalid datetime '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decodes_each_known_model() {
        let fixture = Fixture::parse(
            r#"[
                {"model": "users.user", "pk": 1, "fields": {"username": "jake", "email": "jake@x.io", "password": "pw", "bio": "", "image": null}},
                {"model": "articles.tag", "pk": "dragons", "fields": {"id": "dragons", "name": "dragons"}},
                {"model": "articles.article", "pk": 1, "fields": {"title": "T", "description": "D", "body": "B", "slug": "t", "created_at": "2020-01-01T00:00:00Z", "updated_at": "2020-01-02T00:00:00Z"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(fixture.len(), 3);
        match &fixture.records()[0] {
            SeedRecord::User(user) => {
                assert_eq!(user.username, "jake");
                assert_eq!(user.image, None);
            }
            other => panic!("expected user, got {other:?}"),
        }
        match &fixture.records()[1] {
            SeedRecord::Tag(tag) => assert_eq!(tag.id, "dragons"),
            other => panic!("expected tag, got {other:?}"),
        }
        match &fixture.records()[2] {
            SeedRecord::Article(article) => {
                assert_eq!(article.slug, "t");
                assert_eq!(article.updated_at, Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap());
            }
            other => panic!("expected article, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_payload_is_malformed_not_fatal() {
        let fixture = Fixture::parse(
            r#"[
                {"model": "articles.article", "fields": {"title": "T", "description": "D", "body": "B", "created_at": "2020-01-01T00:00:00Z", "updated_at": "2020-01-01T00:00:00Z"}},
                {"model": "users.user"}
            ]"#,
        )
        .unwrap();

        let models: Vec<_> = fixture
            .records()
            .iter()
            .map(|r| match r {
                SeedRecord::Malformed { model, reason } => {
                    assert!(!reason.is_empty());
                    model.as_str()
                }
                other => panic!("expected malformed, got {other:?}"),
            })
            .collect();
        assert_eq!(models, [ARTICLE_MODEL, USER_MODEL]);
    }

    #[test]
    fn test_unknown_models_are_kept_aside() {
        let fixture =
            Fixture::parse(r#"[{"model": "sessions.session", "pk": "abc", "fields": {}}]"#).unwrap();

        assert_eq!(fixture.records(), [SeedRecord::Unknown("sessions.session".to_string())]);
        assert_eq!(fixture.records_for(USER_MODEL).count(), 0);
    }

    #[test]
    fn test_empty_documents_give_empty_fixture() {
        for doc in ["", "   \n", "null", "[]"] {
            assert!(Fixture::parse(doc).unwrap().is_empty(), "document {doc:?}");
        }
    }

    #[test]
    fn test_broken_documents_are_errors() {
        for doc in ["[{\"model\": ", "{\"model\": \"users.user\"}", "[1, 2]", "\"text\""] {
            assert!(Fixture::parse(doc).is_err(), "document {doc:?}");
        }
    }

    #[test]
    fn test_null_bio_and_missing_tag_name() {
        let fixture = Fixture::parse(
            r#"[
                {"model": "users.user", "fields": {"username": "a", "email": "a@x.io", "password": "pw", "bio": null}},
                {"model": "articles.tag", "fields": {"id": "rust"}}
            ]"#,
        )
        .unwrap();

        match &fixture.records()[0] {
            SeedRecord::User(user) => assert_eq!(user.bio, ""),
            other => panic!("expected user, got {other:?}"),
        }
        match &fixture.records()[1] {
            SeedRecord::Tag(tag) => assert_eq!(tag.name(), "rust"),
            other => panic!("expected tag, got {other:?}"),
        }
    }

    #[test]
    fn test_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        for raw in [
            "2021-03-04T05:06:07Z",
            "2021-03-04T07:06:07+02:00",
            "2021-03-04T05:06:07",
            "2021-03-04 05:06:07.000",
        ] {
            let json = format!(
                r#"[{{"model": "articles.article", "fields": {{"title": "T", "description": "D", "body": "B", "slug": "s", "created_at": "{raw}", "updated_at": "{raw}"}}}}]"#
            );
            match &Fixture::parse(&json).unwrap().records()[0] {
                SeedRecord::Article(article) => assert_eq!(article.created_at, expected, "{raw}"),
                other => panic!("{raw}: expected article, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_datetime_marks_record_malformed() {
        let fixture = Fixture::parse(
            r#"[{"model": "articles.article", "fields": {"title": "T", "description": "D", "body": "B", "slug": "s", "created_at": "yesterday", "updated_at": "yesterday"}}]"#,
        )
        .unwrap();

        assert!(matches!(fixture.records()[0], SeedRecord::Malformed { .. }));
    }
}
