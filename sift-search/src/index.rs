//! Index lifecycle: definitions, mappings and the operations that manage them.

use crate::{
    client::SearchClient,
    error::{Result, SearchError},
    response::RawResponse,
};
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetMappingParts,
    IndicesRefreshParts,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sift_log::{debug, info};
use std::collections::BTreeMap;

const MAX_INDEX_NAME_BYTES: usize = 255;

/// Check an index name against the service's naming rules before sending.
pub fn validate_index_name(name: &str) -> Result<()> {
    let invalid = |why: &str| -> Result<()> {
        Err(SearchError::validation(format!("invalid index name {:?}: {}", name, why)))
    };

    if name.is_empty() {
        return invalid("must not be empty");
    }
    if name == "." || name == ".." {
        return invalid("must not be '.' or '..'");
    }
    if name.starts_with(['-', '_', '+']) {
        return invalid("must not start with '-', '_' or '+'");
    }
    if name.len() > MAX_INDEX_NAME_BYTES {
        return invalid("longer than 255 bytes");
    }
    if name.chars().any(|c| c.is_uppercase()) {
        return invalid("must be lowercase");
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '\\' | '/' | '*' | '?' | '"' | '<' | '>' | '|' | ',' | '#' | ' ' | ':'))
    {
        return invalid(&format!("contains {:?}", c));
    }
    Ok(())
}

/// What [`SearchClient::create_index`] does when the index already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingIndex {
    /// Surface the service's conflict.
    Fail,
    /// Leave the existing index alone.
    Skip,
    /// Delete it and create it again.
    Recreate,
}

/// Outcome of [`SearchClient::create_index`].
#[derive(Debug, Clone, PartialEq)]
pub enum IndexCreation {
    Created(Acknowledged),
    AlreadyExists,
}

impl IndexCreation {
    pub fn created(&self) -> bool {
        matches!(self, IndexCreation::Created(_))
    }
}

/// Acknowledgement returned by index create/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards_acknowledged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Name, settings and mapping of an index to create.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub settings: Option<IndexSettings>,
    pub mapping: Option<Mapping>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
            mapping: None,
        }
    }

    pub fn settings(mut self, settings: IndexSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_index_name(&self.name)?;
        if let Some(settings) = &self.settings {
            settings.validate()?;
        }
        if let Some(mapping) = &self.mapping {
            mapping.validate()?;
        }
        Ok(())
    }

    /// Body of `PUT /{index}`.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();

        if let Some(settings) = self.settings.as_ref().map(IndexSettings::to_json) {
            if settings.as_object().is_some_and(|s| !s.is_empty()) {
                body.insert("settings".to_string(), settings);
            }
        }
        if let Some(mapping) = &self.mapping {
            body.insert("mappings".to_string(), mapping.to_json());
        }

        Value::Object(body)
    }
}

/// Index settings for creating indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSettings {
    /// Number of primary shards, at least 1.
    pub number_of_shards: Option<u32>,
    pub number_of_replicas: Option<u32>,
    /// E.g. `"1s"`, or `"-1"` to disable periodic refresh.
    pub refresh_interval: Option<String>,
}

impl IndexSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    pub fn replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    pub fn refresh_interval(mut self, interval: impl Into<String>) -> Self {
        self.refresh_interval = Some(interval.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_shards == Some(0) {
            return Err(SearchError::validation("number_of_shards must be at least 1"));
        }
        if self.refresh_interval.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(SearchError::validation("refresh_interval must not be empty"));
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        let mut settings = Map::new();

        if let Some(shards) = self.number_of_shards {
            settings.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            settings.insert("number_of_replicas".to_string(), json!(replicas));
        }
        if let Some(interval) = &self.refresh_interval {
            settings.insert("refresh_interval".to_string(), json!(interval));
        }

        Value::Object(settings)
    }
}

/// Field mapping configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    pub properties: BTreeMap<String, FieldMapping>,
    /// `true`, `false`, `strict` or `runtime`.
    pub dynamic: Option<String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field: FieldMapping) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    pub fn dynamic(mut self, dynamic: impl Into<String>) -> Self {
        self.dynamic = Some(dynamic.into());
        self
    }

    /// Declared kind of a top-level field.
    pub fn kind_of(&self, field: &str) -> Option<&FieldKind> {
        self.properties.get(field).map(|f| &f.kind)
    }

    pub fn validate(&self) -> Result<()> {
        validate_properties(&self.properties)
    }

    pub fn to_json(&self) -> Value {
        let mut mapping = Map::new();

        if let Some(dynamic) = &self.dynamic {
            mapping.insert("dynamic".to_string(), json!(dynamic));
        }
        mapping.insert("properties".to_string(), properties_to_json(&self.properties));

        Value::Object(mapping)
    }

    /// Parse the `mappings` object the service returns.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SearchError::validation("mapping must be a JSON object"))?;

        let dynamic = object.get("dynamic").map(|d| match d {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        let properties = match object.get("properties") {
            Some(props) => properties_from_json(props)?,
            None => BTreeMap::new(),
        };

        Ok(Self { properties, dynamic })
    }
}

/// Definition of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub kind: FieldKind,
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    /// Date format, e.g. `yyyy-MM-dd`.
    pub format: Option<String>,
    /// Sub-fields of `object` and `nested` fields.
    pub properties: Option<BTreeMap<String, FieldMapping>>,
}

macro_rules! field_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name() -> Self {
                Self::of(FieldKind::$kind)
            }
        )*
    };
}

impl FieldMapping {
    pub fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            analyzer: None,
            search_analyzer: None,
            format: None,
            properties: None,
        }
    }

    field_constructors! {
        text => Text,
        keyword => Keyword,
        long => Long,
        integer => Integer,
        float => Float,
        double => Double,
        boolean => Boolean,
        date => Date,
        completion => Completion,
        geo_point => GeoPoint,
        geo_shape => GeoShape,
        point => Point,
        object => Object,
        nested => Nested,
        flattened => Flattened,
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a sub-field; only meaningful on `object` and `nested` fields.
    pub fn property(mut self, name: impl Into<String>, field: FieldMapping) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), field);
        self
    }

    fn to_json(&self) -> Value {
        let mut field = Map::new();

        // object fields with sub-properties are implied by the service
        if self.kind != FieldKind::Object || self.properties.is_none() {
            field.insert("type".to_string(), json!(self.kind.as_str()));
        }
        if let Some(analyzer) = &self.analyzer {
            field.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(search_analyzer) = &self.search_analyzer {
            field.insert("search_analyzer".to_string(), json!(search_analyzer));
        }
        if let Some(format) = &self.format {
            field.insert("format".to_string(), json!(format));
        }
        if let Some(properties) = &self.properties {
            field.insert("properties".to_string(), properties_to_json(properties));
        }

        Value::Object(field)
    }

    fn from_json(name: &str, value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            SearchError::validation(format!("mapping of field {:?} must be an object", name))
        })?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        let properties = match object.get("properties") {
            Some(props) => Some(properties_from_json(props)?),
            None => None,
        };

        let kind = match object.get("type").and_then(Value::as_str) {
            Some(name) => FieldKind::from_name(name),
            None if properties.is_some() => FieldKind::Object,
            None => {
                return Err(SearchError::validation(format!(
                    "field {:?} has neither a type nor properties",
                    name
                )));
            }
        };

        Ok(Self {
            kind,
            analyzer: text("analyzer"),
            search_analyzer: text("search_analyzer"),
            format: text("format"),
            properties,
        })
    }
}

fn properties_to_json(properties: &BTreeMap<String, FieldMapping>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, field)| (name.clone(), field.to_json()))
            .collect(),
    )
}

fn properties_from_json(value: &Value) -> Result<BTreeMap<String, FieldMapping>> {
    let object = value
        .as_object()
        .ok_or_else(|| SearchError::validation("properties must be a JSON object"))?;

    object
        .iter()
        .map(|(name, field)| Ok((name.clone(), FieldMapping::from_json(name, field)?)))
        .collect()
}

fn validate_properties(properties: &BTreeMap<String, FieldMapping>) -> Result<()> {
    for (name, field) in properties {
        if name.trim().is_empty() {
            return Err(SearchError::validation("field names must not be empty"));
        }
        if let Some(children) = &field.properties {
            if !matches!(field.kind, FieldKind::Object | FieldKind::Nested) {
                return Err(SearchError::validation(format!(
                    "field {:?} of type {} cannot have properties",
                    name,
                    field.kind.as_str()
                )));
            }
            validate_properties(children)?;
        }
    }
    Ok(())
}

/// Field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Full-text searchable field.
    Text,
    /// Exact match keyword field.
    Keyword,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    Date,
    Binary,
    Ip,
    /// Completion suggester.
    Completion,
    GeoPoint,
    GeoShape,
    /// Cartesian point.
    Point,
    Object,
    Nested,
    /// Whole object indexed as keywords.
    Flattened,
    SearchAsYouType,
    /// A kind reported by the service that this client has no variant for.
    Other(String),
}

impl FieldKind {
    /// Name used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Keyword => "keyword",
            FieldKind::Long => "long",
            FieldKind::Integer => "integer",
            FieldKind::Short => "short",
            FieldKind::Byte => "byte",
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Binary => "binary",
            FieldKind::Ip => "ip",
            FieldKind::Completion => "completion",
            FieldKind::GeoPoint => "geo_point",
            FieldKind::GeoShape => "geo_shape",
            FieldKind::Point => "point",
            FieldKind::Object => "object",
            FieldKind::Nested => "nested",
            FieldKind::Flattened => "flattened",
            FieldKind::SearchAsYouType => "search_as_you_type",
            FieldKind::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => FieldKind::Text,
            "keyword" => FieldKind::Keyword,
            "long" => FieldKind::Long,
            "integer" => FieldKind::Integer,
            "short" => FieldKind::Short,
            "byte" => FieldKind::Byte,
            "double" => FieldKind::Double,
            "float" => FieldKind::Float,
            "boolean" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "binary" => FieldKind::Binary,
            "ip" => FieldKind::Ip,
            "completion" => FieldKind::Completion,
            "geo_point" => FieldKind::GeoPoint,
            "geo_shape" => FieldKind::GeoShape,
            "point" => FieldKind::Point,
            "object" => FieldKind::Object,
            "nested" => FieldKind::Nested,
            "flattened" => FieldKind::Flattened,
            "search_as_you_type" => FieldKind::SearchAsYouType,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SearchClient {
    /// Create an index; `on_existing` decides what happens if it is already there.
    pub async fn create_index(
        &self,
        definition: &IndexDefinition,
        on_existing: ExistingIndex,
    ) -> Result<IndexCreation> {
        definition.validate()?;
        let name = definition.name.as_str();

        match on_existing {
            ExistingIndex::Fail => {}
            ExistingIndex::Skip => {
                if self.index_exists(name).await? {
                    info!("Index {} already exists, leaving it in place", name);
                    return Ok(IndexCreation::AlreadyExists);
                }
            }
            ExistingIndex::Recreate => {
                self.delete_index(name, true).await?;
            }
        }

        info!("Creating index: {}", name);
        let body = definition.to_json();

        let ack: Acknowledged = self
            .round_trip(async {
                let response = self
                    .inner()
                    .indices()
                    .create(IndicesCreateParts::Index(name))
                    .body(body)
                    .send()
                    .await?;
                RawResponse::read(response).await?.into_result()
            })
            .await?;

        Ok(IndexCreation::Created(ack))
    }

    /// Delete an index. With `ignore_missing`, a missing index is not an error
    /// and yields an unacknowledged result.
    pub async fn delete_index(&self, name: &str, ignore_missing: bool) -> Result<Acknowledged> {
        validate_index_name(name)?;
        info!("Deleting index: {}", name);

        let raw = self
            .round_trip(async {
                let response = self
                    .inner()
                    .indices()
                    .delete(IndicesDeleteParts::Index(&[name]))
                    .ignore_unavailable(ignore_missing)
                    .send()
                    .await?;
                RawResponse::read(response).await
            })
            .await?;

        if raw.status == 404 && ignore_missing {
            debug!("Index {} did not exist", name);
            return Ok(Acknowledged {
                acknowledged: false,
                shards_acknowledged: None,
                index: Some(name.to_string()),
            });
        }

        raw.into_result()
    }

    /// Check if an index exists.
    pub async fn index_exists(&self, name: &str) -> Result<bool> {
        validate_index_name(name)?;
        debug!("Checking if index exists: {}", name);

        let raw = self
            .round_trip(async {
                let response = self
                    .inner()
                    .indices()
                    .exists(IndicesExistsParts::Index(&[name]))
                    .send()
                    .await?;
                RawResponse::read(response).await
            })
            .await?;

        exists_from_status(raw)
    }

    /// Fetch the mapping of an index.
    pub async fn get_mapping(&self, name: &str) -> Result<Mapping> {
        validate_index_name(name)?;
        debug!("Getting mapping for index: {}", name);

        let body: Value = self
            .round_trip(async {
                let response = self
                    .inner()
                    .indices()
                    .get_mapping(IndicesGetMappingParts::Index(&[name]))
                    .send()
                    .await?;
                RawResponse::read(response).await?.into_result()
            })
            .await?;

        // keyed by the concrete index name, which differs from `name` for aliases
        let mappings = body
            .get(name)
            .or_else(|| body.as_object().and_then(|o| o.values().next()))
            .and_then(|index| index.get("mappings"))
            .ok_or_else(|| SearchError::Service {
                status: 200,
                error_type: "missing_mappings".to_string(),
                reason: format!("no mappings returned for index {}", name),
            })?;

        Mapping::from_json(mappings)
    }

    /// Refresh an index to make recent changes searchable.
    pub async fn refresh_index(&self, name: &str) -> Result<()> {
        validate_index_name(name)?;
        debug!("Refreshing index: {}", name);

        self.round_trip(async {
            let response = self
                .inner()
                .indices()
                .refresh(IndicesRefreshParts::Index(&[name]))
                .send()
                .await?;
            let raw = RawResponse::read(response).await?;
            if raw.is_success() {
                Ok(())
            } else {
                Err(raw.into_error())
            }
        })
        .await
    }
}

/// 200 means present, 404 absent; anything else is a failure.
pub(crate) fn exists_from_status(raw: RawResponse) -> Result<bool> {
    match raw.status {
        200..=299 => Ok(true),
        404 => Ok(false),
        status => Err(SearchError::Service {
            status,
            error_type: "unexpected_status".to_string(),
            reason: format!("existence check answered HTTP {}", status),
        }),
    }
}
