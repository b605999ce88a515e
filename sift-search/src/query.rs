//! Query DSL.

use crate::error::{Result, SearchError};
use serde_json::{Map, Value, json};

/// Query expression tree.
///
/// Build with the constructors on [`Query`] or the per-variant structs, and
/// call [`Query::validate`] (done automatically by the client) before sending.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Query {
    /// Match all documents.
    #[default]
    MatchAll,
    /// Full-text match query.
    Match(MatchQuery),
    /// Term query for exact matches.
    Term(TermQuery),
    /// Terms query for multiple exact matches.
    Terms(TermsQuery),
    /// Range query.
    Range(RangeQuery),
    /// Documents that have a value for a field.
    Exists(ExistsQuery),
    /// Query over nested documents.
    Nested(NestedQuery),
    /// Bool query for combining queries.
    Bool(BoolQuery),
}

impl Query {
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    /// Full-text `match` on one field.
    pub fn matches(field: impl Into<String>, query: impl Into<String>) -> Self {
        Query::Match(MatchQuery::new(field, query))
    }

    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term(TermQuery::new(field, value))
    }

    pub fn terms<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Query::Terms(TermsQuery::new(
            field,
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists(ExistsQuery::new(field))
    }

    pub fn nested(path: impl Into<String>, query: Query) -> Self {
        Query::Nested(NestedQuery::new(path, query))
    }

    /// Convert query to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match(m) => m.to_json(),
            Query::Term(t) => t.to_json(),
            Query::Terms(t) => t.to_json(),
            Query::Range(r) => r.to_json(),
            Query::Exists(e) => e.to_json(),
            Query::Nested(n) => n.to_json(),
            Query::Bool(b) => b.to_json(),
        }
    }

    /// Check the tree for shapes the service would reject.
    pub fn validate(&self) -> Result<()> {
        match self {
            Query::MatchAll => Ok(()),
            Query::Match(m) => require_field("match", &m.field),
            Query::Term(t) => require_field("term", &t.field),
            Query::Terms(t) => {
                require_field("terms", &t.field)?;
                if t.values.is_empty() {
                    return Err(SearchError::validation(format!(
                        "terms query on {:?} needs at least one value",
                        t.field
                    )));
                }
                Ok(())
            }
            Query::Range(r) => {
                require_field("range", &r.field)?;
                if r.gt.is_none() && r.gte.is_none() && r.lt.is_none() && r.lte.is_none() {
                    return Err(SearchError::validation(format!(
                        "range query on {:?} needs at least one bound",
                        r.field
                    )));
                }
                Ok(())
            }
            Query::Exists(e) => require_field("exists", &e.field),
            Query::Nested(n) => {
                if n.path.trim().is_empty() {
                    return Err(SearchError::validation("nested query needs a path"));
                }
                n.query.validate()
            }
            Query::Bool(b) => b
                .must
                .iter()
                .chain(&b.should)
                .chain(&b.must_not)
                .chain(&b.filter)
                .try_for_each(Query::validate),
        }
    }
}

fn require_field(kind: &str, field: &str) -> Result<()> {
    if field.trim().is_empty() {
        return Err(SearchError::validation(format!("{} query needs a field name", kind)));
    }
    Ok(())
}

/// Match query for full-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    /// Field to search.
    pub field: String,
    /// Search text.
    pub query: String,
    /// `and` / `or`.
    pub operator: Option<String>,
    /// Fuzziness for typo tolerance, e.g. `AUTO`.
    pub fuzziness: Option<String>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
            operator: None,
            fuzziness: None,
        }
    }

    /// Set the operator.
    pub fn operator(mut self, op: impl Into<String>) -> Self {
        self.operator = Some(op.into());
        self
    }

    /// Set fuzziness.
    pub fn fuzziness(mut self, fuzz: impl Into<String>) -> Self {
        self.fuzziness = Some(fuzz.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut query = json!({ "query": self.query });

        if let Some(op) = &self.operator {
            query["operator"] = json!(op);
        }
        if let Some(fuzz) = &self.fuzziness {
            query["fuzziness"] = json!(fuzz);
        }

        json!({ "match": { &self.field: query } })
    }
}

impl From<MatchQuery> for Query {
    fn from(query: MatchQuery) -> Self {
        Query::Match(query)
    }
}

/// Term query for exact matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: String,
    pub value: Value,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "term": { &self.field: self.value } })
    }
}

/// Terms query for matching any of several values.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    pub field: String,
    pub values: Vec<Value>,
}

impl TermsQuery {
    pub fn new(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    fn to_json(&self) -> Value {
        json!({ "terms": { &self.field: self.values } })
    }
}

/// Range query for numeric/date ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    /// Field name.
    pub field: String,
    /// Greater than.
    pub gt: Option<Value>,
    /// Greater than or equal.
    pub gte: Option<Value>,
    /// Less than.
    pub lt: Option<Value>,
    /// Less than or equal.
    pub lte: Option<Value>,
    /// Date format (for date fields).
    pub format: Option<String>,
}

impl RangeQuery {
    /// Create a new range query.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            format: None,
        }
    }

    /// Set greater than.
    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    /// Set greater than or equal.
    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    /// Set less than.
    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }

    /// Set less than or equal.
    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    /// Set date format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut range = Map::new();

        let bounds = [("gt", &self.gt), ("gte", &self.gte), ("lt", &self.lt), ("lte", &self.lte)];
        for (name, bound) in bounds {
            if let Some(v) = bound {
                range.insert(name.to_string(), v.clone());
            }
        }
        if let Some(v) = &self.format {
            range.insert("format".to_string(), json!(v));
        }

        json!({ "range": { &self.field: range } })
    }
}

impl From<RangeQuery> for Query {
    fn from(query: RangeQuery) -> Self {
        Query::Range(query)
    }
}

/// Exists query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsQuery {
    pub field: String,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }

    fn to_json(&self) -> Value {
        json!({ "exists": { "field": self.field } })
    }
}

/// Query over the nested documents under `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedQuery {
    pub path: String,
    pub query: Box<Query>,
    /// `avg`, `max`, `min`, `sum` or `none`.
    pub score_mode: Option<String>,
}

impl NestedQuery {
    pub fn new(path: impl Into<String>, query: Query) -> Self {
        Self {
            path: path.into(),
            query: Box::new(query),
            score_mode: None,
        }
    }

    pub fn score_mode(mut self, mode: impl Into<String>) -> Self {
        self.score_mode = Some(mode.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut nested = json!({
            "path": self.path,
            "query": self.query.to_json(),
        });
        if let Some(mode) = &self.score_mode {
            nested["score_mode"] = json!(mode);
        }
        json!({ "nested": nested })
    }
}

/// Bool query for combining multiple queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    /// Must match (AND).
    pub must: Vec<Query>,
    /// Should match (OR).
    pub should: Vec<Query>,
    /// Must not match (NOT).
    pub must_not: Vec<Query>,
    /// Filter (non-scoring).
    pub filter: Vec<Query>,
    /// Minimum should match.
    pub minimum_should_match: Option<i32>,
}

impl BoolQuery {
    /// Create a new bool query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a must clause.
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    /// Add a should clause.
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    /// Add a must_not clause.
    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    /// Add a filter clause.
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    /// Set minimum should match.
    pub fn minimum_should_match(mut self, min: i32) -> Self {
        self.minimum_should_match = Some(min);
        self
    }

    /// True when no clause has been added.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty() && self.filter.is_empty()
    }

    fn to_json(&self) -> Value {
        let mut bool_query = Map::new();

        let clauses = [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ];
        for (name, queries) in clauses {
            if !queries.is_empty() {
                bool_query.insert(
                    name.to_string(),
                    Value::Array(queries.iter().map(Query::to_json).collect()),
                );
            }
        }
        if let Some(min) = self.minimum_should_match {
            bool_query.insert("minimum_should_match".to_string(), json!(min));
        }

        json!({ "bool": bool_query })
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}
