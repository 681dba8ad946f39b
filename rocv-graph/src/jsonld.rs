//! Minimal JSON-LD flattening for RO-Crate metadata documents
//!
//! This is not a general JSON-LD processor. It covers what RO-Crate 1.x
//! metadata files actually use: a top-level `@context` (remote RO-Crate
//! context URL, inline term map, or an array of both), a `@graph` array of
//! node objects, `@id` references, `@type`, `@value` literals, and nested
//! node objects. Remote contexts are never fetched; the RO-Crate context
//! versions are built in as term tables with `@vocab` = schema.org.

use crate::error::{GraphError, Result};
use crate::{Graph, Term};
use rocv_vocab::{dct, rdf, schema};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

/// Parsed `@context`: a vocab IRI plus explicit term mappings
#[derive(Debug, Clone)]
pub struct Context {
    /// `@vocab` IRI used to expand otherwise-unknown terms
    pub vocab: Option<String>,
    /// term -> expanded IRI
    terms: HashMap<String, String>,
}

impl Context {
    /// The built-in RO-Crate context (all published versions)
    ///
    /// RO-Crate contexts map most terms straight into schema.org; the
    /// exceptions the validator relies on are listed explicitly.
    pub fn ro_crate() -> Self {
        let mut terms = HashMap::new();
        terms.insert("conformsTo".to_string(), dct::CONFORMS_TO.to_string());
        terms.insert(
            "ComputationalWorkflow".to_string(),
            rocv_vocab::bioschemas::COMPUTATIONAL_WORKFLOW.to_string(),
        );
        terms.insert("File".to_string(), schema::MEDIA_OBJECT.to_string());
        Self {
            vocab: Some(schema::NS.to_string()),
            terms,
        }
    }

    /// An empty context (no vocab, no terms)
    pub fn empty() -> Self {
        Self {
            vocab: None,
            terms: HashMap::new(),
        }
    }

    /// True if the URL names a published RO-Crate context
    fn is_ro_crate_context_url(url: &str) -> bool {
        url.starts_with("https://w3id.org/ro/crate/") && url.ends_with("/context")
    }

    /// Parse a `@context` value, merging into the RO-Crate defaults
    pub fn parse(value: Option<&JsonValue>) -> Result<Self> {
        let mut ctx = Context::ro_crate();
        let Some(value) = value else {
            return Ok(ctx);
        };
        ctx.merge(value)?;
        Ok(ctx)
    }

    fn merge(&mut self, value: &JsonValue) -> Result<()> {
        match value {
            JsonValue::String(url) => {
                if !Self::is_ro_crate_context_url(url) {
                    // Remote contexts are not fetched; RO-Crate terms still
                    // expand through the built-in table.
                    debug!(url = %url, "unknown remote context, using built-in RO-Crate terms");
                }
                Ok(())
            }
            JsonValue::Array(items) => {
                for item in items {
                    self.merge(item)?;
                }
                Ok(())
            }
            JsonValue::Object(map) => {
                for (term, def) in map {
                    if term == "@vocab" {
                        if let Some(iri) = def.as_str() {
                            self.vocab = Some(iri.to_string());
                        }
                        continue;
                    }
                    if term.starts_with('@') {
                        continue;
                    }
                    let iri = match def {
                        JsonValue::String(iri) => Some(iri.clone()),
                        JsonValue::Object(d) => {
                            d.get("@id").and_then(|v| v.as_str()).map(str::to_string)
                        }
                        _ => None,
                    };
                    if let Some(iri) = iri {
                        self.terms.insert(term.clone(), self.expand_def(&iri));
                    }
                }
                Ok(())
            }
            JsonValue::Null => Ok(()),
            other => Err(GraphError::InvalidJsonLd {
                message: format!("unsupported @context value: {}", other),
            }),
        }
    }

    /// Expand a context definition which may itself be a compact IRI
    fn expand_def(&self, iri: &str) -> String {
        if let Some((prefix, local)) = iri.split_once(':') {
            if let Some(ns) = self.terms.get(prefix) {
                return format!("{}{}", ns, local);
            }
        }
        iri.to_string()
    }

    /// Expand a property or type term to a full IRI
    ///
    /// Returns `None` for terms that cannot be expanded (no vocab, no
    /// mapping); callers skip those properties.
    pub fn expand_term(&self, term: &str) -> Option<String> {
        if let Some(iri) = self.terms.get(term) {
            return Some(iri.clone());
        }
        if term.contains("://") {
            return Some(term.to_string());
        }
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(ns) = self.terms.get(prefix) {
                return Some(format!("{}{}", ns, local));
            }
        }
        self.vocab.as_ref().map(|v| format!("{}{}", v, term))
    }
}

/// Resolve a possibly-relative identifier against a base IRI
///
/// The base is expected to end with `/` (the crate root). Absolute IRIs and
/// blank node labels pass through unchanged.
pub fn resolve_iri(base: &str, id: &str) -> String {
    if id.starts_with("_:") {
        return id.to_string();
    }
    // Absolute IRI: has a scheme before any path separator
    if let Some(colon) = id.find(':') {
        let scheme = &id[..colon];
        if !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
            && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        {
            return id.to_string();
        }
    }
    if id == "./" || id.is_empty() {
        return base.to_string();
    }
    let rel = id.strip_prefix("./").unwrap_or(id);
    format!("{}{}", base, rel)
}

/// Flatten a JSON-LD document into a graph
///
/// `base` is the crate base IRI (must end with `/`); relative `@id`s are
/// resolved against it and it becomes the graph's base.
pub fn to_graph(doc: &JsonValue, base: &str) -> Result<Graph> {
    let root = doc.as_object().ok_or_else(|| GraphError::InvalidJsonLd {
        message: "document root must be a JSON object".to_string(),
    })?;

    let ctx = Context::parse(root.get("@context"))?;
    let mut graph = Graph::with_base(base);
    let mut blank_counter: usize = 0;

    let nodes: Vec<&JsonValue> = match root.get("@graph") {
        Some(JsonValue::Array(items)) => items.iter().collect(),
        Some(other) => {
            return Err(GraphError::InvalidJsonLd {
                message: format!("@graph must be an array, found {}", other),
            })
        }
        // A document without @graph is treated as a single node object
        None => vec![doc],
    };

    for node in nodes {
        process_node(node, &ctx, base, &mut graph, &mut blank_counter)?;
    }

    graph.dedupe();
    Ok(graph)
}

/// Emit triples for one node object, returning its subject term
fn process_node(
    node: &JsonValue,
    ctx: &Context,
    base: &str,
    graph: &mut Graph,
    blank_counter: &mut usize,
) -> Result<Term> {
    let obj = node.as_object().ok_or_else(|| GraphError::InvalidJsonLd {
        message: format!("graph node must be an object, found {}", node),
    })?;

    let subject = match obj.get("@id").and_then(|v| v.as_str()) {
        Some(id) if id.starts_with("_:") => Term::blank(id.trim_start_matches("_:")),
        Some(id) => Term::iri(resolve_iri(base, id)),
        None => {
            *blank_counter += 1;
            Term::blank(format!("n{}", blank_counter))
        }
    };

    for (key, value) in obj {
        match key.as_str() {
            "@context" | "@id" => continue,
            "@type" => {
                for ty in iter_values(value) {
                    if let Some(name) = ty.as_str() {
                        if let Some(iri) = ctx.expand_term(name) {
                            graph.add_triple(subject.clone(), Term::iri(rdf::TYPE), Term::iri(iri));
                        }
                    }
                }
            }
            key if key.starts_with('@') => {
                // Other JSON-LD keywords (@reverse, @included, ...) are out
                // of scope for RO-Crate metadata.
                debug!(keyword = key, "skipping unsupported JSON-LD keyword");
            }
            key => {
                let Some(predicate) = ctx.expand_term(key) else {
                    debug!(term = key, "term does not expand, skipping property");
                    continue;
                };
                for v in iter_values(value) {
                    let object = value_to_term(v, ctx, base, graph, blank_counter)?;
                    graph.add_triple(subject.clone(), Term::iri(&predicate), object);
                }
            }
        }
    }

    Ok(subject)
}

/// Treat a JSON value as a list of values (JSON-LD arrays are multi-valued)
fn iter_values(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Convert a JSON-LD value into an object term
fn value_to_term(
    value: &JsonValue,
    ctx: &Context,
    base: &str,
    graph: &mut Graph,
    blank_counter: &mut usize,
) -> Result<Term> {
    match value {
        JsonValue::String(s) => Ok(Term::string(s)),
        JsonValue::Bool(b) => Ok(Term::boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Term::integer(i))
            } else {
                Ok(Term::double(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::Object(map) => {
            if let Some(v) = map.get("@value") {
                let literal = match v {
                    JsonValue::String(s) => {
                        if let Some(lang) = map.get("@language").and_then(|l| l.as_str()) {
                            Term::lang_string(s, lang)
                        } else if let Some(dt) = map.get("@type").and_then(|t| t.as_str()) {
                            let dt_iri =
                                ctx.expand_term(dt).unwrap_or_else(|| dt.to_string());
                            Term::typed(s, dt_iri)
                        } else {
                            Term::string(s)
                        }
                    }
                    JsonValue::Bool(b) => Term::boolean(*b),
                    JsonValue::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            Term::integer(i)
                        } else {
                            Term::double(n.as_f64().unwrap_or(f64::NAN))
                        }
                    }
                    other => {
                        return Err(GraphError::InvalidJsonLd {
                            message: format!("unsupported @value: {}", other),
                        })
                    }
                };
                return Ok(literal);
            }
            // Pure reference: {"@id": "..."} with no other keys
            if map.len() == 1 {
                if let Some(id) = map.get("@id").and_then(|v| v.as_str()) {
                    return Ok(if id.starts_with("_:") {
                        Term::blank(id.trim_start_matches("_:"))
                    } else {
                        Term::iri(resolve_iri(base, id))
                    });
                }
            }
            // Nested node object: emit its triples and reference its subject
            process_node(value, ctx, base, graph, blank_counter)
        }
        JsonValue::Null => Err(GraphError::InvalidJsonLd {
            message: "null is not a valid property value".to_string(),
        }),
        JsonValue::Array(_) => Err(GraphError::InvalidJsonLd {
            message: "nested arrays are not valid property values".to_string(),
        }),
    }
}
