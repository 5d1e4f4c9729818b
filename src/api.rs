//! Client for the concept service and the records it returns.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::config::UNCATEGORIZED;
use crate::error::ApiError;

/// Identifier of a concept. The service may send ids as strings or numbers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(String);

impl ConceptId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ConceptId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ConceptId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<u64> for ConceptId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl<'de> Deserialize<'de> for ConceptId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Text(String),
			Unsigned(u64),
			Signed(i64),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Text(id) => Self(id),
			RawId::Unsigned(id) => Self(id.to_string()),
			RawId::Signed(id) => Self(id.to_string()),
		})
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A concept as listed by the service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Concept {
	pub id: ConceptId,
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default)]
	pub category: Option<String>,
}

impl Concept {
	/// Category name for display; empty or missing categories read as uncategorized.
	pub fn category_label(&self) -> &str {
		category_label(self.category.as_deref())
	}
}

/// An outgoing relation of a concept, with its target already resolved.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Relation {
	#[serde(rename = "type", default, deserialize_with = "null_as_default")]
	pub relation_type: String,
	pub target_id: ConceptId,
	#[serde(default, deserialize_with = "null_as_default")]
	pub target_name: String,
	#[serde(default)]
	pub target_category: Option<String>,
}

impl Relation {
	pub fn target_category_label(&self) -> &str {
		category_label(self.target_category.as_deref())
	}
}

/// A concept together with its relations.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConceptDetail {
	#[serde(flatten)]
	pub concept: Concept,
	#[serde(default)]
	pub relations: Vec<Relation>,
}

fn category_label(category: Option<&str>) -> &str {
	match category.map(str::trim) {
		Some(category) if !category.is_empty() => category,
		_ => UNCATEGORIZED,
	}
}

/// Parses a concept listing. The payload must be an array; entries that are
/// not valid concepts are dropped.
pub fn parse_concepts(body: &str) -> Result<Vec<Concept>, ApiError> {
	let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;
	let total = entries.len();
	let concepts: Vec<Concept> = entries
		.into_iter()
		.filter_map(|entry| match serde_json::from_value(entry) {
			Ok(concept) => Some(concept),
			Err(e) => {
				warn!("Dropping malformed concept: {}", e);
				None
			}
		})
		.collect();
	if concepts.len() != total {
		debug!("Kept {} of {} concepts", concepts.len(), total);
	}
	Ok(concepts)
}

/// Parses the category listing, skipping empty names.
pub fn parse_categories(body: &str) -> Result<Vec<String>, ApiError> {
	let categories: Vec<Option<String>> = serde_json::from_str(body)?;
	Ok(categories
		.into_iter()
		.flatten()
		.filter(|category| !category.trim().is_empty())
		.collect())
}

/// Fetches all concepts, optionally restricted to one category.
pub async fn fetch_concepts(
	api_url: &str,
	category: Option<&str>,
) -> Result<Vec<Concept>, ApiError> {
	let mut url = format!("{}/concepts", api_url);
	if let Some(category) = category.filter(|c| !c.is_empty()) {
		let encoded: String = js_sys::encode_uri_component(category).into();
		url.push_str("?category=");
		url.push_str(&encoded);
	}
	parse_concepts(&fetch_text(&url).await?)
}

/// Fetches one concept and its relations.
pub async fn fetch_concept(api_url: &str, id: &ConceptId) -> Result<ConceptDetail, ApiError> {
	let encoded: String = js_sys::encode_uri_component(id.as_str()).into();
	let body = fetch_text(&format!("{}/concept/{}", api_url, encoded)).await?;
	Ok(serde_json::from_str(&body)?)
}

/// Fetches the distinct category names.
pub async fn fetch_categories(api_url: &str) -> Result<Vec<String>, ApiError> {
	parse_categories(&fetch_text(&format!("{}/categories", api_url)).await?)
}

async fn fetch_text(url: &str) -> Result<String, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
	debug!("GET {}", url);
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(network_error)?;
	let response: Response = response.dyn_into().map_err(network_error)?;
	if !response.ok() {
		return Err(ApiError::Status(response.status()));
	}
	let body = JsFuture::from(response.text().map_err(network_error)?)
		.await
		.map_err(network_error)?;
	body.as_string()
		.ok_or_else(|| ApiError::Payload("response body is not text".into()))
}

fn network_error(value: JsValue) -> ApiError {
	ApiError::Network(
		value
			.as_string()
			.unwrap_or_else(|| format!("{:?}", value)),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_accept_strings_and_numbers() {
		let concepts = parse_concepts(
			r#"[{"id":"concept1","name":"A","description":"","category":"X"},
			    {"id":7,"name":"B","description":"d","category":null}]"#,
		)
		.unwrap();
		assert_eq!(concepts[0].id, ConceptId::from("concept1"));
		assert_eq!(concepts[1].id, ConceptId::from(7));
		assert_eq!(concepts[1].category_label(), UNCATEGORIZED);
	}

	#[test]
	fn non_array_payload_is_rejected() {
		let err = parse_concepts(r#"{"error":"boom"}"#).unwrap_err();
		assert!(matches!(err, ApiError::Payload(_)));
	}

	#[test]
	fn malformed_entries_are_dropped() {
		let concepts = parse_concepts(r#"[{"name":"no id"},{"id":"ok","name":null}]"#).unwrap();
		assert_eq!(concepts.len(), 1);
		assert_eq!(concepts[0].id.as_str(), "ok");
		assert_eq!(concepts[0].name, "");
	}

	#[test]
	fn categories_skip_empty_names() {
		let categories = parse_categories(r#"["色法", "", null, "心法"]"#).unwrap();
		assert_eq!(categories, vec!["色法".to_string(), "心法".to_string()]);
	}

	#[test]
	fn detail_carries_relations() {
		let detail: ConceptDetail = serde_json::from_str(
			r#"{
				"id": "concept1",
				"name": "五位七十五法",
				"description": "d",
				"category": "核心概念",
				"relations": [{
					"type": "包含",
					"target_id": "concept2",
					"target_name": "色法",
					"target_category": "五位"
				}]
			}"#,
		)
		.unwrap();
		assert_eq!(detail.concept.name, "五位七十五法");
		assert_eq!(detail.relations.len(), 1);
		assert_eq!(detail.relations[0].relation_type, "包含");
		assert_eq!(detail.relations[0].target_id.as_str(), "concept2");
	}
}
