//! Figma REST clients.
//!
//! `pull` fetches a raw file document; `upload` pushes a resolved table into
//! Figma variables. The upload payload is planned by a pure function so it
//! can be inspected (`--dry-run`) and tested without a network.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tessera_core::ast::value_to_text;
use tessera_core::color::parse_hex_color;
use tessera_core::pass4_transform::numeric;
use tessera_core::{Category, Token, TokenTable, TokenType};

pub const API_BASE: &str = "https://api.figma.com/v1";

// ── Client ────────────────────────────────────────────────────────────────────

pub struct FigmaClient {
    base_url: String,
    token: String,
}

impl FigmaClient {
    pub fn new(token: &str) -> Self {
        FigmaClient {
            base_url: API_BASE.to_string(),
            token: token.to_string(),
        }
    }

    /// GET `/files/{key}`: the whole document tree.
    pub fn fetch_file(&self, file_key: &str) -> Result<Value, String> {
        let url = format!("{}/files/{}", self.base_url, file_key);
        let agent = ureq::Agent::new_with_defaults();
        let response = agent
            .get(&url)
            .header("X-Figma-Token", self.token.as_str())
            .call()
            .map_err(|e| classify_http_error(e, "fetch file"))?;
        response
            .into_body()
            .read_json::<Value>()
            .map_err(|e| format!("could not parse file response: {}", e))
    }

    /// GET `/files/{key}/variables/local`. A 404 means the file has no
    /// variables yet.
    pub fn local_variables(&self, file_key: &str) -> Result<LocalVariables, String> {
        let url = format!("{}/files/{}/variables/local", self.base_url, file_key);
        let agent = ureq::Agent::new_with_defaults();
        let response = match agent
            .get(&url)
            .header("X-Figma-Token", self.token.as_str())
            .call()
        {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(404)) => return Ok(LocalVariables::default()),
            Err(e) => return Err(classify_http_error(e, "fetch variables")),
        };
        response
            .into_body()
            .read_json::<LocalVariables>()
            .map_err(|e| format!("could not parse variables response: {}", e))
    }

    /// POST `/files/{key}/variables` with a planned change set.
    pub fn post_variables(&self, file_key: &str, plan: &UploadPlan) -> Result<(), String> {
        let url = format!("{}/files/{}/variables", self.base_url, file_key);
        let agent = ureq::Agent::new_with_defaults();
        agent
            .post(&url)
            .header("X-Figma-Token", self.token.as_str())
            .header("Content-Type", "application/json")
            .send_json(plan)
            .map_err(|e| classify_http_error(e, "upload variables"))?;
        Ok(())
    }
}

fn classify_http_error(err: ureq::Error, operation: &str) -> String {
    match err {
        ureq::Error::StatusCode(401) | ureq::Error::StatusCode(403) => {
            format!("figma {operation} failed: access denied, check FIGMA_TOKEN")
        }
        ureq::Error::StatusCode(404) => format!("figma {operation} failed: file not found"),
        ureq::Error::StatusCode(status) => format!("figma {operation} failed: HTTP {status}"),
        other => format!("figma {operation} failed: {other}"),
    }
}

// ── Remote state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalVariables {
    #[serde(default)]
    pub meta: LocalMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMeta {
    #[serde(default)]
    pub variables: BTreeMap<String, RemoteVariable>,
    #[serde(default)]
    pub variable_collections: BTreeMap<String, RemoteCollection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVariable {
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCollection {
    pub id: String,
    pub name: String,
    pub default_mode_id: String,
}

// ── Upload plan ───────────────────────────────────────────────────────────────

/// Body of `POST /files/{key}/variables`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPlan {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variable_collections: Vec<CollectionChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableChange>,
    pub variable_mode_values: Vec<ModeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionChange {
    pub action: &'static str,
    pub id: String,
    pub name: String,
    pub initial_mode_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableChange {
    pub action: &'static str,
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeValue {
    pub variable_id: String,
    pub mode_id: String,
    pub value: Value,
}

impl UploadPlan {
    pub fn is_empty(&self) -> bool {
        self.variable_mode_values.is_empty()
    }
}

/// Collection a token's source layer maps to.
pub fn collection_name(category: Category) -> &'static str {
    match category {
        Category::Primitive => "Primitives",
        Category::Semantic => "Semantic",
        Category::Component => "Component",
    }
}

/// Figma variable type and value for one token.
pub fn variable_value(token: &Token) -> (&'static str, Value) {
    if let Value::Bool(b) = token.value {
        return ("BOOLEAN", Value::Bool(b));
    }
    if token.token_type == TokenType::Color {
        if let Some(c) = token.value.as_str().and_then(parse_hex_color) {
            return ("COLOR", json!({ "r": c.r, "g": c.g, "b": c.b, "a": c.a }));
        }
    }
    let textual = matches!(token.token_type, TokenType::String | TokenType::FontFamily);
    match numeric(&token.value) {
        Some(n) if !textual => ("FLOAT", json!(n)),
        _ => ("STRING", Value::String(value_to_text(&token.value))),
    }
}

/// Plan the change set that brings `remote` in line with `table`: missing
/// collections and variables are created; every token gets a value in its
/// collection's default mode.
pub fn plan_upload(table: &TokenTable, remote: &LocalVariables) -> UploadPlan {
    let mut plan = UploadPlan::default();
    // collection name -> (collection id, mode id)
    let mut collections: BTreeMap<String, (String, String)> = remote
        .meta
        .variable_collections
        .values()
        .map(|c| (c.name.clone(), (c.id.clone(), c.default_mode_id.clone())))
        .collect();

    for token in table.iter() {
        let name = collection_name(token.category);
        let (collection_id, mode_id) = collections
            .entry(name.to_string())
            .or_insert_with(|| {
                let slug = name.to_lowercase();
                let ids = (format!("tmp:collection:{slug}"), format!("tmp:mode:{slug}"));
                plan.variable_collections.push(CollectionChange {
                    action: "CREATE",
                    id: ids.0.clone(),
                    name: name.to_string(),
                    initial_mode_id: ids.1.clone(),
                });
                ids
            })
            .clone();

        let variable_name = token.path.join("/");
        let (resolved_type, value) = variable_value(token);
        let existing = remote
            .meta
            .variables
            .values()
            .find(|v| v.name == variable_name && v.variable_collection_id == collection_id);
        let variable_id = match existing {
            Some(v) => v.id.clone(),
            None => {
                let id = format!("tmp:variable:{}", plan.variables.len());
                plan.variables.push(VariableChange {
                    action: "CREATE",
                    id: id.clone(),
                    name: variable_name,
                    variable_collection_id: collection_id,
                    resolved_type,
                });
                id
            }
        };
        plan.variable_mode_values.push(ModeValue {
            variable_id,
            mode_id,
            value,
        });
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(path: &[&str], ty: TokenType, value: Value, category: Category) -> Token {
        let mut t = Token::new(path, ty, value);
        t.category = category;
        t
    }

    fn table() -> TokenTable {
        vec![
            token(&["color", "white"], TokenType::Color, json!("#ffffff"), Category::Primitive),
            token(&["space", "m"], TokenType::Spacing, json!(16), Category::Primitive),
            token(&["bg"], TokenType::Color, json!("#ffffff"), Category::Semantic),
            token(&["font"], TokenType::FontFamily, json!("Inter"), Category::Semantic),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn fresh_file_creates_collections_per_category() {
        let plan = plan_upload(&table(), &LocalVariables::default());
        let names: Vec<&str> = plan.variable_collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Primitives", "Semantic"]);
        assert_eq!(plan.variables.len(), 4);
        assert_eq!(plan.variables[0].name, "color/white");
        assert_eq!(plan.variables[0].variable_collection_id, "tmp:collection:primitives");
        assert_eq!(plan.variable_mode_values[2].mode_id, "tmp:mode:semantic");
    }

    #[test]
    fn types_map_to_figma_kinds() {
        let plan = plan_upload(&table(), &LocalVariables::default());
        let kinds: Vec<&str> = plan.variables.iter().map(|v| v.resolved_type).collect();
        assert_eq!(kinds, vec!["COLOR", "FLOAT", "COLOR", "STRING"]);
        assert_eq!(
            plan.variable_mode_values[0].value,
            json!({ "r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0 })
        );
        assert_eq!(plan.variable_mode_values[1].value, json!(16.0));
    }

    #[test]
    fn existing_collections_and_variables_are_reused() {
        let remote: LocalVariables = serde_json::from_value(json!({
            "status": 200,
            "meta": {
                "variableCollections": {
                    "VC:1": { "id": "VC:1", "name": "Primitives", "defaultModeId": "1:0", "modes": [] }
                },
                "variables": {
                    "V:9": { "id": "V:9", "name": "space/m", "variableCollectionId": "VC:1", "resolvedType": "FLOAT" }
                }
            }
        }))
        .unwrap();
        let plan = plan_upload(&table(), &remote);
        let created: Vec<&str> = plan.variable_collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(created, vec!["Semantic"]);
        assert_eq!(plan.variables.len(), 3);
        let space = &plan.variable_mode_values[1];
        assert_eq!((space.variable_id.as_str(), space.mode_id.as_str()), ("V:9", "1:0"));
    }

    #[test]
    fn payload_uses_figma_field_names() {
        let plan = plan_upload(&table(), &LocalVariables::default());
        let body = serde_json::to_value(&plan).unwrap();
        assert_eq!(body["variableCollections"][0]["action"], "CREATE");
        assert_eq!(body["variableCollections"][0]["initialModeId"], "tmp:mode:primitives");
        assert_eq!(body["variables"][0]["resolvedType"], "COLOR");
        assert_eq!(body["variableModeValues"][0]["variableId"], "tmp:variable:0");
    }
}
