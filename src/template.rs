//! Mapping from Latitude API responses to host-tool templates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Model configuration keys forwarded to the host tool. Anything else in the
/// document's model config is dropped.
const KNOWN_OPTION_KEYS: &[&str] = &[
    "temperature",
    "max_tokens",
    "top_p",
    "top_k",
    "stop",
    "frequency_penalty",
    "presence_penalty",
    "seed",
];

/// A document as returned by the Latitude API.
///
/// The API spells several fields two ways depending on endpoint and version;
/// serde aliases normalize both spellings into one record with explicit
/// optionals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteDocument {
    /// Prompt body. Mandatory for template conversion.
    #[serde(default, alias = "prompt")]
    pub content: Option<String>,

    /// System prompt, when the document declares one.
    #[serde(default, alias = "system_prompt")]
    pub system: Option<String>,

    /// Model the document recommends. Absent means the host default applies.
    #[serde(default, alias = "recommended_model")]
    pub model: Option<String>,

    /// Default values for the document's declared parameters.
    #[serde(default, alias = "defaults")]
    pub parameters: Option<Map<String, Value>>,

    /// Model configuration (temperature, max tokens, ...).
    #[serde(default, alias = "options")]
    pub model_config: Option<Map<String, Value>>,

    /// Output schema for structured responses.
    #[serde(default, alias = "json_schema")]
    pub schema: Option<Value>,
}

impl RemoteDocument {
    /// Convert into the host tool's template shape.
    ///
    /// Fails with [`Error::Validation`] when the document has no prompt body.
    pub fn into_template(self, name: impl Into<String>) -> Result<Template> {
        let name = name.into();
        let prompt = match self.content {
            Some(content) if !content.is_empty() => content,
            _ => {
                return Err(Error::Validation(format!(
                    "document '{name}' has no prompt content"
                )));
            }
        };

        let system = self.system.filter(|s| !s.is_empty());
        let model = self.model.filter(|m| !m.is_empty());
        let defaults = self.parameters.unwrap_or_default();
        let options = self
            .model_config
            .map(filter_known_options)
            .unwrap_or_default();

        Ok(Template {
            name,
            prompt,
            system,
            model,
            defaults,
            options,
            schema: self.schema,
        })
    }
}

fn filter_known_options(config: Map<String, Value>) -> Map<String, Value> {
    config
        .into_iter()
        .filter(|(key, _)| KNOWN_OPTION_KEYS.contains(&key.as_str()))
        .collect()
}

/// The template handed to the host tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    /// The reference the template was loaded from.
    pub name: String,
    /// Prompt body.
    pub prompt: String,
    /// System prompt, omitted when the document declares none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Recommended model; `None` means the host default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Parameter name → default value. Empty when none are declared.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub defaults: Map<String, Value>,
    /// Known model-configuration fields.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
    /// Output schema for structured responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// One entry from a version's document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub path: String,
    #[serde(default, alias = "documentUuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> RemoteDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_document_to_template() {
        let template = doc(json!({
            "content": "Hello {{name}}, welcome!",
            "system": "You are a helpful assistant",
            "model": "gpt-4",
            "parameters": {"name": "User"},
            "model_config": {"temperature": 0.7, "internal_flag": true},
        }))
        .into_template("test-project/welcome-email")
        .unwrap();

        assert_eq!(template.name, "test-project/welcome-email");
        assert_eq!(template.prompt, "Hello {{name}}, welcome!");
        assert_eq!(template.system.as_deref(), Some("You are a helpful assistant"));
        assert_eq!(template.model.as_deref(), Some("gpt-4"));
        assert_eq!(template.defaults["name"], json!("User"));
        assert_eq!(template.options["temperature"], json!(0.7));
        // Unknown model-config keys are dropped
        assert!(!template.options.contains_key("internal_flag"));
    }

    #[test]
    fn test_aliased_field_spellings() {
        let template = doc(json!({
            "prompt": "body",
            "system_prompt": "sys",
            "recommended_model": "claude-sonnet-4-5",
            "defaults": {"tone": "formal"},
            "options": {"max_tokens": 1024},
            "json_schema": {"type": "object"},
        }))
        .into_template("aliased")
        .unwrap();

        assert_eq!(template.prompt, "body");
        assert_eq!(template.system.as_deref(), Some("sys"));
        assert_eq!(template.model.as_deref(), Some("claude-sonnet-4-5"));
        assert_eq!(template.defaults["tone"], json!("formal"));
        assert_eq!(template.options["max_tokens"], json!(1024));
        assert_eq!(template.schema, Some(json!({"type": "object"})));
    }

    #[test]
    fn test_missing_prompt_body_fails_validation() {
        let err = doc(json!({"system": "sys only"}))
            .into_template("no-body")
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("no-body"));

        let err = doc(json!({"content": ""})).into_template("empty").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_absent_optionals_become_defaults() {
        let template = doc(json!({"content": "just a prompt"}))
            .into_template("minimal")
            .unwrap();

        assert!(template.system.is_none());
        assert!(template.model.is_none());
        assert!(template.defaults.is_empty());
        assert!(template.options.is_empty());
        assert!(template.schema.is_none());

        // Empty strings are treated as absent
        let template = doc(json!({"content": "p", "system": "", "model": ""}))
            .into_template("empties")
            .unwrap();
        assert!(template.system.is_none());
        assert!(template.model.is_none());
    }

    #[test]
    fn test_unknown_response_fields_ignored() {
        let template = doc(json!({
            "content": "p",
            "documentUuid": "abc",
            "resolvedContent": "---",
            "projectId": 19228,
        }))
        .into_template("extra-fields")
        .unwrap();
        assert_eq!(template.prompt, "p");
    }

    #[test]
    fn test_document_summary_alias() {
        let summary: DocumentSummary =
            serde_json::from_value(json!({"path": "emails/welcome", "documentUuid": "abc-123"}))
                .unwrap();
        assert_eq!(summary.path, "emails/welcome");
        assert_eq!(summary.uuid.as_deref(), Some("abc-123"));
    }
}
