use crate::persistence::SnippetActiveModel;
use crate::service::error::ServiceError;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use serde::Deserialize;
use serde_json::{Map, Value};

const REQUIRED_FIELDS: [&str; 4] = ["title", "code", "language", "category"];

/// Optional closed label sets for `language` and `category`.
///
/// `None` keeps the field free-form.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogRules {
    pub(crate) languages: Option<Vec<String>>,
    pub(crate) categories: Option<Vec<String>>,
}

fn check_label(field: &str, value: &str, allowed: Option<&[String]>) -> Result<(), ServiceError> {
    match allowed {
        Some(allowed) if !allowed.iter().any(|label| label == value) => {
            Err(ServiceError::validation(format!(
                "field `{field}` must be one of: {}",
                allowed.join(", ")
            )))
        }
        _ => Ok(()),
    }
}

impl CatalogRules {
    pub(crate) fn allows(&self, draft: &SnippetDraft) -> bool {
        self.check_draft(draft).is_ok()
    }

    fn check_draft(&self, draft: &SnippetDraft) -> Result<(), ServiceError> {
        check_label("language", &draft.language, self.languages.as_deref())?;
        check_label("category", &draft.category, self.categories.as_deref())
    }
}

/// A complete, validated snippet body without an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SnippetDraft {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) code: String,
    pub(crate) language: String,
    pub(crate) category: String,
}

fn payload_as_object(payload: &Value) -> Result<&Map<String, Value>, ServiceError> {
    payload
        .as_object()
        .ok_or_else(|| ServiceError::validation("request payload must be a JSON object"))
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String, ServiceError> {
    let Some(value) = object.get(field) else {
        return Err(ServiceError::validation(format!(
            "missing required field `{field}`"
        )));
    };
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ServiceError::validation(format!(
            "field `{field}` must be a non-empty string"
        ))),
    }
}

fn optional_text(object: &Map<String, Value>, field: &str) -> Result<String, ServiceError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ServiceError::validation(format!(
            "field `{field}` must be a string or null"
        ))),
    }
}

impl SnippetDraft {
    /// Builds a draft from a create/update body. `id` and unknown keys are
    /// ignored; values are kept verbatim.
    pub(crate) fn from_payload(payload: &Value, rules: &CatalogRules) -> Result<Self, ServiceError> {
        let object = payload_as_object(payload)?;

        let [title, code, language, category] =
            REQUIRED_FIELDS.map(|field| required_text(object, field));
        let draft = Self {
            title: title?,
            description: optional_text(object, "description")?,
            code: code?,
            language: language?,
            category: category?,
        };

        rules.check_draft(&draft)?;
        Ok(draft)
    }

    pub(crate) fn into_new_active_model(self) -> SnippetActiveModel {
        SnippetActiveModel {
            id: NotSet,
            title: Set(self.title),
            description: Set(self.description),
            code: Set(self.code),
            language: Set(self.language),
            category: Set(self.category),
        }
    }

    /// Every column is overwritten so nothing from the previous version survives.
    pub(crate) fn into_replacement(self, id: i32) -> SnippetActiveModel {
        SnippetActiveModel {
            id: Unchanged(id),
            ..self.into_new_active_model()
        }
    }
}
