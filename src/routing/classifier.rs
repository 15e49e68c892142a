//! Heuristic success classification.
//!
//! The backend bridge sometimes answers 200 with an interstitial page or
//! another non-answer, so a 2xx status alone does not stop the chain. A
//! classifier looks at the decoded payload shape instead.

use serde_json::Value;

use crate::config::ClassifierConfig;

/// Judges whether a nominally successful payload is a real answer.
pub trait SuccessClassifier: Send + Sync {
    fn is_semantically_good(&self, payload: &Value) -> bool;
}

impl<F> SuccessClassifier for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn is_semantically_good(&self, payload: &Value) -> bool {
        self(payload)
    }
}

/// Classifier driven by a configurable marker set.
///
/// A payload object is good when any of these hold:
/// - the ok field is the boolean `true`
/// - the message field equals one of the success literals
/// - any presence field exists, whatever its value
///
/// Anything that is not a JSON object is never good.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    ok_field: String,
    message_field: String,
    success_messages: Vec<String>,
    presence_fields: Vec<String>,
}

impl MarkerClassifier {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            ok_field: config.ok_field.clone(),
            message_field: config.message_field.clone(),
            success_messages: config.success_messages.clone(),
            presence_fields: config.presence_fields.clone(),
        }
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl SuccessClassifier for MarkerClassifier {
    fn is_semantically_good(&self, payload: &Value) -> bool {
        let Some(object) = payload.as_object() else {
            return false;
        };

        if object.get(&self.ok_field) == Some(&Value::Bool(true)) {
            return true;
        }

        let message = object.get(&self.message_field).and_then(Value::as_str);
        if message.is_some_and(|m| self.success_messages.iter().any(|s| s == m)) {
            return true;
        }

        self.presence_fields.iter().any(|f| object.contains_key(f))
    }
}
