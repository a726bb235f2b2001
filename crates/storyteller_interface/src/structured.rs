//! Typed structured completions on top of [`CompletionClient`].

use crate::CompletionClient;
use schemars::r#gen::SchemaSettings;
use serde_json::Value;
use storyteller_core::StructuredOutput;
use storyteller_error::{CompletionError, CompletionErrorKind, StorytellerResult};

/// Build the strict JSON schema sent upstream for `T`.
///
/// Sub-schemas are inlined and every object node is closed: no additional
/// properties, every property required.
///
/// # Errors
///
/// Returns [`CompletionError`] if the generated schema cannot be serialized.
///
/// # Examples
///
/// ```
/// use storyteller_core::StorySegments;
/// use storyteller_interface::strict_schema;
///
/// let schema = strict_schema::<StorySegments>().unwrap();
/// let item = &schema["properties"]["result"]["items"];
/// assert_eq!(item["additionalProperties"], false);
/// assert_eq!(item["required"], serde_json::json!(["imageDescription", "text"]));
/// ```
pub fn strict_schema<T: StructuredOutput>() -> StorytellerResult<Value> {
    let root = SchemaSettings::draft07()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root)
        .map_err(|e| CompletionError::new(CompletionErrorKind::Schema(e.to_string())))?;
    if let Some(object) = schema.as_object_mut() {
        object.remove("title");
        object.remove("definitions");
    }
    close_objects(&mut schema);
    Ok(schema)
}

fn close_objects(node: &mut Value) {
    match node {
        Value::Object(map) => {
            let keys: Option<Vec<Value>> = map.get("properties").and_then(|properties| {
                properties
                    .as_object()
                    .map(|p| p.keys().cloned().map(Value::String).collect())
            });
            if let Some(keys) = keys {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                map.insert("required".to_string(), Value::Array(keys));
            }
            map.values_mut().for_each(close_objects);
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

/// Ask `client` for a `T`, validating the reply after the fact.
///
/// One request, no retry.
///
/// # Errors
///
/// Returns the client's error unchanged, or [`CompletionError`] with
/// [`CompletionErrorKind::SchemaViolation`] when the content does not
/// deserialize into `T` or fails [`StructuredOutput::validate`].
#[tracing::instrument(skip(client, prompt), fields(model = client.model_name(), prompt_len = prompt.len(), output = std::any::type_name::<T>()))]
pub async fn complete_structured<T: StructuredOutput>(
    client: &dyn CompletionClient,
    prompt: &str,
) -> StorytellerResult<T> {
    let schema = strict_schema::<T>()?;
    let content = client.complete_json(prompt, &schema).await?;

    let value: T = serde_json::from_value(content).map_err(|e| {
        CompletionError::new(CompletionErrorKind::SchemaViolation(e.to_string()))
    })?;
    value
        .validate()
        .map_err(|reason| CompletionError::new(CompletionErrorKind::SchemaViolation(reason)))?;

    tracing::debug!("Structured completion validated");
    Ok(value)
}
