//! JSON -> relation schema conversion

use std::collections::HashMap;

use super::CliError;
use crate::schema::Schema;

/// Reads `{"people": ["id", "name"], ...}` into a schema map.
pub fn schemas_from_json(text: &str) -> Result<HashMap<String, Schema>, CliError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let serde_json::Value::Object(object) = value else {
        return Err(CliError::InvalidSchemas(
            "expected an object of relation name to attribute list".to_string(),
        ));
    };

    object
        .into_iter()
        .map(|(name, attributes)| {
            let serde_json::Value::Array(attributes) = attributes else {
                return Err(CliError::InvalidSchemas(format!(
                    "attributes of '{}' must be an array",
                    name
                )));
            };
            let attributes = attributes
                .into_iter()
                .map(|attribute| match attribute {
                    serde_json::Value::String(s) => Ok(s),
                    other => Err(CliError::InvalidSchemas(format!(
                        "attribute {} of '{}' is not a string",
                        other, name
                    ))),
                })
                .collect::<Result<Schema, _>>()?;
            Ok((name, attributes))
        })
        .collect()
}
