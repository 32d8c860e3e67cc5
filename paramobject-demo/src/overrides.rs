//! Parsing of `NAME=VALUE` assignments from the command line and the environment.

use paramobject::{ParamError, ParamMap, ParamValue};

/// Environment variable holding construction overrides, e.g.
///
/// ```bash
/// export PARAMOBJECT_OVERRIDES='radius=2.5;length=40'
/// ```
pub const ENV_OVERRIDES: &str = "PARAMOBJECT_OVERRIDES";

/// A single `PATH=VALUE` assignment. `PATH` may be dotted to reach nested objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: Vec<String>,
    pub value: ParamValue,
}

impl Assignment {
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parents(&self) -> &[String] {
        &self.path[..self.path.len().saturating_sub(1)]
    }
}

/// Parse `PATH=VALUE`. Values are read as JSON; anything that is not valid JSON is a string.
pub fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let Some((path, value)) = s.split_once('=') else {
        return Err(format!("Invalid assignment '{s}'. Expected 'name=value'"));
    };

    let path: Vec<String> = path.trim().split('.').map(|p| p.trim().to_string()).collect();
    if path.iter().any(String::is_empty) {
        return Err(format!("Invalid parameter path in '{s}'"));
    }

    let value = value.trim();
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => json_to_param(&json).map_err(|e| e.to_string())?,
        Err(_) => ParamValue::Str(value.to_string()),
    };

    Ok(Assignment { path, value })
}

/// Read [`ENV_OVERRIDES`] as semicolon-separated `name=value` pairs.
pub fn env_overrides() -> Result<ParamMap, String> {
    let mut overrides = ParamMap::new();
    let Ok(raw) = std::env::var(ENV_OVERRIDES) else {
        return Ok(overrides);
    };
    tracing::debug!("Applying overrides from {}: {}", ENV_OVERRIDES, raw);

    for pair in raw.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let assignment = parse_assignment(pair)?;
        if assignment.path.len() > 1 {
            return Err(format!(
                "{ENV_OVERRIDES} does not accept nested paths: '{pair}'"
            ));
        }
        tracing::debug!("Override: {} = {}", assignment.name(), assignment.value);
        overrides.insert(assignment.name().to_string(), assignment.value);
    }

    Ok(overrides)
}

pub fn json_to_param(json: &serde_json::Value) -> Result<ParamValue, ParamError> {
    use serde_json::Value;

    match json {
        Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(ParamValue::Int(i)),
            None => n
                .as_f64()
                .map(ParamValue::Float)
                .ok_or_else(|| ParamError::custom(format!("number out of range: {n}"))),
        },
        Value::String(s) => Ok(ParamValue::Str(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(json_to_param)
            .collect::<Result<Vec<_>, _>>()
            .map(ParamValue::List),
        Value::Null => Err(ParamError::custom("null is not a parameter value")),
        Value::Object(_) => Err(ParamError::custom(
            "objects cannot be built from JSON, use a dotted path instead",
        )),
    }
}
