//! Structural checks over untyped JSON responses.
//!
//! A response is validated against a [`FieldType`] before it is deserialized,
//! so a shape mismatch reports every offending field instead of serde's first
//! error.

use serde_json::Value;

/// Expected JSON shape of a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Str,
    /// Any JSON number, integral or not
    Number,
    Bool,
    /// Object with the listed required fields; extra fields are allowed
    Object(&'static [(&'static str, FieldType)]),
    /// Any JSON object, contents unchecked
    AnyObject,
    ArrayOf(&'static FieldType),
    /// `null` or the inner type. The field itself must still be present.
    Nullable(&'static FieldType),
    /// Accepts anything
    Any,
}

/// Outcome of a shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Violated field paths, e.g. `$[2].pricing.perShot: expected number`
    Invalid(Vec<String>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn violations(&self) -> &[String] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid(violations) => violations,
        }
    }
}

impl FieldType {
    pub fn validate(&self, value: &Value) -> Validation {
        let mut violations = Vec::new();
        self.check(value, "$", &mut violations);
        if violations.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(violations)
        }
    }

    fn check(&self, value: &Value, path: &str, violations: &mut Vec<String>) {
        let ok = match self {
            FieldType::Any => true,
            FieldType::Str => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::AnyObject => value.is_object(),
            FieldType::Nullable(inner) => {
                if !value.is_null() {
                    inner.check(value, path, violations);
                }
                true
            }
            FieldType::ArrayOf(inner) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        inner.check(item, &format!("{path}[{i}]"), violations);
                    }
                    true
                }
                None => false,
            },
            FieldType::Object(fields) => match value.as_object() {
                Some(map) => {
                    for (name, field_type) in fields.iter() {
                        let field_path = format!("{path}.{name}");
                        match map.get(*name) {
                            Some(field) => field_type.check(field, &field_path, violations),
                            None => violations.push(format!("{field_path}: missing")),
                        }
                    }
                    true
                }
                None => false,
            },
        };

        if !ok {
            violations.push(format!("{path}: expected {}", self.describe()));
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FieldType::Any => "any",
            FieldType::Str => "string",
            FieldType::Number => "number",
            FieldType::Bool => "boolean",
            FieldType::Object(_) | FieldType::AnyObject => "object",
            FieldType::ArrayOf(_) => "array",
            FieldType::Nullable(_) => "nullable",
        }
    }
}

// Response shapes of the qBraid API. These must stay in step with the
// structs in `types.rs`: a passing check guarantees deserialization succeeds.

pub const CHAT_MODEL_PRICING: FieldType = FieldType::Object(&[
    ("units", FieldType::Str),
    ("input", FieldType::Number),
    ("output", FieldType::Number),
]);

pub const CHAT_MODEL: FieldType = FieldType::Object(&[
    ("model", FieldType::Str),
    ("description", FieldType::Str),
    ("pricing", CHAT_MODEL_PRICING),
]);

pub const CHAT_MODELS: FieldType = FieldType::ArrayOf(&CHAT_MODEL);

pub const CHAT_RESPONSE: FieldType = FieldType::Object(&[
    ("content", FieldType::Str),
    (
        "usage",
        FieldType::Object(&[
            ("completion_tokens", FieldType::Number),
            ("prompt_tokens", FieldType::Number),
            ("total_tokens", FieldType::Number),
        ]),
    ),
]);

pub const DEVICE_PRICING: FieldType = FieldType::Object(&[
    ("perTask", FieldType::Number),
    ("perShot", FieldType::Number),
    ("perMinute", FieldType::Number),
]);

pub const QUANTUM_DEVICE: FieldType = FieldType::Object(&[
    ("qbraid_id", FieldType::Str),
    ("name", FieldType::Str),
    ("provider", FieldType::Str),
    ("vendor", FieldType::Str),
    ("numberQubits", FieldType::Number),
    ("pendingJobs", FieldType::Number),
    ("paradigm", FieldType::Str),
    ("type", FieldType::Str),
    ("runPackage", FieldType::Str),
    ("status", FieldType::Str),
    ("statusMsg", FieldType::Nullable(&FieldType::Str)),
    ("isAvailable", FieldType::Bool),
    ("nextAvailable", FieldType::Nullable(&FieldType::Str)),
    ("pricing", DEVICE_PRICING),
]);

pub const QUANTUM_DEVICES: FieldType = FieldType::ArrayOf(&QUANTUM_DEVICE);

pub const QUANTUM_JOB_TIMESTAMPS: FieldType = FieldType::Object(&[
    ("createdAt", FieldType::Str),
    ("endedAt", FieldType::Nullable(&FieldType::Str)),
    ("executionDuration", FieldType::Nullable(&FieldType::Number)),
]);

pub const QUANTUM_JOB: FieldType = FieldType::Object(&[
    ("timeStamps", QUANTUM_JOB_TIMESTAMPS),
    ("queuePosition", FieldType::Nullable(&FieldType::Number)),
    ("queueDepth", FieldType::Nullable(&FieldType::Number)),
    ("circuitNumQubits", FieldType::Number),
    ("circuitDepth", FieldType::Number),
    ("qbraidDeviceId", FieldType::Str),
    ("qbraidJobId", FieldType::Str),
    ("status", FieldType::Str),
    ("vendor", FieldType::Str),
    ("provider", FieldType::Str),
    ("escrow", FieldType::Number),
    ("cost", FieldType::Number),
    ("shots", FieldType::Number),
    ("openQasm", FieldType::Str),
    ("measurementCounts", FieldType::Nullable(&FieldType::AnyObject)),
]);

pub const QUANTUM_JOBS_RESPONSE: FieldType = FieldType::Object(&[
    ("jobsArray", FieldType::ArrayOf(&QUANTUM_JOB)),
    ("statusGroup", FieldType::Str),
    ("provider", FieldType::Str),
    ("total", FieldType::Number),
]);
