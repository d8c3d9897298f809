/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Host descriptions as exchanged with the orchestrator.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Map;
use serde_json::Value;

/// `EINVAL`, reported negated like the manager does.
pub const EINVAL: i32 = 22;

/// A host description failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct SpecValidationError {
    pub msg: String,
    pub errno: i32,
}

impl SpecValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            errno: -EINVAL,
        }
    }
}

/// Information about one host.
#[derive(Debug, Clone)]
pub struct HostSpec {
    /// Bare hostname, not the FQDN.
    pub hostname: String,
    /// DNS name or IP address used to reach the host.
    pub addr: String,
    /// Unique labels in first-seen order.
    pub labels: Vec<String>,
    /// Human readable status.
    pub status: String,
    pub location: Option<BTreeMap<String, String>>,
}

impl HostSpec {
    /// A host reachable by its own name, without labels.
    pub fn new(hostname: impl Into<String>) -> Self {
        let hostname = hostname.into();
        Self {
            addr: hostname.clone(),
            hostname,
            labels: Vec::new(),
            status: String::new(),
            location: None,
        }
    }

    /// Parse and normalize a JSON host description.
    ///
    /// `labels` may be a single string or a list of strings and is
    /// de-duplicated. `location` must map strings to strings. A JSON
    /// `null` counts as absent for every optional field.
    pub fn from_json(value: &Value) -> Result<Self, SpecValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| SpecValidationError::new(format!("Host spec ({}) must be a dictionary", value)))?;

        let hostname = obj
            .get("hostname")
            .and_then(Value::as_str)
            .ok_or_else(|| SpecValidationError::new("Host spec requires a string hostname"))?;

        let mut spec = HostSpec::new(hostname);
        // An empty address falls back to the hostname.
        if let Some(addr) = optional_str(obj, "addr")?.filter(|a| !a.is_empty()) {
            spec.addr = addr.to_string();
        }
        if let Some(status) = optional_str(obj, "status")? {
            spec.status = status.to_string();
        }
        spec.labels = normalize_labels(obj.get("labels"))?;
        spec.location = normalize_location(obj.get("location"))?;
        Ok(spec)
    }

    /// Serialize back to JSON. `location` is omitted when unset or
    /// empty.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("hostname".into(), Value::from(self.hostname.clone()));
        obj.insert("addr".into(), Value::from(self.addr.clone()));
        obj.insert("labels".into(), Value::from(dedup(self.labels.clone())));
        obj.insert("status".into(), Value::from(self.status.clone()));
        if let Some(location) = self.location.as_ref().filter(|l| !l.is_empty()) {
            let location: Map<String, Value> = location
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                .collect();
            obj.insert("location".into(), Value::Object(location));
        }
        Value::Object(obj)
    }
}

fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, SpecValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(SpecValidationError::new(format!(
            "{} ({}) must be a string",
            key, other
        ))),
    }
}

fn normalize_labels(labels: Option<&Value>) -> Result<Vec<String>, SpecValidationError> {
    let invalid =
        |v: &Value| SpecValidationError::new(format!("Labels ({}) must be a string or list of strings", v));
    match labels {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(label)) => Ok(vec![label.clone()]),
        Some(v @ Value::Array(items)) => {
            let labels = items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(v)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(dedup(labels))
        }
        Some(other) => Err(invalid(other)),
    }
}

fn normalize_location(
    location: Option<&Value>,
) -> Result<Option<BTreeMap<String, String>>, SpecValidationError> {
    let invalid = |v: &Value| {
        SpecValidationError::new(format!(
            "Location ({}) must be a dictionary of strings to strings",
            v
        ))
    };
    match location {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(entries)) => entries
            .iter()
            .map(|(k, val)| {
                val.as_str()
                    .map(|s| (k.clone(), s.to_string()))
                    .ok_or_else(|| invalid(v))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Some),
        Some(other) => Err(invalid(other)),
    }
}

/// Drop repeated labels, keeping the first occurrence.
fn dedup(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hostname != self.addr {
            write!(f, "{} ({})", self.hostname, self.addr)
        } else {
            f.write_str(&self.hostname)
        }
    }
}

/// Status is ignored: a host whose status changed is still the same
/// host. Label order is ignored too.
impl PartialEq for HostSpec {
    fn eq(&self, other: &Self) -> bool {
        let mut mine = self.labels.clone();
        let mut theirs = other.labels.clone();
        mine.sort();
        theirs.sort();
        self.hostname == other.hostname
            && self.addr == other.addr
            && mine == theirs
            && self.location == other.location
    }
}
