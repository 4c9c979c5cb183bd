//! Savepoint format migrations.
//!
//! Each step upgrades a raw JSON document by exactly one format version. Steps
//! run in order from the document's version up to [`CURRENT_VERSION`]; if any
//! step fails the whole migration fails and the partially upgraded document is
//! discarded.
//!
//! | From | Change                                                              |
//! |------|---------------------------------------------------------------------|
//! | 1    | `fonts`/`images` name→data maps become `{name, data}` lists, `gifs` added |
//! | 2    | per-node `hidden` flags move into the top-level `invisible` list    |
//! | 3    | per-node `pos`/`size` pairs become flat `x`, `y`, `width`, `height` |

use serde_json::{Map, Value};

use crate::error::MigrationError;
use crate::project::{FormatVersion, CURRENT_VERSION};

type Step = fn(&mut Map<String, Value>) -> Result<(), String>;

/// Migration steps keyed by the version they upgrade from.
const STEPS: [(FormatVersion, Step); 3] = [
    (FormatVersion(1), resource_maps_to_lists),
    (FormatVersion(2), hidden_flags_to_invisible),
    (FormatVersion(3), flatten_geometry),
];

/// Outcome of a successful migration.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    /// Version the document was stored with.
    pub from: FormatVersion,
    /// Version the document now carries.
    pub to: FormatVersion,
    /// The upgraded document.
    pub document: Value,
}

/// Read the format version of a raw document.
///
/// # Errors
///
/// Returns [`MigrationError::MissingVersion`] if there is no readable version.
pub fn document_version(document: &Value) -> Result<FormatVersion, MigrationError> {
    document
        .get("version")
        .and_then(FormatVersion::from_value)
        .ok_or(MigrationError::MissingVersion)
}

/// Upgrade a raw document to [`CURRENT_VERSION`].
///
/// A document already on the current version is returned unchanged.
///
/// # Errors
///
/// Returns an error if the version is unknown or newer than this build, or if
/// a step cannot interpret the document.
pub fn migrate(mut document: Value) -> Result<Migration, MigrationError> {
    let from = document_version(&document)?;
    if from > CURRENT_VERSION {
        return Err(MigrationError::UnsupportedVersion(from));
    }

    let mut version = from;
    while version < CURRENT_VERSION {
        let step = step_for(version).ok_or(MigrationError::UnsupportedVersion(version))?;
        let root = document
            .as_object_mut()
            .ok_or_else(|| MigrationError::Malformed {
                version,
                reason: "document is not an object".to_string(),
            })?;
        step(root).map_err(|reason| MigrationError::Malformed { version, reason })?;
        tracing::debug!("Migrated savepoint from version {version} to {}", version.next());
        version = version.next();
    }

    if let Some(root) = document.as_object_mut() {
        root.insert("version".to_string(), Value::from(CURRENT_VERSION.0));
    }

    Ok(Migration {
        from,
        to: CURRENT_VERSION,
        document,
    })
}

fn step_for(version: FormatVersion) -> Option<Step> {
    STEPS
        .iter()
        .find(|(from, _)| *from == version)
        .map(|(_, step)| *step)
}

/// Visit every node under `componentTree`, excluding the synthetic root.
fn for_each_node<F>(root: &mut Map<String, Value>, visit: &mut F) -> Result<(), String>
where
    F: FnMut(&mut Map<String, Value>) -> Result<(), String>,
{
    let Some(tree) = root.get_mut("componentTree") else {
        return Ok(());
    };
    walk_children(tree, visit)
}

fn walk_children<F>(node: &mut Value, visit: &mut F) -> Result<(), String>
where
    F: FnMut(&mut Map<String, Value>) -> Result<(), String>,
{
    let Some(children) = node.get_mut("components") else {
        return Ok(());
    };
    let children = children
        .as_array_mut()
        .ok_or_else(|| "components is not a list".to_string())?;
    for child in children {
        let object = child
            .as_object_mut()
            .ok_or_else(|| "component is not an object".to_string())?;
        visit(object)?;
        walk_children(child, visit)?;
    }
    Ok(())
}

/// 1 → 2: resource maps become `{name, data}` lists.
fn resource_maps_to_lists(root: &mut Map<String, Value>) -> Result<(), String> {
    for key in ["fonts", "images", "gifs"] {
        let converted = match root.remove(key) {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(Value::Object(map)) => {
                let mut entries = Vec::with_capacity(map.len());
                for (name, data) in map {
                    let Value::String(data) = data else {
                        return Err(format!("{key}.{name} is not a string payload"));
                    };
                    entries.push(serde_json::json!({ "name": name, "data": data }));
                }
                Value::Array(entries)
            }
            Some(list @ Value::Array(_)) => list,
            Some(_) => return Err(format!("{key} is neither a map nor a list")),
        };
        root.insert(key.to_string(), converted);
    }
    Ok(())
}

/// 2 → 3: `hidden: true` on a node moves its id into `invisible`.
fn hidden_flags_to_invisible(root: &mut Map<String, Value>) -> Result<(), String> {
    let mut hidden = Vec::new();
    for_each_node(root, &mut |node| {
        if node.remove("hidden").and_then(|v| v.as_bool()) == Some(true) {
            let id = node
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| "hidden component has no id".to_string())?;
            hidden.push(id.to_string());
        }
        Ok(())
    })?;

    let invisible = root
        .entry("invisible")
        .or_insert_with(|| Value::Array(Vec::new()));
    if invisible.is_null() {
        *invisible = Value::Array(Vec::new());
    }
    let list = invisible
        .as_array_mut()
        .ok_or_else(|| "invisible is not a list".to_string())?;
    for id in hidden {
        if !list.iter().any(|existing| existing.as_str() == Some(id.as_str())) {
            list.push(Value::String(id));
        }
    }
    Ok(())
}

/// 3 → 4: `pos: [x, y]` and `size: [w, h]` become flat fields.
fn flatten_geometry(root: &mut Map<String, Value>) -> Result<(), String> {
    for_each_node(root, &mut |node| {
        if let Some(pos) = node.remove("pos") {
            let [x, y] = pair(&pos, "pos")?;
            node.insert("x".to_string(), x);
            node.insert("y".to_string(), y);
        }
        if let Some(size) = node.remove("size") {
            let [width, height] = pair(&size, "size")?;
            node.insert("width".to_string(), width);
            node.insert("height".to_string(), height);
        }
        Ok(())
    })
}

fn pair(value: &Value, field: &str) -> Result<[Value; 2], String> {
    match value.as_array().map(Vec::as_slice) {
        Some([a, b]) if a.is_number() && b.is_number() => Ok([a.clone(), b.clone()]),
        _ => Err(format!("{field} is not a pair of numbers")),
    }
}
