//! Server record types and the per-key resource union.
//!
//! The server owns these schemas. Only the fields the client reads are
//! modelled; anything else in the payload is ignored. Every field tolerates
//! being absent or `null` and falls back to zero, an empty string, or an
//! empty sequence, so a sparse record never fails a page.

use crate::derive;
use crate::error::TransportError;
use crate::key::ResourceKey;
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Aggregate counters shown in the dashboard stat cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_features: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub implemented_features: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_progress_features: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_started_features: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_files: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_loc: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_functions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stub_functions: u64,
    /// Server-computed stub rate. Absent on older servers.
    #[serde(default)]
    pub stub_percentage: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub critical_stubs: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_todos: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_fixmes: u64,
}

impl Overview {
    /// Stub rate from the server when present, otherwise derived from counts.
    pub fn effective_stub_percentage(&self) -> f64 {
        self.stub_percentage
            .unwrap_or_else(|| derive::stub_percentage(self.stub_functions, self.total_functions))
    }
}

/// Component row as summarised by the dashboard endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub module_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_loc: u64,
}

/// Feature count grouped by status and priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBreakdown {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// One audit-log row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub performed_at: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload of `/api/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: Overview,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<ComponentSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_breakdown: Vec<FeatureBreakdown>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_activity: Vec<Activity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority_tasks: Vec<Task>,
}

// ============================================================================
// ENTITY RECORDS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub implementation_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default)]
    pub absolute_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub function_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stub_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stub {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub function_name: String,
    #[serde(default)]
    pub stub_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub detection_reason: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_number: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub component_name: Option<String>,
}

// ============================================================================
// LIST ENVELOPES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StubList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stubs: Vec<Stub>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
}

// ============================================================================
// RESOURCE UNION
// ============================================================================

/// Decoded response body, one concrete shape per resource key.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Dashboard(DashboardPayload),
    Components(ComponentList),
    Features(FeatureList),
    Files(FileList),
    Stubs(StubList),
    Tasks(TaskList),
    /// Search envelope is server-defined and rendered verbatim.
    Search(serde_json::Value),
}

impl Resource {
    /// Decode a response body into the shape owned by `key`.
    pub fn decode(key: &ResourceKey, body: &[u8]) -> Result<Self, TransportError> {
        let resource = match key {
            ResourceKey::Dashboard => Resource::Dashboard(serde_json::from_slice(body)?),
            ResourceKey::Components => Resource::Components(serde_json::from_slice(body)?),
            ResourceKey::Features => Resource::Features(serde_json::from_slice(body)?),
            ResourceKey::Files => Resource::Files(serde_json::from_slice(body)?),
            ResourceKey::Stubs => Resource::Stubs(serde_json::from_slice(body)?),
            ResourceKey::Tasks => Resource::Tasks(serde_json::from_slice(body)?),
            ResourceKey::Search(_) => Resource::Search(serde_json::from_slice(body)?),
        };
        Ok(resource)
    }

    pub fn as_dashboard(&self) -> Option<&DashboardPayload> {
        match self {
            Resource::Dashboard(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_components(&self) -> Option<&[Component]> {
        match self {
            Resource::Components(list) => Some(&list.components),
            _ => None,
        }
    }

    pub fn as_features(&self) -> Option<&[Feature]> {
        match self {
            Resource::Features(list) => Some(&list.features),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[FileRecord]> {
        match self {
            Resource::Files(list) => Some(&list.files),
            _ => None,
        }
    }

    pub fn as_stubs(&self) -> Option<&[Stub]> {
        match self {
            Resource::Stubs(list) => Some(&list.stubs),
            _ => None,
        }
    }

    pub fn as_tasks(&self) -> Option<&[Task]> {
        match self {
            Resource::Tasks(list) => Some(&list.tasks),
            _ => None,
        }
    }

    pub fn as_search(&self) -> Option<&serde_json::Value> {
        match self {
            Resource::Search(value) => Some(value),
            _ => None,
        }
    }
}
