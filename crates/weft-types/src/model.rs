//! Parsed process model
//!
//! The model is the parsed shape of one process definition: its flow
//! elements, data objects, localization metadata and subscription
//! declarations. Parsing itself happens outside this workspace; the
//! deployment pipeline only consumes the parsed aggregate.

use crate::SubscriptionKind;
use serde::{Deserialize, Serialize};

/// A locale-specific name/description pair attached to a model element.
///
/// Entries come from free-form extension metadata, so any field may be
/// missing. Entries without a locale or a name are malformed and are
/// skipped by the localization merge, never treated as fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizationEntry {
    pub locale: Option<String>,
    pub name: Option<String>,
    /// Raw documentation text; becomes the `description` property
    pub documentation: Option<String>,
}

impl LocalizationEntry {
    pub fn new(locale: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            name: Some(name.into()),
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A data-object declaration on a process or sub-process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataObject {
    pub id: String,
    pub localizations: Vec<LocalizationEntry>,
}

impl DataObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            localizations: Vec::new(),
        }
    }
}

/// Closed set of element kinds the deployment pipeline distinguishes.
///
/// Only tasks and sub-processes carry localization; sub-processes nest
/// further elements and data objects, visited recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Task,
    SubProcess {
        elements: Vec<FlowElement>,
        data_objects: Vec<DataObject>,
    },
    Other,
}

/// One element of a parsed process graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowElement {
    pub id: String,
    pub kind: ElementKind,
    pub localizations: Vec<LocalizationEntry>,
}

impl FlowElement {
    pub fn task(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Task,
            localizations: Vec::new(),
        }
    }

    pub fn sub_process(
        id: impl Into<String>,
        elements: Vec<FlowElement>,
        data_objects: Vec<DataObject>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::SubProcess {
                elements,
                data_objects,
            },
            localizations: Vec::new(),
        }
    }

    pub fn other(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Other,
            localizations: Vec::new(),
        }
    }

    pub fn with_localization(mut self, entry: LocalizationEntry) -> Self {
        self.localizations.push(entry);
        self
    }
}

/// A start-trigger subscription declared by a model (timer schedule,
/// signal or message start event)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDeclaration {
    pub element_id: String,
    pub kind: SubscriptionKind,
    /// Timer schedule or event name, depending on the kind
    pub detail: String,
}

/// The parsed model of one process definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessModel {
    /// Model-level process id; becomes the definition key
    pub process_id: String,
    pub name: Option<String>,
    /// Whether the source carried graphical layout information
    pub has_graphical_info: bool,
    /// Process-level localization metadata
    pub localizations: Vec<LocalizationEntry>,
    pub elements: Vec<FlowElement>,
    pub data_objects: Vec<DataObject>,
    pub subscriptions: Vec<SubscriptionDeclaration>,
    /// Users allowed to start instances; consumed by the authorization
    /// grantor collaborator, never read by the pipeline itself
    pub candidate_starter_users: Vec<String>,
    /// Groups allowed to start instances; consumed by the authorization
    /// grantor collaborator, never read by the pipeline itself
    pub candidate_starter_groups: Vec<String>,
}

impl ProcessModel {
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            name: None,
            has_graphical_info: false,
            localizations: Vec::new(),
            elements: Vec::new(),
            data_objects: Vec::new(),
            subscriptions: Vec::new(),
            candidate_starter_users: Vec::new(),
            candidate_starter_groups: Vec::new(),
        }
    }
}
