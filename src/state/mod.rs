//! Application state shared by the interaction engines.
//!
//! Collections are copy-on-write: every mutation builds a new list and swaps
//! the `Arc`, so history entries and readers share snapshots.

mod guides;
mod history;
mod items;
mod selection;

pub use history::{History, ItemList};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::model::{default_catalog, Catalog, GuidePoint, Measurement, Workpiece};
use crate::units::Unit;
use uuid::Uuid;

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Cut,
    Measure,
    Move,
    Rotate,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Cut => "cut",
            Tool::Measure => "measure",
            Tool::Move => "move",
            Tool::Rotate => "rotate",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display and tool settings.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSettings {
    pub unit: Unit,
    pub snapping_enabled: bool,
    pub show_dimensions: bool,
    pub active_tool: Tool,
    /// Tool to restore once a measurement is completed.
    pub previous_tool: Option<Tool>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            unit: Unit::Centimeters,
            snapping_enabled: true,
            show_dimensions: true,
            active_tool: Tool::Select,
            previous_tool: None,
        }
    }
}

/// Callback invoked with the new revision after every change.
pub type ChangeHook = Box<dyn FnMut(u64)>;

/// The workspace: items, guides, measurements, selection and history.
pub struct AppState {
    config: PlannerConfig,
    catalog: Catalog,
    items: ItemList,
    guides: Arc<Vec<GuidePoint>>,
    measurements: Arc<Vec<Measurement>>,
    selection: Vec<Uuid>,
    ui: UiSettings,
    history: History,
    revision: u64,
    on_change: Option<ChangeHook>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("items", &self.items.len())
            .field("guides", &self.guides.len())
            .field("measurements", &self.measurements.len())
            .field("selection", &self.selection)
            .field("ui", &self.ui)
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl AppState {
    /// Empty workspace with the built-in catalog.
    pub fn new(config: PlannerConfig) -> Self {
        let items: ItemList = Arc::new(Vec::new());
        let history = History::new(items.clone(), config.history_limit);
        Self {
            config,
            catalog: default_catalog(),
            items,
            guides: Arc::new(Vec::new()),
            measurements: Arc::new(Vec::new()),
            selection: Vec::new(),
            ui: UiSettings::default(),
            history,
            revision: 0,
            on_change: None,
        }
    }

    /// Replace the whole workspace (e.g. after loading a project).
    ///
    /// History restarts with `items` as its first entry.
    pub fn with_contents(
        mut self,
        catalog: Catalog,
        items: Vec<Workpiece>,
        guides: Vec<GuidePoint>,
        measurements: Vec<Measurement>,
    ) -> Self {
        self.catalog = catalog;
        self.items = Arc::new(items);
        self.guides = Arc::new(guides);
        self.measurements = Arc::new(measurements);
        self.selection.clear();
        self.history.reset(self.items.clone());
        self
    }

    pub fn with_ui(mut self, ui: UiSettings) -> Self {
        self.ui = ui;
        self
    }

    /// Install the change hook (persistence collaborator).
    pub fn set_change_hook(&mut self, hook: impl FnMut(u64) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    // ==== accessors ====

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn items(&self) -> &[Workpiece] {
        &self.items
    }

    /// Shared handle to the current item list.
    pub fn item_list(&self) -> ItemList {
        self.items.clone()
    }

    pub fn item(&self, id: Uuid) -> Option<&Workpiece> {
        self.items.iter().find(|i| i.instance_id == id)
    }

    pub fn guides(&self) -> &[GuidePoint] {
        &self.guides
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn selected_ids(&self) -> &[Uuid] {
        &self.selection
    }

    pub fn ui(&self) -> &UiSettings {
        &self.ui
    }

    pub fn unit(&self) -> Unit {
        self.ui.unit
    }

    pub fn snapping_enabled(&self) -> bool {
        self.ui.snapping_enabled
    }

    pub fn active_tool(&self) -> Tool {
        self.ui.active_tool
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ==== settings ====

    pub fn set_unit(&mut self, unit: Unit) {
        self.ui.unit = unit;
    }

    pub fn set_snapping(&mut self, enabled: bool) {
        self.ui.snapping_enabled = enabled;
    }

    pub fn set_show_dimensions(&mut self, show: bool) {
        self.ui.show_dimensions = show;
    }

    /// Switch tools. Entering Measure remembers the tool to come back to.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == Tool::Measure && self.ui.active_tool != Tool::Measure {
            self.ui.previous_tool = Some(self.ui.active_tool);
        }
        self.ui.active_tool = tool;
    }

    /// Return from Measure to the remembered tool, if any.
    fn restore_previous_tool(&mut self) {
        if let Some(previous) = self.ui.previous_tool.take() {
            if previous != Tool::Measure {
                self.ui.active_tool = previous;
            }
        }
    }

    // ==== history ====

    /// Record the current item list as a history entry.
    pub fn snapshot(&mut self) {
        self.history.push(self.items.clone());
        self.notify_change();
    }

    /// Restore the previous item list. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(items) => {
                self.items = items;
                self.prune_selection();
                self.notify_change();
                true
            }
            None => false,
        }
    }

    /// Re-apply an undone item list. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(items) => {
                self.items = items;
                self.prune_selection();
                self.notify_change();
                true
            }
            None => false,
        }
    }

    /// Bump the revision and tell the hook.
    fn notify_change(&mut self) {
        self.revision += 1;
        debug!("Workspace revision {}", self.revision);
        if let Some(hook) = self.on_change.as_mut() {
            hook(self.revision);
        }
    }

    fn set_items(&mut self, items: Vec<Workpiece>) {
        self.items = Arc::new(items);
    }

    /// Drop selected ids that no longer name an item.
    fn prune_selection(&mut self) {
        let items = &self.items;
        self.selection
            .retain(|id| items.iter().any(|i| i.instance_id == *id));
    }
}
