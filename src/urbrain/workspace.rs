use crate::entities::EntityStore;
use crate::model::StickyNote;
use crate::tabs::TabManager;

/// All live session state: entities, the tab strip, and the opaque sticky
/// notes carried along from storage.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub entities: EntityStore,
    pub tabs: TabManager,
    pub stickies: Vec<StickyNote>,
}

impl Workspace {
    pub fn new(entities: EntityStore, stickies: Vec<StickyNote>) -> Self {
        Self {
            entities,
            tabs: TabManager::new(),
            stickies,
        }
    }
}
