use std::sync::Arc;

use models::Entity;
use tracing::debug;

use super::Render;
use crate::storage::SlotStore;
use crate::store::EntityStore;

/// Read-only consumer. It opens the slot at its own mount time and keeps a
/// snapshot; changes made elsewhere show up on the next mount.
pub struct Viewer<E, S: ?Sized = dyn SlotStore> {
    slots: Arc<S>,
    snapshot: Option<Vec<E>>,
}

impl<E, S> Viewer<E, S>
where
    E: Entity,
    S: SlotStore + ?Sized,
{
    pub fn new(slots: Arc<S>) -> Self { Self { slots, snapshot: None } }

    pub async fn mount(&mut self) -> &[E] {
        let store: EntityStore<E, S> = EntityStore::new(Arc::clone(&self.slots));
        let records = store.open().await;
        debug!(slot = E::SLOT, count = records.len(), "viewer_mounted");
        self.snapshot.insert(records)
    }

    pub fn render(&self) -> Render<E> {
        match &self.snapshot {
            None => Render::Loading,
            Some(records) => Render::from_records(records.clone()),
        }
    }
}

/// Mount a viewer and render it in one step.
pub async fn view<E, S>(slots: Arc<S>) -> Render<E>
where
    E: Entity,
    S: SlotStore + ?Sized,
{
    let mut viewer = Viewer::new(slots);
    viewer.mount().await;
    viewer.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumers::Editor;
    use crate::storage::MemorySlots;
    use models::service::NewService;
    use models::Service;

    #[tokio::test]
    async fn viewer_is_loading_before_mount() {
        let viewer: Viewer<Service, MemorySlots> = Viewer::new(Arc::new(MemorySlots::new()));
        assert_eq!(viewer.render(), Render::Loading);
    }

    #[tokio::test]
    async fn empty_collection_renders_explicit_empty_state() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        slots.write(Service::SLOT, "[]").await?;
        assert_eq!(view::<Service, _>(slots).await, Render::Empty);
        Ok(())
    }

    #[tokio::test]
    async fn viewer_sees_editor_changes_only_after_remount() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());

        // fresh install: the viewer alone seeds the slot
        let mut viewer: Viewer<Service, MemorySlots> = Viewer::new(Arc::clone(&slots));
        assert_eq!(viewer.mount().await.len(), 6);

        let editor: Editor<Service, MemorySlots> = Editor::new(Arc::clone(&slots));
        editor.mount().await;
        let committed = editor.create(NewService { src: "x.png".into(), alt: "Test Service".into() }).await?;
        assert_eq!(committed.records.len(), 7);
        assert_eq!(committed.records[0].alt, "Test Service");

        // the mounted viewer still shows its snapshot
        assert_eq!(viewer.render().items().len(), 6);

        // a new mount (page reload) picks the change up
        let reloaded = view::<Service, _>(Arc::clone(&slots)).await;
        assert_eq!(reloaded.items().len(), 7);
        assert_eq!(reloaded.items()[0].alt, "Test Service");
        assert_eq!(reloaded.items()[0].src, "x.png");
        Ok(())
    }
}
