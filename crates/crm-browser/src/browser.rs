//! The item browser: cached listing, navigation and write-through mutations.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crm_client::ItemStore;
use crm_core::config::browser::BrowserConfig;
use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_core::types::{ItemId, Selection};
use crm_entity::folder::FolderPath;
use crm_entity::item::{File, Folder, Item, ItemKind, ItemStatus};
use crm_entity::request::{FilePatch, FolderPatch, ItemUpdate, NewFile, NewFolder};

use crate::confirm::Confirmer;
use crate::download::DownloadedFile;
use crate::drag::{DragPayload, DropTarget};
use crate::filter::{ItemFilter, parse_category};
use crate::navigator::Navigator;
use crate::notify::{Notice, Notifier};
use crate::validation;

/// Browses one remote store's files and folders.
///
/// The browser owns no authoritative state. `items` is whatever the last
/// [`refresh`](Self::refresh) returned; every successful write is followed
/// by another refresh. Failures are reported through the [`Notifier`] and
/// returned to the caller; none of them leave the browser unusable.
#[derive(Debug)]
pub struct ItemBrowser {
    /// Remote store.
    store: Arc<dyn ItemStore>,
    /// Where notices go.
    notifier: Arc<dyn Notifier>,
    /// Open folder and breadcrumbs.
    navigator: Navigator,
    /// Search text and filter selections.
    filter: ItemFilter,
    /// Folders then files from the last refresh.
    items: Vec<Item>,
    /// Reject folder moves that obviously nest a folder in itself.
    reject_cyclic_drops: bool,
}

impl ItemBrowser {
    /// Create a browser at root with the configured default filters.
    ///
    /// Nothing is fetched until the first [`refresh`](Self::refresh).
    pub fn new(
        store: Arc<dyn ItemStore>,
        notifier: Arc<dyn Notifier>,
        config: &BrowserConfig,
    ) -> AppResult<Self> {
        let status = config.default_status.parse().map_err(|e: AppError| {
            AppError::configuration(format!("browser.default_status: {}", e.message))
        })?;

        Ok(Self {
            store,
            notifier,
            navigator: Navigator::new(),
            filter: ItemFilter {
                query: String::new(),
                category: parse_category(&config.default_category),
                status,
            },
            items: Vec::new(),
            reject_cyclic_drops: config.reject_cyclic_drops,
        })
    }

    /// Name of the backing store type.
    pub fn store_type(&self) -> &str {
        self.store.store_type()
    }

    /// The open folder, or `None` at root.
    pub fn cursor(&self) -> Option<&ItemId> {
        self.navigator.cursor()
    }

    pub fn path(&self) -> &FolderPath {
        self.navigator.path()
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    /// Everything from the last refresh, before filtering.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The items shown for the open folder under the current filters.
    pub fn visible(&self) -> Vec<&Item> {
        self.filter.apply(&self.items, self.navigator.cursor())
    }

    /// A cached item. Files and folders may share ids, so the kind is
    /// part of the lookup.
    pub fn cached(&self, id: &ItemId, kind: ItemKind) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| item.kind() == kind && item.id() == id)
    }

    /// Set the search text. Applied locally; no refresh needed.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    /// Set the category filter. The server filters files by category, so
    /// call [`refresh`](Self::refresh) afterwards.
    pub fn set_category(&mut self, category: Selection<String>) {
        self.filter.category = category;
    }

    /// Set the status filter. Applied locally; no refresh needed.
    pub fn set_status(&mut self, status: Selection<ItemStatus>) {
        self.filter.status = status;
    }

    /// Reload the open folder's subfolders and the category's files.
    ///
    /// Both reads run concurrently. If either fails the cached items are
    /// cleared rather than left stale.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let cursor = self.navigator.cursor().cloned();
        let category = self.filter.category.value().cloned();

        let fetched = tokio::try_join!(
            self.store.list_folders(cursor.as_ref()),
            self.store.list_files(category.as_deref()),
        );

        match fetched {
            Ok((folders, files)) => {
                self.items = folders
                    .into_iter()
                    .map(Item::Folder)
                    .chain(files.into_iter().map(Item::File))
                    .collect();
                debug!(
                    folder_id = ?cursor,
                    category = ?category,
                    items = self.items.len(),
                    "Items refreshed"
                );
                Ok(())
            }
            Err(e) => {
                self.items.clear();
                Err(self.reject(e))
            }
        }
    }

    /// Open a folder and load its contents.
    pub async fn open_folder(&mut self, item: &Item) -> AppResult<()> {
        self.navigator
            .open_folder(item)
            .map_err(|e| self.reject(e))?;
        self.refresh().await
    }

    /// Jump back to the breadcrumb at `index` (0 is root) and reload.
    pub async fn navigate_to_breadcrumb(&mut self, index: usize) -> AppResult<()> {
        self.navigator
            .navigate_to_breadcrumb(index)
            .map_err(|e| self.reject(e))?;
        self.refresh().await
    }

    /// Go to root and reload.
    pub async fn go_to_root(&mut self) -> AppResult<()> {
        self.navigator.go_to_root();
        self.refresh().await
    }

    /// Create a folder inside the open folder.
    pub async fn create_folder(&mut self, folder: NewFolder) -> AppResult<Folder> {
        let mut folder = validation::validate_new_folder(folder).map_err(|e| self.reject(e))?;
        folder.parent_id = self.navigator.cursor().cloned();

        let created = self
            .store
            .create_folder(&folder)
            .await
            .map_err(|e| self.reject(e))?;

        info!(folder_id = %created.id, name = %created.name, "Folder created");
        self.written(format!("Folder '{}' created", created.name))
            .await;
        Ok(created)
    }

    /// Upload a file into the open folder.
    pub async fn upload_file(&mut self, file: NewFile) -> AppResult<File> {
        let mut file = validation::validate_new_file(file).map_err(|e| self.reject(e))?;
        file.folder_id = self.navigator.cursor().cloned();

        let created = self
            .store
            .upload_file(file)
            .await
            .map_err(|e| self.reject(e))?;

        info!(
            file_id = %created.id,
            name = %created.name,
            size = ?created.size,
            "File uploaded"
        );
        self.written(format!("File '{}' uploaded", created.name))
            .await;
        Ok(created)
    }

    /// Edit an item's fields.
    ///
    /// Status changes are checked against the item's cached status when
    /// it is known: an active item may take any accepted status, and any
    /// other status may only return to active.
    pub async fn update(
        &mut self,
        id: &ItemId,
        kind: ItemKind,
        update: ItemUpdate,
    ) -> AppResult<Item> {
        let update = validation::validate_update(update, kind).map_err(|e| self.reject(e))?;

        if let (Some(next), Some(cached)) = (update.status, self.cached(id, kind)) {
            let current = cached.status();
            if !current.can_transition_to(next) {
                return Err(self.reject(AppError::validation(format!(
                    "Cannot change status from '{current}' to '{next}'"
                ))));
            }
        }

        let updated = match kind {
            ItemKind::Folder => self
                .store
                .update_folder(id, &update.into_folder_patch())
                .await
                .map(Item::Folder),
            ItemKind::File => self
                .store
                .update_file(id, &update.into_file_patch())
                .await
                .map(Item::File),
        }
        .map_err(|e| self.reject(e))?;

        info!(item_id = %id, kind = %kind, "Item updated");
        self.written(format!("{} '{}' updated", label(kind), updated.name()))
            .await;
        Ok(updated)
    }

    /// Rename an item.
    pub async fn rename(
        &mut self,
        id: &ItemId,
        kind: ItemKind,
        name: impl Into<String>,
    ) -> AppResult<Item> {
        self.update(id, kind, ItemUpdate::rename(name)).await
    }

    /// Move an item into `new_parent` (`None` for root).
    ///
    /// The store decides whether the move is legal. When
    /// `browser.reject_cyclic_drops` is set, a folder moved onto itself,
    /// below itself along the open path, or into a folder listed under a
    /// cursor it encloses is refused first.
    pub async fn move_item(
        &mut self,
        id: &ItemId,
        kind: ItemKind,
        new_parent: Option<ItemId>,
    ) -> AppResult<Item> {
        if self.reject_cyclic_drops
            && kind == ItemKind::Folder
            && self.would_nest(id, new_parent.as_ref())
        {
            return Err(self.reject(AppError::validation(
                "A folder cannot be moved into itself or one of its subfolders",
            )));
        }

        let moved = match kind {
            ItemKind::Folder => self
                .store
                .update_folder(id, &FolderPatch::move_to(new_parent.clone()))
                .await
                .map(Item::Folder),
            ItemKind::File => self
                .store
                .update_file(id, &FilePatch::move_to(new_parent.clone()))
                .await
                .map(Item::File),
        }
        .map_err(|e| self.reject(e))?;

        info!(item_id = %id, kind = %kind, destination = ?new_parent, "Item moved");
        self.written(format!("{} '{}' moved", label(kind), moved.name()))
            .await;
        Ok(moved)
    }

    /// Complete a drag: move the dragged item onto `target`.
    ///
    /// Returns `Ok(false)` without doing anything when the payload carries
    /// no item id.
    pub async fn handle_drop(
        &mut self,
        payload: &DragPayload,
        target: &DropTarget,
    ) -> AppResult<bool> {
        let Some(id) = payload.item_id() else {
            debug!("Drop without an item id ignored");
            return Ok(false);
        };
        let kind = payload.item_kind().map_err(|e| self.reject(e))?;
        let destination = target.destination(&self.navigator);

        self.move_item(&id, kind, destination).await?;
        Ok(true)
    }

    /// Delete an item after `confirmer` approves.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is sent.
    /// Deleting a folder deletes everything inside it on the server.
    pub async fn delete(
        &mut self,
        id: &ItemId,
        kind: ItemKind,
        confirmer: &dyn Confirmer,
    ) -> AppResult<bool> {
        let name = self.display_name(id, kind);
        let prompt = format!("Delete {kind} '{name}'? This cannot be undone.");
        if !confirmer.confirm(&prompt) {
            debug!(item_id = %id, kind = %kind, "Delete declined");
            return Ok(false);
        }

        let deleted = match kind {
            ItemKind::Folder => self.store.delete_folder(id).await,
            ItemKind::File => self.store.delete_file(id).await,
        };
        deleted.map_err(|e| self.reject(e))?;

        info!(item_id = %id, kind = %kind, "Item deleted");
        self.written(format!("{} '{name}' deleted", label(kind)))
            .await;
        Ok(true)
    }

    /// Fetch a file's content. Folders cannot be downloaded.
    pub async fn download(&self, id: &ItemId, kind: ItemKind) -> AppResult<DownloadedFile> {
        match kind {
            ItemKind::Folder => {
                return Err(self.reject(AppError::validation("Folders cannot be downloaded")));
            }
            ItemKind::File => {}
        }

        let content = self
            .store
            .download_file_bytes(id)
            .await
            .map_err(|e| self.reject(e))?;

        info!(file_id = %id, bytes = content.len(), "File downloaded");
        Ok(DownloadedFile {
            file_name: self.display_name(id, kind),
            content,
        })
    }

    /// The path check, plus folders listed at the cursor when `source`
    /// encloses the cursor.
    fn would_nest(&self, source: &ItemId, destination: Option<&ItemId>) -> bool {
        if self.navigator.would_nest(source, destination) {
            return true;
        }
        let Some(destination) = destination else {
            return false;
        };
        self.path().contains(source)
            && matches!(
                self.cached(destination, ItemKind::Folder),
                Some(Item::Folder(folder)) if folder.parent_id.as_ref() == self.cursor()
            )
    }

    fn display_name(&self, id: &ItemId, kind: ItemKind) -> String {
        self.cached(id, kind)
            .map(|item| item.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Report a failure and hand it back.
    fn reject(&self, err: AppError) -> AppError {
        if err.is_validation() {
            debug!(error = %err, "Request rejected before sending");
        } else {
            warn!(kind = %err.kind, error = %err, "Request failed");
        }
        self.notifier.notify(Notice::error(err.user_message()));
        err
    }

    /// Announce a successful write and resynchronize.
    async fn written(&mut self, message: String) {
        self.notifier.notify(Notice::success(message));
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Refresh after a successful write failed");
        }
    }
}

fn label(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::File => "File",
        ItemKind::Folder => "Folder",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crm_client::MemoryItemStore;
    use crm_core::error::NETWORK_FAILURE_MESSAGE;

    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use crate::notify::RecordingNotifier;

    struct Harness {
        browser: ItemBrowser,
        store: Arc<MemoryItemStore>,
        notices: Arc<RecordingNotifier>,
    }

    fn harness() -> Harness {
        harness_with(&BrowserConfig::default())
    }

    fn harness_with(config: &BrowserConfig) -> Harness {
        let store = Arc::new(MemoryItemStore::new());
        let notices = Arc::new(RecordingNotifier::new());
        let browser = ItemBrowser::new(store.clone(), notices.clone(), config).unwrap();
        Harness {
            browser,
            store,
            notices,
        }
    }

    fn visible_names(browser: &ItemBrowser) -> Vec<String> {
        browser
            .visible()
            .into_iter()
            .map(|i| i.name().to_string())
            .collect()
    }

    fn find(browser: &ItemBrowser, name: &str) -> Item {
        browser
            .visible()
            .into_iter()
            .find(|i| i.name() == name)
            .cloned()
            .unwrap()
    }

    fn pdf(name: &str) -> NewFile {
        NewFile::new(name, "Legal", Bytes::from_static(b"%PDF-1.7"))
    }

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    #[tokio::test]
    async fn test_create_folder_at_root() {
        let mut h = harness();
        assert_eq!(h.browser.store_type(), "memory");
        h.browser.refresh().await.unwrap();
        assert!(h.browser.visible().is_empty());

        let created = h
            .browser
            .create_folder(NewFolder::named("Contracts"))
            .await
            .unwrap();

        let visible = h.browser.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name(), "Contracts");
        assert!(visible[0].is_folder());
        assert_eq!(visible[0].containment(), None);
        assert_eq!(created.parent_id, None);
        assert!(!h.notices.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_upload_attaches_open_folder() {
        let mut h = harness();
        let contracts = h
            .browser
            .create_folder(NewFolder::named("Contracts"))
            .await
            .unwrap();
        h.browser
            .open_folder(&Item::Folder(contracts.clone()))
            .await
            .unwrap();

        let file = h.browser.upload_file(pdf("a.pdf")).await.unwrap();
        assert_eq!(file.folder_id, Some(contracts.id.clone()));
        assert_eq!(visible_names(&h.browser), vec!["a.pdf"]);

        h.browser.go_to_root().await.unwrap();
        assert_eq!(visible_names(&h.browser), vec!["Contracts"]);
    }

    #[tokio::test]
    async fn test_markup_name_rejected_without_request() {
        let mut h = harness();
        let before = h.store.request_count();

        let err = h
            .browser
            .create_folder(NewFolder::named("<script>x</script>"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(h.store.request_count(), before);
        assert!(h.notices.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_drop_file_on_folder() {
        let mut h = harness();
        let a = h.browser.create_folder(NewFolder::named("A")).await.unwrap();
        let b = h.browser.create_folder(NewFolder::named("B")).await.unwrap();

        h.browser.open_folder(&Item::Folder(a.clone())).await.unwrap();
        let f1 = h.browser.upload_file(pdf("f1.pdf")).await.unwrap();
        assert_eq!(visible_names(&h.browser), vec!["f1.pdf"]);

        let payload = DragPayload::for_item(&Item::File(f1.clone()));
        let target = DropTarget::Folder(b.id.clone());
        assert!(h.browser.handle_drop(&payload, &target).await.unwrap());

        assert_eq!(h.store.file(&f1.id).await.unwrap().folder_id, Some(b.id.clone()));
        assert!(h.browser.visible().is_empty());

        h.browser.go_to_root().await.unwrap();
        h.browser.open_folder(&Item::Folder(b)).await.unwrap();
        assert_eq!(visible_names(&h.browser), vec!["f1.pdf"]);
    }

    #[tokio::test]
    async fn test_drop_on_breadcrumb_bar_moves_up() {
        let mut h = harness();
        let a = h.browser.create_folder(NewFolder::named("A")).await.unwrap();
        h.browser.open_folder(&Item::Folder(a.clone())).await.unwrap();
        let b = h.browser.create_folder(NewFolder::named("B")).await.unwrap();
        h.browser.open_folder(&Item::Folder(b.clone())).await.unwrap();
        let f = h.browser.upload_file(pdf("deep.pdf")).await.unwrap();

        let payload = DragPayload::for_item(&Item::File(f.clone()));
        h.browser
            .handle_drop(&payload, &DropTarget::BreadcrumbBar)
            .await
            .unwrap();
        assert_eq!(h.store.file(&f.id).await.unwrap().folder_id, Some(a.id));
    }

    #[tokio::test]
    async fn test_description_word_limit() {
        let mut h = harness();
        let before = h.store.request_count();

        let too_long = NewFolder {
            description: Some(words(101)),
            ..NewFolder::named("Long")
        };
        let err = h.browser.create_folder(too_long).await.unwrap_err();
        assert_eq!(
            err.message,
            "Description must be 100 words or fewer (found 101)"
        );
        assert_eq!(
            h.notices.last().unwrap().message,
            "Description must be 100 words or fewer (found 101)"
        );
        assert_eq!(h.store.request_count(), before);

        let mut just_right = pdf("ok.pdf");
        just_right.description = Some(words(100));
        assert!(h.browser.upload_file(just_right).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_items() {
        let mut h = harness();
        h.browser.create_folder(NewFolder::named("Kept")).await.unwrap();
        assert_eq!(h.browser.items().len(), 1);

        h.store.set_offline(true);
        let err = h.browser.refresh().await.unwrap_err();
        assert_eq!(err.kind, crm_core::ErrorKind::Network);
        assert!(h.browser.items().is_empty());
        assert_eq!(h.notices.last().unwrap().message, NETWORK_FAILURE_MESSAGE);

        h.store.set_offline(false);
        h.browser.refresh().await.unwrap();
        assert_eq!(visible_names(&h.browser), vec!["Kept"]);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let mut h = harness();
        h.browser.create_folder(NewFolder::named("One")).await.unwrap();
        h.browser.upload_file(pdf("two.pdf")).await.unwrap();

        h.browser.refresh().await.unwrap();
        let first = visible_names(&h.browser);
        h.browser.refresh().await.unwrap();
        assert_eq!(visible_names(&h.browser), first);
        assert_eq!(first, vec!["One", "two.pdf"]);
    }

    #[tokio::test]
    async fn test_category_filter_is_sent_and_status_is_local() {
        let mut h = harness();
        h.browser.upload_file(pdf("legal.pdf")).await.unwrap();
        let mut sales = NewFile::new("pitch.ppt", "Sales", Bytes::from_static(b"x"));
        sales.status = ItemStatus::Inactive;
        h.browser.upload_file(sales).await.unwrap();

        h.browser.set_category(Selection::Only("Sales".to_string()));
        h.browser.refresh().await.unwrap();
        assert_eq!(h.browser.items().len(), 1);

        h.browser.set_category(Selection::All);
        h.browser.refresh().await.unwrap();
        h.browser.set_status(Selection::Only(ItemStatus::Inactive));
        assert_eq!(visible_names(&h.browser), vec!["pitch.ppt"]);

        h.browser.set_status(Selection::All);
        h.browser.set_query("LEG");
        assert_eq!(visible_names(&h.browser), vec!["legal.pdf"]);
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let mut h = harness();
        h.browser.create_folder(NewFolder::named("Dup")).await.unwrap();
        let err = h
            .browser
            .create_folder(NewFolder::named("Dup"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, crm_core::ErrorKind::Conflict);
        assert_eq!(h.notices.last().unwrap().message, err.message);
    }

    #[tokio::test]
    async fn test_update_dispatches_by_kind() {
        let mut h = harness();
        let folder = h.browser.create_folder(NewFolder::named("Old")).await.unwrap();
        let file = h.browser.upload_file(pdf("old.pdf")).await.unwrap();

        h.browser
            .rename(&folder.id, ItemKind::Folder, "New")
            .await
            .unwrap();
        let update = ItemUpdate {
            tags: Some(vec![" nda ".to_string(), "".to_string()]),
            category: Some("Finance".to_string()),
            ..ItemUpdate::default()
        };
        let updated = h
            .browser
            .update(&file.id, ItemKind::File, update)
            .await
            .unwrap();

        assert_eq!(h.store.folder(&folder.id).await.unwrap().name, "New");
        assert_eq!(updated.tags().to_vec(), vec!["nda".to_string()]);
        assert_eq!(updated.category(), Some("Finance"));
    }

    #[tokio::test]
    async fn test_status_transitions_follow_state_machine() {
        let mut h = harness();
        let file = h.browser.upload_file(pdf("s.pdf")).await.unwrap();
        let to = |status| ItemUpdate {
            status: Some(status),
            ..ItemUpdate::default()
        };

        h.browser
            .update(&file.id, ItemKind::File, to(ItemStatus::Archived))
            .await
            .unwrap();

        let before = h.store.request_count();
        let err = h
            .browser
            .update(&file.id, ItemKind::File, to(ItemStatus::Inactive))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.store.request_count(), before);

        h.browser
            .update(&file.id, ItemKind::File, to(ItemStatus::Active))
            .await
            .unwrap();
        assert!(
            h.browser
                .update(&file.id, ItemKind::File, to(ItemStatus::Draft))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_cyclic_drops_rejected_locally() {
        let mut h = harness();
        let a = h.browser.create_folder(NewFolder::named("A")).await.unwrap();
        let payload = DragPayload::for_item(&Item::Folder(a.clone()));
        let before = h.store.request_count();

        let err = h
            .browser
            .handle_drop(&payload, &DropTarget::Folder(a.id.clone()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.store.request_count(), before);

        h.browser.open_folder(&Item::Folder(a.clone())).await.unwrap();
        let child = h.browser.create_folder(NewFolder::named("Child")).await.unwrap();
        let before = h.store.request_count();
        let err = h
            .browser
            .handle_drop(&payload, &DropTarget::Folder(child.id))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.store.request_count(), before);
    }

    #[tokio::test]
    async fn test_path_folder_moves_into_root_sibling() {
        let mut h = harness();
        let a = h.browser.create_folder(NewFolder::named("A")).await.unwrap();
        let x = h.browser.create_folder(NewFolder::named("X")).await.unwrap();
        h.browser.open_folder(&Item::Folder(a.clone())).await.unwrap();
        let b = h.browser.create_folder(NewFolder::named("B")).await.unwrap();
        h.browser.open_folder(&Item::Folder(b)).await.unwrap();

        let moved = h
            .browser
            .move_item(&a.id, ItemKind::Folder, Some(x.id.clone()))
            .await
            .unwrap();
        match moved {
            Item::Folder(folder) => assert_eq!(folder.parent_id, Some(x.id)),
            other => panic!("expected a folder, got {other:?}"),
        }
        let notices = h.notices.notices();
        assert!(notices.iter().all(|n| !n.is_error()));
        assert_eq!(
            notices.last().map(|n| n.message.as_str()),
            Some("Folder 'A' moved")
        );
    }

    #[tokio::test]
    async fn test_cycles_left_to_server_when_disabled() {
        let config = BrowserConfig {
            reject_cyclic_drops: false,
            ..BrowserConfig::default()
        };
        let mut h = harness_with(&config);
        let a = h.browser.create_folder(NewFolder::named("A")).await.unwrap();

        let err = h
            .browser
            .move_item(&a.id, ItemKind::Folder, Some(a.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, crm_core::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_drop_without_id_is_ignored() {
        let mut h = harness();
        let before = h.store.request_count();
        let mut payload = DragPayload::default();
        payload.set(crate::drag::ITEM_TYPE_KEY, "file");

        let moved = h
            .browser
            .handle_drop(&payload, &DropTarget::BreadcrumbBar)
            .await
            .unwrap();
        assert!(!moved);
        assert_eq!(h.store.request_count(), before);
    }

    #[tokio::test]
    async fn test_drop_with_unknown_kind_is_rejected() {
        let mut h = harness();
        let mut payload = DragPayload::default();
        payload.set(crate::drag::ITEM_ID_KEY, "42");
        payload.set(crate::drag::ITEM_TYPE_KEY, "contact");

        let err = h
            .browser
            .handle_drop(&payload, &DropTarget::BreadcrumbBar)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut h = harness();
        let file = h.browser.upload_file(pdf("gone.pdf")).await.unwrap();
        let before = h.store.request_count();

        assert!(
            !h.browser
                .delete(&file.id, ItemKind::File, &NeverConfirm)
                .await
                .unwrap()
        );
        assert_eq!(h.store.request_count(), before);
        assert!(h.store.file(&file.id).await.is_some());

        assert!(
            h.browser
                .delete(&file.id, ItemKind::File, &AlwaysConfirm)
                .await
                .unwrap()
        );
        assert!(h.store.file(&file.id).await.is_none());
        assert!(h.browser.visible().is_empty());
        assert_eq!(h.notices.last().unwrap().message, "File 'gone.pdf' deleted");
    }

    #[tokio::test]
    async fn test_folder_download_rejected_without_request() {
        let mut h = harness();
        let folder = h.browser.create_folder(NewFolder::named("F")).await.unwrap();
        let before = h.store.request_count();

        let err = h
            .browser
            .download(&folder.id, ItemKind::Folder)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.store.request_count(), before);
        assert!(h.notices.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_download_names_file_after_record() {
        let mut h = harness();
        let file = h.browser.upload_file(pdf("report.pdf")).await.unwrap();

        let downloaded = h.browser.download(&file.id, ItemKind::File).await.unwrap();
        assert_eq!(downloaded.file_name, "report.pdf");
        assert_eq!(downloaded.content, Bytes::from_static(b"%PDF-1.7"));

        let dir = tempfile::tempdir().unwrap();
        let saved = downloaded.save_into(dir.path()).await.unwrap();
        assert_eq!(saved, dir.path().join("report.pdf"));
    }

    #[tokio::test]
    async fn test_navigation_errors_keep_state() {
        let mut h = harness();
        let before = h.store.request_count();
        assert!(h.browser.navigate_to_breadcrumb(3).await.is_err());
        assert_eq!(h.store.request_count(), before);
        assert!(h.browser.cursor().is_none());
    }

    #[test]
    fn test_invalid_default_status_is_configuration_error() {
        let config = BrowserConfig {
            default_status: "pending".to_string(),
            ..BrowserConfig::default()
        };
        let err = ItemBrowser::new(
            Arc::new(MemoryItemStore::new()),
            Arc::new(RecordingNotifier::new()),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.kind, crm_core::ErrorKind::Configuration);
    }
}
