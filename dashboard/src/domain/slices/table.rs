//! Table view state: search, pagination, row selection and modals.

use std::collections::{BTreeSet, HashSet};

use pagination::{DEFAULT_PAGE_SIZE, PageRequest, PaginationError};

use crate::domain::EntityId;

/// Dialogs the dashboard opens over its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    /// Create or edit a region.
    Region,
    /// Create or edit a country.
    Country,
    /// Assign a product to users.
    AssignProduct,
    /// Edit a user.
    EditUser,
    /// Confirm user deletion.
    DeleteUser,
    /// Create an administrator account.
    CreateAdmin,
}

/// Search text, paging, selected rows and open dialogs of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    search: String,
    page: PageRequest,
    selected: BTreeSet<EntityId>,
    modals: HashSet<Modal>,
}

impl TableState {
    /// Table with a custom page size.
    pub fn with_page_size(size: u32) -> Result<Self, PaginationError> {
        Ok(Self {
            page: PageRequest::first(size)?,
            ..Self::default()
        })
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Update the search text and return to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = PageRequest::first(self.page.size()).unwrap_or_default();
    }

    /// Current page request.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Jump to a zero-based page index.
    pub fn set_page_index(&mut self, index: u32) -> Result<(), PaginationError> {
        self.page = PageRequest::from_index(index, self.page.size())?;
        Ok(())
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, size: u32) -> Result<(), PaginationError> {
        self.page = PageRequest::first(size)?;
        Ok(())
    }

    /// Toggle one row; returns whether it is now selected.
    pub fn toggle_row(&mut self, id: EntityId) -> bool {
        if self.selected.remove(&id) {
            return false;
        }
        self.selected.insert(id);
        true
    }

    /// Select exactly `ids`.
    pub fn select_rows(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.selected = ids.into_iter().collect();
    }

    /// Clear row selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected row ids in order.
    pub fn selected(&self) -> impl Iterator<Item = &EntityId> {
        self.selected.iter()
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }

    /// Open a dialog.
    pub fn open(&mut self, modal: Modal) {
        self.modals.insert(modal);
    }

    /// Close a dialog.
    pub fn close(&mut self, modal: Modal) {
        self.modals.remove(&modal);
    }

    /// Whether a dialog is open.
    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals.contains(&modal)
    }
}

/// Page size used when none is configured.
pub const TABLE_PAGE_SIZE: u32 = DEFAULT_PAGE_SIZE;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).expect("valid id")
    }

    #[rstest]
    fn defaults_to_first_page_of_fifty() {
        let table = TableState::default();
        assert_eq!(table.page().page(), 1);
        assert_eq!(table.page().size(), TABLE_PAGE_SIZE);
    }

    #[rstest]
    fn search_returns_to_first_page() {
        let mut table = TableState::with_page_size(10).expect("size");
        table.set_page_index(3).expect("index");
        table.set_search("ada");
        assert_eq!(table.page().index(), 0);
        assert_eq!(table.page().size(), 10);
    }

    #[rstest]
    fn rows_toggle() {
        let mut table = TableState::default();
        assert!(table.toggle_row(id("u1")));
        assert!(table.is_selected(&id("u1")));
        assert!(!table.toggle_row(id("u1")));
        assert_eq!(table.selected().count(), 0);
    }

    #[rstest]
    #[case(Modal::Region)]
    #[case(Modal::AssignProduct)]
    fn modals_open_and_close(#[case] modal: Modal) {
        let mut table = TableState::default();
        table.open(modal);
        assert!(table.is_open(modal));
        assert!(!table.is_open(Modal::CreateAdmin));
        table.close(modal);
        assert!(!table.is_open(modal));
    }

    #[rstest]
    fn rejects_zero_page_size() {
        assert!(TableState::with_page_size(0).is_err());
    }
}
