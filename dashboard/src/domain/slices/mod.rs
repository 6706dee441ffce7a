//! Client-side view state held independently of server data.

mod assignment;
mod selection;
mod table;

pub use self::assignment::{
    ALREADY_ASSIGNED, ASSIGNMENT_FAILED, AssignedUser, AssignmentDraft, AssignmentError,
    AssignmentOutcome, BulkAssignmentReport, INCOMPLETE_ASSIGNMENT,
};
pub use self::selection::{INCOMPLETE_FILTERS, IncompleteFilters, SelectionState};
pub use self::table::{Modal, TABLE_PAGE_SIZE, TableState};

/// Every slice of the dashboard's view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Region/country/department/designation selection.
    pub selection: SelectionState,
    /// Pending product assignment.
    pub draft: AssignmentDraft,
    /// Users table state.
    pub users_table: TableState,
}

impl ViewState {
    /// Reset after a fully successful bulk assignment.
    ///
    /// Clears the draft, the geographic selection and the filters, and closes
    /// the assignment dialog.
    pub fn finish_assignment(&mut self) {
        self.draft.reset();
        self.selection.reset();
        self.users_table.close(Modal::AssignProduct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;
    use rstest::rstest;

    #[rstest]
    fn finishing_assignment_resets_draft_and_filters() {
        let id = |v: &str| EntityId::new(v).expect("id");
        let mut state = ViewState::default();
        state.selection.select_region(Some(id("eu")));
        state.selection.set_department("Sales");
        state.draft.select_product(Some(id("p1")));
        state.users_table.open(Modal::AssignProduct);
        state.users_table.set_search("ada");

        state.finish_assignment();

        assert_eq!(state.selection, SelectionState::default());
        assert_eq!(state.draft, AssignmentDraft::default());
        assert!(!state.users_table.is_open(Modal::AssignProduct));
        assert_eq!(state.users_table.search(), "ada");
    }
}
