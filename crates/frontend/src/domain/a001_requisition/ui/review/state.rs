use contracts::domain::a001_requisition::review::{ReviewBoard, ReviewFilter};
use contracts::system::users::{cached_name, NameCache};
use leptos::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct ReviewState {
    pub board: ReviewBoard,
    pub filter: ReviewFilter,
    pub names: NameCache,
    pub is_loaded: bool,
}

impl ReviewState {
    /// Ids of loaded records passing the filters, in page order
    pub fn visible_ids(&self) -> Vec<i64> {
        self.board
            .records
            .iter()
            .filter(|r| self.filter.matches(r, cached_name(&self.names, r.user_id)))
            .map(|r| r.id)
            .collect()
    }

    pub fn requester_name(&self, id: i64) -> String {
        self.board
            .record(id)
            .map(|r| cached_name(&self.names, r.user_id).to_string())
            .unwrap_or_default()
    }
}

pub fn create_state() -> RwSignal<ReviewState> {
    RwSignal::new(ReviewState::default())
}
