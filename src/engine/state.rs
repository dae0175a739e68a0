use tracing::{debug, info};

use crate::engine::pipeline::sort_by_field;
use crate::engine::types::{Action, LoadStatus, SortField, ViewState};

/// Apply one action to the view state and return the next state.
///
/// Pure apart from logging: no I/O, no clock, no shared state. Once the state has
/// been unmounted every further action is ignored, which is how a fetch that
/// resolves after teardown gets discarded.
pub fn reduce(mut state: ViewState, action: Action) -> ViewState {
    if !state.mounted {
        debug!(?action, "Dropping action for unmounted view");
        return state;
    }

    match action {
        Action::FetchCompleted(Ok(records)) => {
            info!(count = records.len(), "Market records loaded");
            state.records = records;
            state.status = LoadStatus::Ready;
        }
        Action::FetchCompleted(Err(err)) => {
            // records keep their last-known value; the observer owns the error log
            debug!("Fetch completed with an error");
            state.status = LoadStatus::Failed { reason: err.to_string() };
        }
        Action::SearchChanged(term) => {
            state.search_term = term;
        }
        Action::Sort(field) => {
            let (records, direction) =
                sort_by_field(&state.records, field, state.sort_state(field));
            state.records = records;
            match field {
                SortField::MarketCap => state.market_cap_sort = Some(direction),
                SortField::Change => state.change_sort = Some(direction),
            }
        }
        Action::Unmount => {
            state.mounted = false;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::project;
    use crate::engine::testing::record;
    use crate::engine::types::{MarketRecord, SortDirection};
    use crate::market_data::adapters::FetchError;

    fn loaded(records: Vec<MarketRecord>) -> ViewState {
        reduce(ViewState::new(), Action::FetchCompleted(Ok(records)))
    }

    fn ids(records: &[MarketRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn parse_failure() -> FetchError {
        let err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        FetchError::Parse(err)
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert!(state.records.is_empty());
        assert_eq!(state.search_term, "");
        assert_eq!(state.market_cap_sort, None);
        assert_eq!(state.change_sort, None);
        assert_eq!(state.status, LoadStatus::Loading);
        assert!(state.mounted);
    }

    #[test]
    fn test_fetch_success_replaces_records() {
        let state = loaded(vec![record("btc", "Bitcoin", 2.0, None)]);
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(ids(&state.records), vec!["btc"]);
    }

    #[test]
    fn test_fetch_failure_keeps_records_and_reports() {
        let state = reduce(ViewState::new(), Action::FetchCompleted(Err(parse_failure())));
        assert!(state.records.is_empty());
        assert!(project(&state).is_empty());
        assert!(matches!(state.status, LoadStatus::Failed { .. }));

        let state = loaded(vec![record("btc", "Bitcoin", 2.0, None)]);
        let state = reduce(state, Action::FetchCompleted(Err(parse_failure())));
        assert_eq!(ids(&state.records), vec!["btc"]);
    }

    #[test]
    fn test_sort_toggles_are_independent() {
        let state = loaded(vec![
            record("a", "A", 10.0, Some(3.0)),
            record("b", "B", 30.0, Some(1.0)),
            record("c", "C", 20.0, Some(2.0)),
        ]);

        let state = reduce(state, Action::Sort(SortField::MarketCap));
        assert_eq!(ids(&state.records), vec!["b", "c", "a"]);
        assert_eq!(state.market_cap_sort, Some(SortDirection::Descending));
        assert_eq!(state.change_sort, None);

        let state = reduce(state, Action::Sort(SortField::Change));
        assert_eq!(ids(&state.records), vec!["a", "c", "b"]);
        assert_eq!(state.change_sort, Some(SortDirection::Descending));
        assert_eq!(state.market_cap_sort, Some(SortDirection::Descending));

        let state = reduce(state, Action::Sort(SortField::MarketCap));
        assert_eq!(ids(&state.records), vec!["a", "c", "b"]);
        assert_eq!(state.market_cap_sort, Some(SortDirection::Ascending));
        assert_eq!(state.change_sort, Some(SortDirection::Descending));
    }

    #[test]
    fn test_sort_reorders_full_dataset_under_search() {
        let state = loaded(vec![
            record("eth", "Ethereum", 2.0, None),
            record("btc", "Bitcoin", 3.0, None),
            record("bch", "Bitcoin Cash", 1.0, None),
        ]);
        let state = reduce(state, Action::SearchChanged("bit".to_string()));
        let state = reduce(state, Action::Sort(SortField::MarketCap));
        assert_eq!(state.search_term, "bit");
        let visible: Vec<&str> = project(&state).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, vec!["btc", "bch"]);

        let state = reduce(state, Action::SearchChanged(String::new()));
        let visible: Vec<&str> = project(&state).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, vec!["btc", "eth", "bch"]);
    }

    #[test]
    fn test_unmounted_state_ignores_late_fetch() {
        let state = reduce(ViewState::new(), Action::Unmount);
        assert!(!state.mounted);
        let late = vec![record("btc", "Bitcoin", 2.0, None)];
        let state = reduce(state, Action::FetchCompleted(Ok(late)));
        assert!(state.records.is_empty());
        assert_eq!(state.status, LoadStatus::Loading);
    }
}
