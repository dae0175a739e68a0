use std::cmp::{Ordering, Reverse};

use ordered_float::OrderedFloat;
use tracing::{debug, instrument, trace};

use crate::engine::types::{MarketRecord, SortDirection, SortField, ViewState};

/// Order-preserving subsequence of `records` whose lower-cased name contains the
/// lower-cased `term`. An empty term keeps everything. Whitespace in the term is
/// matched literally.
pub fn filter_by_name<'a>(records: &'a [MarketRecord], term: &str) -> Vec<&'a MarketRecord> {
    if term.is_empty() {
        return records.iter().collect();
    }
    let needle = term.to_lowercase();
    let kept: Vec<&MarketRecord> = records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect();
    trace!(term, total = records.len(), kept = kept.len(), "Filtered records by name");
    kept
}

/// Sort the whole record set on `field`, flipping the stored direction.
///
/// Returns the reordered records and the direction that was applied, which the
/// caller stores as the field's new toggle state. The sort is stable, so ties keep
/// their pre-sort order. Records without a 24h change always end up last.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn sort_by_field(
    records: &[MarketRecord],
    field: SortField,
    current: Option<SortDirection>,
) -> (Vec<MarketRecord>, SortDirection) {
    let direction = SortDirection::next(current);
    let mut sorted = records.to_vec();

    match (field, direction) {
        (SortField::MarketCap, SortDirection::Descending) => {
            sorted.sort_by_key(|r| Reverse(OrderedFloat(r.market_cap)))
        }
        (SortField::MarketCap, SortDirection::Ascending) => {
            sorted.sort_by_key(|r| OrderedFloat(r.market_cap))
        }
        (SortField::Change, _) => sorted.sort_by(|a, b| {
            compare_change(a.price_change_percentage_24h, b.price_change_percentage_24h, direction)
        }),
    }

    debug!(?field, ?direction, "Sorted record set");
    (sorted, direction)
}

// Missing values go after every present value regardless of direction
fn compare_change(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = OrderedFloat(a).cmp(&OrderedFloat(b));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rows to display for the current state, in display order.
pub fn project(state: &ViewState) -> Vec<&MarketRecord> {
    filter_by_name(&state.records, &state.search_term)
}
