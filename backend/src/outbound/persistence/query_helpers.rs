//! Small helpers shared by the paged Diesel queries.

use std::collections::HashMap;

use pagination::PageRequest;
use uuid::Uuid;

use super::models::tally_from_db;

/// `(limit, offset)` as Diesel wants them.
pub(crate) fn window(page: PageRequest) -> (i64, i64) {
    let limit = i64::from(page.limit());
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

pub(crate) fn total_from_db(count: i64) -> u64 {
    tally_from_db(count)
}

/// Index `(id, count)` pairs from a `GROUP BY` query.
pub(crate) fn tallies(rows: Vec<(Uuid, i64)>) -> HashMap<Uuid, u64> {
    rows.into_iter()
        .map(|(id, count)| (id, tally_from_db(count)))
        .collect()
}

/// Missing keys mean zero rows matched.
pub(crate) fn tally(counts: &HashMap<Uuid, u64>, id: &Uuid) -> u64 {
    counts.get(id).copied().unwrap_or(0)
}
