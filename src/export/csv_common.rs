/// Common utilities for CSV export operations
///
/// Every CSV exporter writes a header followed by one record per item.
use csv::Writer;

use crate::errors::ExportResult;

/// Writes `headers` and then one record per item.
///
/// # Example
///
/// ```rust,ignore
/// let csv = export_to_csv(
///     graph.edges.iter(),
///     &["source", "target"],
///     |edge| vec![edge.source.clone(), edge.target.clone()],
/// )?;
/// ```
pub fn export_to_csv<T, F>(
    items: impl IntoIterator<Item = T>,
    headers: &[&str],
    row_fn: F,
) -> ExportResult<String>
where
    F: Fn(T) -> Vec<String>,
{
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(headers)?;

    for item in items {
        let row = row_fn(item);
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner()?;
    Ok(String::from_utf8(data)?)
}

/// Export items to CSV with automatic sorting
///
/// The sort key function should return an owned value (not a reference).
pub fn export_to_csv_sorted<T, K, F, S>(
    items: &[T],
    headers: &[&str],
    sort_key: S,
    row_fn: F,
) -> ExportResult<String>
where
    K: Ord,
    S: Fn(&T) -> K,
    F: Fn(&T) -> Vec<String>,
{
    let mut refs: Vec<_> = items.iter().collect();
    refs.sort_by_key(|item| sort_key(item));
    export_to_csv(refs, headers, row_fn)
}
