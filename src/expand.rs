use std::collections::HashMap;

use crate::error::PfSplitError;
use crate::pf::Record;
use crate::tables::DuplicateGroup;

// Recreates the ORF records an upstream deduplication pass deleted. Each
// clone takes the duplicate's identifier as both ID and NAME. Lookups resolve
// against the pre-expansion record set only; clones are accumulated on the
// side and appended in one pass.
pub fn reinsert_duplicates(
    mut records: Vec<Record>,
    groups: &[DuplicateGroup],
) -> Result<Vec<Record>, PfSplitError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        index.entry(record.orf_id.as_str()).or_insert(idx);
    }

    let mut clones = Vec::new();
    for group in groups {
        let intact_idx = *index.get(group.intact.as_str()).ok_or_else(|| {
            PfSplitError::MissingIntactOrf(group.intact.as_str().to_string())
        })?;
        let intact = &records[intact_idx];
        for duplicate in &group.duplicates {
            let mut clone = intact.clone();
            clone.orf_id = duplicate.clone();
            clone.name = Some(duplicate.as_str().to_string());
            clones.push(clone);
        }
    }

    records.extend(clones);
    Ok(records)
}
