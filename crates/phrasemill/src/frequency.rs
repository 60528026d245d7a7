//! # Corpus Frequency Analysis
//!
//! Streams an encoded-ids corpus and derives per-id loss weights:
//! `weight(id) = total / count(id)`, where `total` includes a synthetic
//! end-of-sequence count of one per corpus line. Rarer ids receive
//! strictly larger weights; the most frequent id's weight is bounded
//! below by 1.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    corpus_io::{create_writer, open_reader, parse_error},
    errors::Result,
    symbols::EOS_ID,
    types::{Count, PMHashMap},
};

/// Per-token-id loss weights derived from corpus frequency.
///
/// Ids absent from the table have no defined weight; reweighting excludes
/// them rather than defaulting them to 1.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeightTable {
    weights: PMHashMap<usize, f64>,
}

impl WeightTable {
    /// Derive weights from raw id counts.
    ///
    /// Zero-count ids (possible only for the seeded EOS counter on an
    /// empty corpus) are excluded rather than divided by.
    pub fn from_counts(counts: &PMHashMap<usize, Count>) -> Self {
        let total: Count = counts.values().sum();
        let weights = counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&id, &count)| (id, total as f64 / count as f64))
            .collect();
        Self { weights }
    }

    /// Return the weight for an id, if defined.
    pub fn get(
        &self,
        id: usize,
    ) -> Option<f64> {
        self.weights.get(&id).copied()
    }

    /// Check whether an id has a defined weight.
    pub fn contains(
        &self,
        id: usize,
    ) -> bool {
        self.weights.contains_key(&id)
    }

    /// The number of ids with defined weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(id, weight)` entries, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.weights.iter().map(|(&id, &weight)| (id, weight))
    }

    /// Save the table as one `<id> <weight>` line per id, ascending by id.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<()> {
        let mut entries: Vec<(usize, f64)> = self.iter().collect();
        entries.sort_by_key(|&(id, _)| id);

        let mut writer = create_writer(path.as_ref())?;
        for (id, weight) in entries {
            writeln!(writer, "{id} {weight}")?;
        }
        Ok(())
    }

    /// Load a table from a `<id> <weight>` per-line file.
    ///
    /// ## Errors
    /// [`crate::errors::PhrasemillError::Parse`] on any malformed line;
    /// the load is fatal for that file, not best-effort.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_reader(path)?;

        let mut weights = PMHashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let (Some(id), Some(weight), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(parse_error(
                    path,
                    idx + 1,
                    "expected exactly two fields: <id> <weight>",
                ));
            };
            let id = id
                .parse::<usize>()
                .map_err(|err| parse_error(path, idx + 1, format!("bad id {id:?}: {err}")))?;
            let weight = weight.parse::<f64>().map_err(|err| {
                parse_error(path, idx + 1, format!("bad weight {weight:?}: {err}"))
            })?;
            weights.insert(id, weight);
        }
        Ok(Self { weights })
    }
}

/// Count id occurrences in an encoded corpus file.
///
/// Every id on every line increments its counter; additionally the
/// [`EOS_ID`] counter is incremented once per line, standing in for the
/// implicit end-of-sequence token that is not persisted in ids files.
pub fn count_ids<P: AsRef<Path>>(ids_path: P) -> Result<PMHashMap<usize, Count>> {
    let path = ids_path.as_ref();
    let reader = open_reader(path)?;

    let mut counts: PMHashMap<usize, Count> = PMHashMap::new();
    counts.insert(EOS_ID, 0);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        *counts.entry(EOS_ID).or_default() += 1;
        for field in line.split_whitespace() {
            let id = field
                .parse::<usize>()
                .map_err(|err| parse_error(path, idx + 1, format!("bad id {field:?}: {err}")))?;
            *counts.entry(id).or_default() += 1;
        }
    }
    Ok(counts)
}

/// Analyze an encoded corpus file into a [`WeightTable`].
pub fn analyze_frequency<P: AsRef<Path>>(ids_path: P) -> Result<WeightTable> {
    Ok(WeightTable::from_counts(&count_ids(ids_path)?))
}

/// Analyze an encoded corpus file and persist the weight table.
pub fn write_weight_file<P, Q>(
    ids_path: P,
    weight_path: Q,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let table = analyze_frequency(ids_path)?;
    log::info!("{} weighted ids", table.len());
    table.save(weight_path)
}
