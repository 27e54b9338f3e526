//! Output records keyed by bar index.
//!
//! Records are appended in bar order and never mutated. With a retention
//! limit the oldest records are dropped, but indices stay absolute: `get(i)`
//! always means bar `i` of the instrument's sequence.

use std::collections::VecDeque;

use crate::domain::SignalRecord;

#[derive(Debug, Clone, Default)]
pub struct RecordArena {
    /// Bar index of `records[0]`.
    first_index: usize,
    records: VecDeque<SignalRecord>,
    retention: Option<usize>,
}

impl RecordArena {
    pub fn new(retention: Option<usize>) -> Self {
        Self {
            first_index: 0,
            records: VecDeque::new(),
            retention,
        }
    }

    /// Append the record for the next bar.
    ///
    /// The first record may start at any bar index; every later record must
    /// carry the next consecutive index.
    pub fn push(&mut self, record: SignalRecord) {
        if self.records.is_empty() {
            self.first_index = record.bar_index;
        } else {
            debug_assert_eq!(
                record.bar_index,
                self.first_index + self.records.len(),
                "records must be appended in consecutive bar order"
            );
        }
        self.records.push_back(record);

        if let Some(limit) = self.retention {
            while self.records.len() > limit {
                self.records.pop_front();
                self.first_index += 1;
            }
        }
    }

    pub fn get(&self, bar_index: usize) -> Option<&SignalRecord> {
        let offset = bar_index.checked_sub(self.first_index)?;
        self.records.get(offset)
    }

    pub fn latest(&self) -> Option<&SignalRecord> {
        self.records.back()
    }

    /// Oldest retained bar index.
    pub fn first_index(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.first_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_vec(self) -> Vec<SignalRecord> {
        self.records.into()
    }
}
