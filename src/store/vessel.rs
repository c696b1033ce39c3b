//! Distinct vessels of a store.

use std::collections::hash_set::{self, HashSet};

use super::errors::StoreResult;
use super::record_set::RecordSet;
use crate::observability::ObservationScope;
use crate::record::{Record, RecordError, RecordResult};
use crate::schema::{MMSI, VESSEL_NAME};

/// Name given to every vessel of a store without a `VesselName` column.
pub const NO_VESSEL_NAME: &str = "no VesselName header";

/// A vessel as identified by its reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vessel {
    pub mmsi: String,
    pub vessel_name: String,
}

impl Vessel {
    pub fn new(mmsi: impl Into<String>, vessel_name: impl Into<String>) -> Self {
        Self {
            mmsi: mmsi.into(),
            vessel_name: vessel_name.into(),
        }
    }
}

/// Set of distinct vessels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VesselSet(HashSet<Vessel>);

impl VesselSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `vessel`; false when it was already present.
    pub fn insert(&mut self, vessel: Vessel) -> bool {
        self.0.insert(vessel)
    }

    pub fn contains(&self, vessel: &Vessel) -> bool {
        self.0.contains(vessel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Vessel> {
        self.0.iter()
    }

    /// Vessels ordered by MMSI, then name.
    pub fn sorted(&self) -> Vec<&Vessel> {
        let mut v: Vec<_> = self.0.iter().collect();
        v.sort();
        v
    }
}

impl FromIterator<Vessel> for VesselSet {
    fn from_iter<I: IntoIterator<Item = Vessel>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VesselSet {
    type Item = Vessel;
    type IntoIter = hash_set::IntoIter<Vessel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn field(rec: &Record, index: usize) -> RecordResult<&str> {
    rec.get(index)
        .ok_or_else(|| RecordError::index_out_of_range(index, rec.len()))
}

impl RecordSet {
    /// Distinct `(MMSI, VesselName)` pairs among the remaining records.
    ///
    /// The store reads back the same records afterwards.
    pub fn unique_vessels(&mut self) -> StoreResult<VesselSet> {
        let mmsi_index = self.headers().require("unique vessels", MMSI)?;
        let name_index = self.headers().contains(VESSEL_NAME);

        let scope = ObservationScope::new("UNIQUE_VESSELS");
        let mut vessels = VesselSet::new();

        let scanned = self.scan_echoed(|rec| {
            let mmsi = field(rec, mmsi_index)?;
            let name = match name_index {
                Some(i) => field(rec, i)?,
                None => NO_VESSEL_NAME,
            };
            vessels.insert(Vessel::new(mmsi, name));
            Ok(())
        });

        match scanned {
            Ok(n) => {
                scope.complete_with_fields(&[
                    ("scanned", &n.to_string()),
                    ("vessels", &vessels.len().to_string()),
                ]);
                Ok(vessels)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }
}
