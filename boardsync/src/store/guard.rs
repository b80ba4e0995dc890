//! Per-list tickets serializing structural mutations
//!
//! Two overlapping structural commands on the same list would capture
//! rollback snapshots of each other's unconfirmed state, so a reorder, move
//! or delete must hold a ticket for every list it touches from before its
//! optimistic mutation until its remote call settles. A second acquire on a
//! held list fails fast instead of queueing.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::{Result, SyncError};
use crate::types::ListId;

/// Registry of lists with a structural mutation in flight
#[derive(Debug, Default)]
pub(crate) struct MutationGuards {
    held: Mutex<HashSet<ListId>>,
}

impl MutationGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire tickets for every listed id, or fail with `MutationInFlight`
    ///
    /// Duplicate ids are collapsed, so a move where origin and destination
    /// coincide acquires a single ticket.
    pub fn acquire<'a>(&'a self, lists: &[ListId]) -> Result<GuardTicket<'a>> {
        let mut held = self.held.lock().unwrap();
        let mut acquired = Vec::new();

        for &id in lists {
            if acquired.contains(&id) {
                continue;
            }
            if !held.insert(id) {
                for taken in &acquired {
                    held.remove(taken);
                }
                return Err(SyncError::MutationInFlight { list: id });
            }
            acquired.push(id);
        }

        Ok(GuardTicket {
            guards: self,
            lists: acquired,
        })
    }
}

/// RAII ticket; dropping it releases every held list
#[derive(Debug)]
pub(crate) struct GuardTicket<'a> {
    guards: &'a MutationGuards,
    lists: Vec<ListId>,
}

impl Drop for GuardTicket<'_> {
    fn drop(&mut self) {
        let mut held = self.guards.held.lock().unwrap();
        for id in &self.lists {
            held.remove(id);
        }
    }
}
