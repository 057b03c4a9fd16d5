//! Command history: snapshots of completed commands kept in a bounded,
//! de-duplicated ring that supports substring-filtered circular stepping.

mod ring;
mod snapshot;

pub use ring::{HISTORY_CAPACITY_DEFAULT, HistoryRing};
pub use snapshot::{Snapshot, Status};
