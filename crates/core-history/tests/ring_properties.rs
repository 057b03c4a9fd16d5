use core_events::Direction;
use core_history::{HistoryRing, Snapshot, Status};
use proptest::prelude::*;

fn snap(cmd: &str) -> Snapshot {
    Snapshot::new("def", cmd, Status::Success, "", "", "/srv")
}

proptest! {
    #[test]
    fn entries_stay_unique(cmds in proptest::collection::vec("[a-c]{1,2}", 0..40)) {
        let mut ring = HistoryRing::with_capacity(16);
        for c in &cmds {
            ring.add(snap(c));
        }
        let all: Vec<&Snapshot> = ring.iter().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
        prop_assert!(ring.len() <= 16);
        if let Some(last) = cmds.last() {
            prop_assert_eq!(ring.last().map(|s| s.command.as_str()), Some(last.as_str()));
        }
    }

    #[test]
    fn full_revolution_returns_to_start(n in 1usize..10) {
        let mut ring = HistoryRing::new();
        for i in 0..n {
            ring.add(snap(&format!("cmd{i}")));
        }
        let start = ring.index();
        for _ in 0..n {
            prop_assert!(ring.step(Direction::Backward).is_some());
        }
        prop_assert_eq!(ring.index(), start);
    }
}

#[test]
fn adding_same_snapshot_twice_keeps_length() {
    let mut ring = HistoryRing::new();
    ring.add(snap("ls"));
    ring.add(snap("cd /"));
    ring.add(snap("cd /"));
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.last().map(|s| s.command.as_str()), Some("cd /"));
}
