//! Region editing operations.
//!
//! Every function takes the current region list and returns an [`Edit`]
//! describing the replacement list, the new active region and, where the
//! operation moves it, the new cursor position. `None` means the operation
//! does not apply (nothing selected, cursor outside the region, ...).

use std::cmp::Ordering;

use wavemark_types::{LabelKey, Region, RegionId};

/// Shortest region an edit may leave behind.
pub const MIN_REGION_LENGTH: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub regions: Vec<Region>,
    pub active: Option<RegionId>,
    /// New cursor position, when the edit moves it.
    pub time: Option<f64>,
}

/// Which bound of the active region a nudge moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Regions in traversal order: by `(start, end)` going forward, by
/// `(end, start)` going backward.
fn traversal_order(regions: &[Region], direction: i8) -> Vec<&Region> {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    if direction > 0 {
        sorted.sort_by(|a, b| cmp_bounds(a.start, a.end, b.start, b.end));
    } else {
        sorted.sort_by(|a, b| cmp_bounds(a.end, a.start, b.end, b.start));
    }
    sorted
}

fn cmp_bounds(a0: f64, a1: f64, b0: f64, b1: f64) -> Ordering {
    a0.total_cmp(&b0).then(a1.total_cmp(&b1))
}

/// Neighbour of `active` one step in `direction`, wrapping around.
fn neighbour<'a>(regions: &'a [Region], active: &RegionId, direction: i8) -> Option<&'a Region> {
    let sorted = traversal_order(regions, direction);
    let index = sorted.iter().position(|r| &r.id == active)?;
    let len = sorted.len() as isize;
    let next = (index as isize + isize::from(direction.signum())).rem_euclid(len);
    sorted.get(next as usize).copied()
}

/// Add `[time, time + length]` with `label` and make it active.
pub fn insert_at(regions: &[Region], time: f64, length: f64, label: LabelKey, id: RegionId) -> Edit {
    let mut next = regions.to_vec();
    next.push(Region {
        id: id.clone(),
        start: time,
        end: time + length.max(MIN_REGION_LENGTH),
        label,
    });
    Edit {
        regions: next,
        active: Some(id),
        time: None,
    }
}

/// Split the active region at `time`. The first half keeps the id; the
/// second half gets `new_id` and becomes active.
pub fn cut_active(
    regions: &[Region],
    active: Option<&RegionId>,
    time: f64,
    new_id: RegionId,
) -> Option<Edit> {
    let active = active?;
    let selected = regions.iter().find(|r| &r.id == active)?;
    if time <= selected.start || time >= selected.end {
        return None;
    }
    let mut next: Vec<Region> = regions.iter().filter(|r| &r.id != active).cloned().collect();
    next.push(Region {
        end: time,
        ..selected.clone()
    });
    next.push(Region {
        id: new_id.clone(),
        start: time,
        ..selected.clone()
    });
    Some(Edit {
        regions: next,
        active: Some(new_id),
        time: None,
    })
}

/// Remove the active region and select its neighbour in `direction`
/// (forward for Delete, backward for Backspace).
pub fn delete_active(regions: &[Region], active: Option<&RegionId>, direction: i8) -> Option<Edit> {
    let active = active?;
    if !regions.iter().any(|r| &r.id == active) {
        return None;
    }
    let next_active = neighbour(regions, active, direction)
        .map(|r| r.id.clone())
        .filter(|id| id != active);
    let remaining: Vec<Region> = regions.iter().filter(|r| &r.id != active).cloned().collect();
    Some(Edit {
        active: if remaining.is_empty() { None } else { next_active },
        regions: remaining,
        time: None,
    })
}

/// Move one bound of the active region by `delta`. Moving the start drags
/// the cursor along; moving the end past the cursor pulls the cursor back
/// one second before the new end. Without an active region the cursor moves.
pub fn nudge(
    regions: &[Region],
    active: Option<&RegionId>,
    time: f64,
    delta: f64,
    edge: Edge,
) -> Edit {
    let target = active.and_then(|id| regions.iter().find(|r| &r.id == id));
    let Some(target) = target else {
        return Edit {
            regions: regions.to_vec(),
            active: active.cloned(),
            time: Some((time + delta).max(0.0)),
        };
    };

    let mut moved = target.clone();
    let cursor = match edge {
        Edge::Start => {
            moved.start = (target.start + delta)
                .min(target.end - MIN_REGION_LENGTH)
                .max(0.0);
            moved.start
        }
        Edge::End => {
            moved.end = (target.end + delta).max(target.start + MIN_REGION_LENGTH);
            if time > moved.end {
                (moved.end - 1.0).max(0.0)
            } else {
                time
            }
        }
    };

    Edit {
        regions: regions
            .iter()
            .map(|r| if r.id == moved.id { moved.clone() } else { r.clone() })
            .collect(),
        active: Some(moved.id.clone()),
        time: Some(cursor),
    }
}

/// Select the next (`direction > 0`) or previous region and move the cursor
/// to its start. With nothing selected, forward picks the first region and
/// backward the last.
pub fn navigate(regions: &[Region], active: Option<&RegionId>, direction: i8) -> Option<Edit> {
    let target = match active.and_then(|id| neighbour(regions, id, direction)) {
        Some(region) => region,
        None => {
            let sorted = traversal_order(regions, direction);
            if direction > 0 {
                *sorted.first()?
            } else {
                *sorted.last()?
            }
        }
    };
    Some(Edit {
        regions: regions.to_vec(),
        active: Some(target.id.clone()),
        time: Some(target.start),
    })
}

/// Give the active region `label`.
pub fn relabel_active(regions: &[Region], active: Option<&RegionId>, label: &LabelKey) -> Option<Edit> {
    let active = active?;
    let selected = regions.iter().find(|r| &r.id == active)?;
    if &selected.label == label {
        return None;
    }
    Some(Edit {
        regions: regions
            .iter()
            .map(|r| {
                if &r.id == active {
                    Region {
                        label: label.clone(),
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect(),
        active: Some(active.clone()),
        time: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RegionId {
        RegionId::new(s)
    }

    fn three() -> Vec<Region> {
        vec![
            Region::new("b", 4.0, 6.0, "0"),
            Region::new("a", 1.0, 3.0, "0"),
            Region::new("c", 7.0, 9.0, "1"),
        ]
    }

    #[test]
    fn insert_selects_new_region() {
        let edit = insert_at(&three(), 2.0, 0.5, LabelKey::new("1"), id("new"));
        assert_eq!(edit.regions.len(), 4);
        assert_eq!(edit.active, Some(id("new")));
        let new = edit.regions.last().unwrap();
        assert_eq!((new.start, new.end), (2.0, 2.5));
        assert_eq!(new.label, LabelKey::new("1"));
    }

    #[test]
    fn cut_splits_active_region() {
        let edit = cut_active(&three(), Some(&id("b")), 5.0, id("b2")).unwrap();
        assert_eq!(edit.active, Some(id("b2")));
        let first = edit.regions.iter().find(|r| r.id == id("b")).unwrap();
        let second = edit.regions.iter().find(|r| r.id == id("b2")).unwrap();
        assert_eq!((first.start, first.end), (4.0, 5.0));
        assert_eq!((second.start, second.end), (5.0, 6.0));
        assert_eq!(second.label, first.label);
    }

    #[test]
    fn cut_outside_region_does_nothing() {
        assert!(cut_active(&three(), Some(&id("b")), 6.5, id("x")).is_none());
        assert!(cut_active(&three(), Some(&id("b")), 4.0, id("x")).is_none());
        assert!(cut_active(&three(), None, 5.0, id("x")).is_none());
    }

    #[test]
    fn delete_selects_neighbour_in_direction() {
        let forward = delete_active(&three(), Some(&id("b")), 1).unwrap();
        assert_eq!(forward.active, Some(id("c")));
        assert_eq!(forward.regions.len(), 2);

        let backward = delete_active(&three(), Some(&id("b")), -1).unwrap();
        assert_eq!(backward.active, Some(id("a")));

        let wrap = delete_active(&three(), Some(&id("c")), 1).unwrap();
        assert_eq!(wrap.active, Some(id("a")));
    }

    #[test]
    fn delete_last_region_clears_selection() {
        let one = vec![Region::new("a", 1.0, 2.0, "0")];
        let edit = delete_active(&one, Some(&id("a")), 1).unwrap();
        assert!(edit.regions.is_empty());
        assert_eq!(edit.active, None);
    }

    #[test]
    fn nudge_start_moves_cursor() {
        let edit = nudge(&three(), Some(&id("a")), 0.0, -0.5, Edge::Start);
        let a = edit.regions.iter().find(|r| r.id == id("a")).unwrap();
        assert_eq!(a.start, 0.5);
        assert_eq!(edit.time, Some(0.5));
    }

    #[test]
    fn nudge_end_pulls_cursor_back() {
        let edit = nudge(&three(), Some(&id("c")), 8.9, -0.5, Edge::End);
        let c = edit.regions.iter().find(|r| r.id == id("c")).unwrap();
        assert_eq!(c.end, 8.5);
        assert_eq!(edit.time, Some(7.5));
    }

    #[test]
    fn nudge_keeps_regions_valid() {
        let edit = nudge(&three(), Some(&id("a")), 0.0, -5.0, Edge::Start);
        let a = edit.regions.iter().find(|r| r.id == id("a")).unwrap();
        assert_eq!(a.start, 0.0);

        let edit = nudge(&three(), Some(&id("a")), 0.0, -5.0, Edge::End);
        let a = edit.regions.iter().find(|r| r.id == id("a")).unwrap();
        assert!(a.end > a.start);
    }

    #[test]
    fn nudge_without_selection_moves_cursor() {
        let edit = nudge(&three(), None, 0.05, -0.1, Edge::Start);
        assert_eq!(edit.time, Some(0.0));
        assert_eq!(edit.regions, three());
    }

    #[test]
    fn navigate_cycles_in_start_order() {
        let regions = three();
        let first = navigate(&regions, None, 1).unwrap();
        assert_eq!(first.active, Some(id("a")));
        assert_eq!(first.time, Some(1.0));
        let second = navigate(&regions, first.active.as_ref(), 1).unwrap();
        assert_eq!(second.active, Some(id("b")));
        let last = navigate(&regions, None, -1).unwrap();
        assert_eq!(last.active, Some(id("c")));
        assert!(navigate(&[], None, 1).is_none());
    }

    #[test]
    fn relabel_changes_only_active_region() {
        let edit = relabel_active(&three(), Some(&id("a")), &LabelKey::new("1")).unwrap();
        assert_eq!(edit.regions.iter().filter(|r| r.label.as_str() == "1").count(), 2);
        assert!(relabel_active(&three(), Some(&id("c")), &LabelKey::new("1")).is_none());
    }
}
