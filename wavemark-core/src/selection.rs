//! Active-region selection.
//!
//! The selection is a two-state machine over `Option<RegionId>`: empty, or
//! one active region. Clicks toggle; bulk region replacement drops an active
//! id that no longer exists.

use wavemark_types::{Region, RegionId};

/// Slack around a region's bounds when picking the region under the cursor.
pub const AUTO_SELECT_TOLERANCE: f64 = 0.01;

/// Selection after the user clicks `clicked`.
pub fn toggle(active: Option<&RegionId>, clicked: &RegionId) -> Option<RegionId> {
    match active {
        Some(current) if current == clicked => None,
        _ => Some(clicked.clone()),
    }
}

/// `active` if it names a region in `regions`, otherwise nothing.
pub fn retain_valid(active: Option<&RegionId>, regions: &[Region]) -> Option<RegionId> {
    active
        .filter(|id| regions.iter().any(|r| &r.id == *id))
        .cloned()
}

/// Region under the cursor at `time`: among regions containing `time`
/// (widened by [`AUTO_SELECT_TOLERANCE`]) the one whose start is closest.
pub fn region_at(regions: &[Region], time: f64) -> Option<&Region> {
    regions
        .iter()
        .filter(|r| r.contains(time, AUTO_SELECT_TOLERANCE))
        .min_by(|a, b| {
            (a.start - time)
                .abs()
                .total_cmp(&(b.start - time).abs())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RegionId {
        RegionId::new(s)
    }

    #[test]
    fn click_selects_then_deselects() {
        let a = id("a");
        let b = id("b");
        let selected = toggle(None, &a);
        assert_eq!(selected, Some(a.clone()));
        assert_eq!(toggle(selected.as_ref(), &b), Some(b.clone()));
        assert_eq!(toggle(Some(&b), &b), None);
    }

    #[test]
    fn dangling_selection_is_dropped() {
        let regions = vec![Region::new("a", 0.0, 1.0, "0")];
        assert_eq!(retain_valid(Some(&id("a")), &regions), Some(id("a")));
        assert_eq!(retain_valid(Some(&id("gone")), &regions), None);
        assert_eq!(retain_valid(None, &regions), None);
    }

    #[test]
    fn region_at_prefers_closest_start() {
        let regions = vec![
            Region::new("long", 0.0, 10.0, "0"),
            Region::new("short", 4.0, 6.0, "1"),
        ];
        assert_eq!(region_at(&regions, 4.5).map(|r| r.id.as_str()), Some("short"));
        assert_eq!(region_at(&regions, 1.0).map(|r| r.id.as_str()), Some("long"));
        assert_eq!(region_at(&regions, 10.005).map(|r| r.id.as_str()), Some("long"));
        assert!(region_at(&regions, 10.5).is_none());
    }
}
