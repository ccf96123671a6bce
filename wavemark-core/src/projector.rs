//! Overlap and visibility projection.
//!
//! `project` maps the current regions, active selection, colors, label texts
//! and overlap metadata to one [`RegionStyle`] per region. It is pure:
//! projecting the same input twice yields the same styles, so the widget can
//! re-run it after any relevant change.

use std::collections::BTreeMap;

use wavemark_types::{ColorMap, LabelSet, LabelTag, OverlapMap, Region, RegionId, RegionStyle};

use crate::engine::RegionGeometry;

/// Everything the projector reads.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub regions: &'a [Region],
    pub active: Option<&'a RegionId>,
    pub colors: &'a ColorMap,
    pub labels: &'a LabelSet,
    pub overlap: &'a OverlapMap,
    /// Present when label tags are enabled.
    pub tags: Option<TagPolicy<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TagPolicy<'a> {
    /// Hide a tag wider than this fraction of its region.
    pub max_ratio: f64,
    pub geometry: &'a BTreeMap<RegionId, RegionGeometry>,
}

/// Display text of a region's label; the key itself when the label is unknown.
pub fn tag_text(region: &Region, labels: &LabelSet) -> String {
    match labels.get(&region.label) {
        Some(text) => text.clone(),
        None => {
            log::trace!(target: "projector", "no label text for {:?}", region.label.as_str());
            region.label.to_string()
        }
    }
}

/// Whether a tag fits inside its region. Unmeasured regions show the tag.
pub fn tag_fits(geometry: Option<&RegionGeometry>, max_ratio: f64) -> bool {
    match geometry {
        Some(g) => g.tag_width <= max_ratio * g.region_width,
        None => true,
    }
}

pub fn project(input: &ProjectionInput<'_>) -> Vec<(RegionId, RegionStyle)> {
    input
        .regions
        .iter()
        .map(|region| (region.id.clone(), style_for(input, region)))
        .collect()
}

fn style_for(input: &ProjectionInput<'_>, region: &Region) -> RegionStyle {
    let color = input.colors.get(&region.label).cloned();
    if color.is_none() {
        log::trace!(target: "projector", "no color for label {:?}", region.label.as_str());
    }
    let tag = input.tags.map(|policy| LabelTag {
        text: tag_text(region, input.labels),
        visible: tag_fits(policy.geometry.get(&region.id), policy.max_ratio),
    });
    RegionStyle {
        active: input.active == Some(&region.id),
        color,
        overlap_class: input.overlap.get(&region.id).map(|tier| tier.class_name()),
        tag,
    }
}

#[cfg(test)]
mod tests {
    use wavemark_types::{LabelKey, OverlapTier};

    use super::*;

    struct Fixture {
        regions: Vec<Region>,
        colors: ColorMap,
        labels: LabelSet,
        overlap: OverlapMap,
        geometry: BTreeMap<RegionId, RegionGeometry>,
    }

    fn fixture() -> Fixture {
        let mut colors = ColorMap::new();
        colors.insert(LabelKey::new("0"), "#ffd700".to_string());
        let mut labels = LabelSet::new();
        labels.insert(LabelKey::new("0"), "speaker A".to_string());
        let mut overlap = OverlapMap::new();
        overlap.insert(RegionId::new("b"), OverlapTier::new(1, 2));
        Fixture {
            regions: vec![
                Region::new("a", 0.0, 2.0, "0"),
                Region::new("b", 1.0, 3.0, "9"),
            ],
            colors,
            labels,
            overlap,
            geometry: BTreeMap::new(),
        }
    }

    fn input<'a>(f: &'a Fixture, active: Option<&'a RegionId>) -> ProjectionInput<'a> {
        ProjectionInput {
            regions: &f.regions,
            active,
            colors: &f.colors,
            labels: &f.labels,
            overlap: &f.overlap,
            tags: Some(TagPolicy {
                max_ratio: 0.9,
                geometry: &f.geometry,
            }),
        }
    }

    #[test]
    fn styles_follow_state() {
        let f = fixture();
        let active = RegionId::new("a");
        let styles = project(&input(&f, Some(&active)));
        let (_, a) = &styles[0];
        let (_, b) = &styles[1];
        assert!(a.active);
        assert!(!b.active);
        assert_eq!(a.color.as_deref(), Some("#ffd700"));
        assert_eq!(b.color, None);
        assert_eq!(a.overlap_class, None);
        assert_eq!(b.overlap_class.as_deref(), Some("overlap-1-2"));
        assert_eq!(a.tag.as_ref().map(|t| t.text.as_str()), Some("speaker A"));
        assert_eq!(b.tag.as_ref().map(|t| t.text.as_str()), Some("9"));
    }

    #[test]
    fn projection_is_idempotent() {
        let f = fixture();
        let first = project(&input(&f, None));
        let second = project(&input(&f, None));
        assert_eq!(first, second);
    }

    #[test]
    fn wide_tags_are_hidden() {
        let mut f = fixture();
        f.geometry.insert(
            RegionId::new("a"),
            RegionGeometry {
                region_width: 100.0,
                tag_width: 91.0,
            },
        );
        f.geometry.insert(
            RegionId::new("b"),
            RegionGeometry {
                region_width: 100.0,
                tag_width: 90.0,
            },
        );
        let styles = project(&input(&f, None));
        assert_eq!(styles[0].1.tag.as_ref().map(|t| t.visible), Some(false));
        assert_eq!(styles[1].1.tag.as_ref().map(|t| t.visible), Some(true));
    }

    #[test]
    fn tags_absent_when_disabled() {
        let f = fixture();
        let mut input = input(&f, None);
        input.tags = None;
        assert!(project(&input).iter().all(|(_, s)| s.tag.is_none()));
    }
}
