//! Conversion between the engine's region list and canonical state regions.

use wavemark_types::{EngineRegion, Region};

use crate::engine::WaveformEngine;

/// Read every engine region. Regions without a label attribute get the
/// empty label key.
pub fn pull<E: WaveformEngine + ?Sized>(engine: &E) -> Vec<Region> {
    engine
        .regions()
        .into_iter()
        .map(|r| Region {
            label: r.label().unwrap_or_default(),
            id: r.id,
            start: r.start,
            end: r.end,
        })
        .collect()
}

/// Replace every engine region with `regions`.
pub fn push<E: WaveformEngine + ?Sized>(engine: &mut E, regions: &[Region]) {
    engine.clear_regions();
    for region in regions {
        engine.add_region(EngineRegion::from(region));
    }
}

#[cfg(test)]
mod tests {
    use wavemark_types::{regions_equivalent, LabelKey};

    use super::*;
    use crate::engine::HeadlessEngine;

    #[test]
    fn pull_after_push_is_equivalent() {
        let regions = vec![
            Region::new("a", 0.5, 2.0, "0"),
            Region::new("b", 1.5, 4.25, "speaker"),
            Region::new("c", 7.0, 7.5, ""),
        ];
        let mut engine = HeadlessEngine::new();
        engine.add_region(EngineRegion::new("stale", 0.0, 1.0));
        push(&mut engine, &regions);
        assert!(regions_equivalent(&pull(&engine), &regions));
    }

    #[test]
    fn missing_label_attribute_pulls_empty_key() {
        let mut engine = HeadlessEngine::new();
        engine.add_region(EngineRegion::new("a", 1.0, 2.0));
        let pulled = pull(&engine);
        assert_eq!(pulled[0].label, LabelKey::default());
    }
}
