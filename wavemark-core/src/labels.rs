//! Label registry: key allocation, color assignment and the label list view.

use serde::{Deserialize, Serialize};

use wavemark_types::{ColorMap, LabelKey, LabelSet, Region};

pub const DEFAULT_PALETTE: [&str; 8] = [
    "#ffd700", "#00ffff", "#ff00ff", "#00ff00", "#9932cc", "#00bfff", "#ff7f50", "#66cdaa",
];

/// Colors handed out to new label keys, in order, wrapping around.
#[derive(Debug, Clone)]
pub struct ColorPool {
    palette: Vec<String>,
    next: usize,
}

impl ColorPool {
    pub fn new(palette: Vec<String>) -> Self {
        Self { palette, next: 0 }
    }

    pub fn next_color(&mut self) -> Option<String> {
        if self.palette.is_empty() {
            return None;
        }
        let color = self.palette[self.next % self.palette.len()].clone();
        self.next = self.next.wrapping_add(1);
        Some(color)
    }
}

/// Colors after `labels` changed: empty when no labels remain, otherwise the
/// existing colors plus one pool color per key that has none yet.
pub fn assign_colors(labels: &LabelSet, colors: &ColorMap, pool: &mut ColorPool) -> ColorMap {
    if labels.is_empty() {
        return ColorMap::new();
    }
    let mut next = colors.clone();
    for key in labels.keys() {
        if next.contains_key(key) {
            continue;
        }
        if let Some(color) = pool.next_color() {
            next.insert(key.clone(), color);
        }
    }
    next
}

/// Keys used by `regions` that `labels` does not know.
pub fn missing_labels(regions: &[Region], labels: &LabelSet) -> Vec<LabelKey> {
    let mut missing: Vec<LabelKey> = regions
        .iter()
        .filter(|r| !r.label.is_empty() && !labels.contains_key(&r.label))
        .map(|r| r.label.clone())
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

/// `labels` with every missing key registered under its own name.
pub fn register_missing(regions: &[Region], labels: &LabelSet) -> Option<LabelSet> {
    let missing = missing_labels(regions, labels);
    if missing.is_empty() {
        return None;
    }
    let mut next = labels.clone();
    for key in missing {
        log::debug!(target: "labels", "registering unknown label {:?}", key.as_str());
        next.insert(key.clone(), key.to_string());
    }
    Some(next)
}

/// Key names in allocation order: `a`..`z`, `aa`, `ab`, ..
fn key_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'a' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// First key in allocation order not yet used by `labels`.
pub fn next_label_key(labels: &LabelSet) -> LabelKey {
    (0..)
        .map(|i| LabelKey::new(key_name(i)))
        .find(|key| !labels.contains_key(key))
        .unwrap_or_default()
}

/// Key of the label whose display text is `text`.
pub fn key_for_text<'a>(labels: &'a LabelSet, text: &str) -> Option<&'a LabelKey> {
    labels.iter().find(|(_, t)| t.as_str() == text).map(|(k, _)| k)
}

/// One row of the label list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub key: LabelKey,
    pub text: String,
    pub color: Option<String>,
    /// The active label, used for new regions.
    pub current: bool,
}

pub fn entries(labels: &LabelSet, colors: &ColorMap, active: Option<&LabelKey>) -> Vec<LabelEntry> {
    labels
        .iter()
        .map(|(key, text)| LabelEntry {
            key: key.clone(),
            text: text.clone(),
            color: colors.get(key).cloned(),
            current: active == Some(key),
        })
        .collect()
}
