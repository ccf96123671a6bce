use serde::{Deserialize, Serialize};

/// Visual classification of one engine region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStyle {
    /// Highlighted as the active region.
    pub active: bool,
    /// Background color. `None` leaves whatever color the engine already shows.
    pub color: Option<String>,
    /// Overlap tier class such as `overlap-1-2`; `None` removes any tier class.
    pub overlap_class: Option<String>,
    /// Label tag, present only when label tags are enabled.
    pub tag: Option<LabelTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTag {
    pub text: String,
    pub visible: bool,
}
