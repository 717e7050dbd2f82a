use crate::workflows::scoring::GrowthCategory;

/// Maps the free-text projected-growth phrasing from the O*NET export onto
/// the fixed ordinal set. Returns `None` for unrecognized text; the importer
/// decides whether that is an error or an absence.
pub(crate) fn normalize_growth(value: &str) -> Option<GrowthCategory> {
    let lowered = value.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return None;
    }

    // "much faster" must be checked before "faster", and both before
    // "average", because the longer phrases contain the shorter ones.
    let category = if lowered.starts_with("much faster") {
        GrowthCategory::MuchFasterThanAverage
    } else if lowered.starts_with("faster") {
        GrowthCategory::FasterThanAverage
    } else if lowered.starts_with("slower") {
        GrowthCategory::SlowerThanAverage
    } else if lowered.starts_with("little or no change") {
        GrowthCategory::LittleOrNoChange
    } else if lowered.starts_with("decline") {
        GrowthCategory::Decline
    } else if lowered.starts_with("average") {
        GrowthCategory::Average
    } else {
        return None;
    };

    Some(category)
}
