use crate::region::RegionDescriptor;

/// Draw order for region shapes: unselected first, selected last.
///
/// Stable partition; relative order inside each group is kept. Later shapes
/// draw on top, so selected outlines are never covered by neighbours.
pub fn reorder(regions: &[RegionDescriptor]) -> Vec<RegionDescriptor> {
    let (unselected, selected): (Vec<_>, Vec<_>) =
        regions.iter().cloned().partition(|r| !r.selected);
    unselected.into_iter().chain(selected).collect()
}

/// In-place variant of [`reorder`].
pub fn reorder_in_place(regions: &mut [RegionDescriptor]) {
    // `sort_by_key` is stable and `false < true`.
    regions.sort_by_key(|r| r.selected);
}

/// True when no selected region precedes an unselected one.
pub fn is_draw_ordered(regions: &[RegionDescriptor]) -> bool {
    regions.windows(2).all(|w| !(w[0].selected && !w[1].selected))
}
