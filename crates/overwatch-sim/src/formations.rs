//! Formation geometry.

use overwatch_core::enums::FormationType;
use overwatch_core::geo::normalize_heading;
use overwatch_core::types::GeoPosition;

/// Destination slots for `count` entities arriving at `target` along
/// `approach_heading`. Without a formation everyone gets the target itself.
pub fn formation_positions(
    target: GeoPosition,
    count: usize,
    formation: FormationType,
    approach_heading: f64,
    spacing: f64,
) -> Vec<GeoPosition> {
    if count <= 1 || formation == FormationType::None {
        return vec![target; count];
    }

    let abeam = normalize_heading(approach_heading + 90.0);
    let behind = normalize_heading(approach_heading + 180.0);

    match formation {
        FormationType::Line => {
            let half_width = (count - 1) as f64 * spacing / 2.0;
            (0..count)
                .map(|i| target.moved(abeam, i as f64 * spacing - half_width))
                .collect()
        }
        FormationType::Column => (0..count)
            .map(|i| target.moved(behind, i as f64 * spacing))
            .collect(),
        FormationType::Wedge => (0..count)
            .map(|i| {
                if i == 0 {
                    return target;
                }
                let side = if i % 2 == 1 { 1.0 } else { -1.0 };
                let row = i.div_ceil(2) as f64;
                target
                    .moved(behind, row * spacing)
                    .moved(abeam, side * row * spacing)
            })
            .collect(),
        FormationType::None => vec![target; count],
    }
}

/// V-formation slot for the `index`-th wingman: alternating right and
/// left, one row further back every two wingmen.
pub fn wingman_slot(lead: GeoPosition, lead_heading: f64, index: usize, spacing: f64) -> GeoPosition {
    let side = if index % 2 == 0 { 1.0 } else { -1.0 };
    let row = (index + 1).div_ceil(2) as f64;

    let behind = normalize_heading(lead_heading + 180.0);
    let lateral = normalize_heading(lead_heading + side * 90.0);
    lead.moved(behind, row * spacing * 0.7)
        .moved(lateral, row * spacing * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: GeoPosition = GeoPosition { lat: 25.0, lon: 55.0 };

    #[test]
    fn single_entity_or_none_stacks_on_target() {
        assert_eq!(formation_positions(TARGET, 1, FormationType::Wedge, 0.0, 500.0), vec![TARGET]);
        let stacked = formation_positions(TARGET, 3, FormationType::None, 0.0, 500.0);
        assert!(stacked.iter().all(|p| *p == TARGET));
    }

    #[test]
    fn line_is_centred_on_target() {
        let slots = formation_positions(TARGET, 3, FormationType::Line, 0.0, 1_000.0);
        assert!(slots[1].distance_to(&TARGET) < 1.0);
        assert!((slots[0].distance_to(&slots[2]) - 2_000.0).abs() < 1.0);
    }

    #[test]
    fn column_trails_behind() {
        let slots = formation_positions(TARGET, 3, FormationType::Column, 0.0, 1_000.0);
        assert!(slots[2].lat < slots[1].lat && slots[1].lat < slots[0].lat);
    }

    #[test]
    fn wingman_slots_alternate_sides() {
        let right = wingman_slot(TARGET, 0.0, 0, 1_000.0);
        let left = wingman_slot(TARGET, 0.0, 1, 1_000.0);
        let second_row = wingman_slot(TARGET, 0.0, 2, 1_000.0);
        assert!(right.lon > TARGET.lon && left.lon < TARGET.lon);
        assert!(right.lat < TARGET.lat);
        assert!(second_row.lat < right.lat);
    }
}
