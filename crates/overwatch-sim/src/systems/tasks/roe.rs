//! Rules-of-engagement contact filtering.

use overwatch_core::constants::FREE_AREA_MULTIPLIER;
use overwatch_core::enums::Roe;
use overwatch_core::state::Contact;
use overwatch_core::task::AreaDef;

/// Live contacts a task may engage.
///
/// WEAPONS_HOLD allows nothing. WEAPONS_TIGHT needs an area and allows
/// contacts inside `radius × multiplier` (default 1). WEAPONS_FREE allows
/// contacts inside `radius × multiplier` (default `FREE_AREA_MULTIPLIER`)
/// when an area is given, and every live contact otherwise.
pub fn eligible<'a>(
    contacts: impl IntoIterator<Item = &'a Contact>,
    roe: Roe,
    area: Option<&AreaDef>,
    multiplier: Option<f64>,
) -> Vec<&'a Contact> {
    let inside = |c: &Contact, default: f64| {
        area.is_some_and(|a| a.contains(&c.position, multiplier.unwrap_or(default)))
    };
    contacts
        .into_iter()
        .filter(|c| c.is_live)
        .filter(|c| match roe {
            Roe::WeaponsHold => false,
            Roe::WeaponsTight => inside(c, 1.0),
            Roe::WeaponsFree => area.is_none() || inside(c, FREE_AREA_MULTIPLIER),
        })
        .collect()
}
