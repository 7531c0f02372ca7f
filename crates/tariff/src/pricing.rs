use crate::kind::{Shift, TariffType, VisitKind};

/// Visits needed for the discount tariff.
pub const DISCOUNT_MIN_VISITS: usize = 4;

/// Projects sum (roubles) needed for the discount tariff.
pub const DISCOUNT_MIN_PROJECTS_SUM: i64 = 60_000;

// Rows follow `VisitKind`, columns follow `Shift::column` (4, 8, night_4, night_8).
const DISCOUNT: [[i64; 4]; 5] = [
    [20_000, 23_000, 27_000, 30_000], // free
    [22_000, 25_000, 27_000, 30_000], // exact
    [25_000, 27_000, 27_000, 30_000], // urgent_tomorrow
    [27_000, 30_000, 27_000, 30_000], // urgent_today
    [35_000, 35_000, 35_000, 35_000], // holiday
];

const STANDARD: [[i64; 4]; 5] = [
    [22_000, 25_000, 35_000, 40_000],
    [25_000, 30_000, 35_000, 40_000],
    [30_000, 35_000, 35_000, 40_000],
    [35_000, 40_000, 35_000, 40_000],
    [40_000, 45_000, 40_000, 45_000],
];

fn row(kind: VisitKind) -> usize {
    match kind {
        VisitKind::Free => 0,
        VisitKind::Exact => 1,
        VisitKind::UrgentTomorrow => 2,
        VisitKind::UrgentToday => 3,
        VisitKind::Holiday => 4,
    }
}

/// Price in roubles for a visit; `discount` selects the discount table.
pub fn price(kind: VisitKind, shift: Shift, discount: bool) -> i64 {
    let table = if discount { &DISCOUNT } else { &STANDARD };
    table[row(kind)][shift.column()]
}

/// Price with an explicitly chosen tariff table.
pub fn price_for(kind: VisitKind, shift: Shift, tariff: TariffType) -> i64 {
    price(kind, shift, tariff.is_discount())
}

/// Whether a customer qualifies for the discount table.
pub fn discount_eligible(visits: usize, projects_sum: i64) -> bool {
    visits >= DISCOUNT_MIN_VISITS || projects_sum >= DISCOUNT_MIN_PROJECTS_SUM
}
