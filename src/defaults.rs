//! Demo plan used when no stored plan exists.

use crate::models::{
    Catalog, Category, CategoryFilter, Channel, Operation, OperationId, PlanViewMode,
    PlannerState, SlotList, Spindle, SpindleFilter, ViewState,
};

use crate::models::Category::{Aussen, Axial, Innen, Radial};
use crate::models::Spindle::{Sp3, Sp4};

/// (id number, code, title, spindle, category, doppelhalter)
const DEMO_OPERATIONS: &[(u64, &str, &str, Spindle, Category, bool)] = &[
    (1, "L1101", "Planen / Vordrehen", Sp4, Aussen, false),
    (2, "L1103", "Bohren / Ausdrehen Ø20 Ø27 Ø32", Sp4, Innen, false),
    (3, "L1102", "Außen Schlichten", Sp4, Aussen, false),
    (4, "L1113", "I–Gewinde M26×1", Sp4, Innen, false),
    (5, "L1105", "Lochkreis Bohren Radial Ø5", Sp4, Radial, false),
    (6, "L0106", "A–Nut Stechen Ø43", Sp3, Radial, false),
    (7, "L0107", "Lochkreis Entgr. mit Senker Ø6", Sp3, Radial, false),
    (8, "L1108", "6–Kant fräsen", Sp4, Aussen, false),
    (9, "L1112", "I–Nut 2×Ø17.9 FertigStechen", Sp4, Innen, false),
    (10, "L1117", "Y-Abstechen", Sp4, Axial, false),
    (11, "L2101", "A– Planen / Vordrehen", Sp3, Aussen, false),
    (12, "L2102", "A– Schlichten", Sp3, Aussen, false),
    (13, "L2103", "I– Freistich Ø16 stechen", Sp3, Innen, false),
    (14, "L1110", "I– Bohrung Ø13 – Fertig drehen", Sp4, Innen, false),
    (15, "L2116", "I– Bohrungen Ø5 Bürsten", Sp4, Innen, true),
    (16, "L2107", "A–Gewinde M40 × 1.5", Sp3, Aussen, true),
    (17, "L0207", "A– Gew – Entgraten / Fräsen", Sp4, Aussen, false),
    (18, "L2105", "A– Bohrungen Ø5 Bürsten", Sp3, Aussen, false),
    (19, "L2115", "A– Gew. Gang Wegfräsen", Sp4, Aussen, true),
    (20, "L2108", "A– Gew. Gang Wegfräsen", Sp3, Aussen, true),
    (21, "L2104", "I– Bohren Ø12.5", Sp4, Innen, false),
    (22, "L2106", "A_Gewinde_M40×2", Sp4, Aussen, true),
    (25, "L1109", "Bohrungen Ø20 Ø27 Ø32 FertigDrehen", Sp4, Innen, false),
    (26, "L1104", "N_O_P", Sp4, Innen, false),
    (27, "L1106", "N_O_P", Sp4, Aussen, false),
    (28, "L1107", "Nute 2xd43 Stechen", Sp4, Aussen, false),
    (30, "L1113", "N_O_P", Sp4, Aussen, false),
    (31, "L1114", "N_O_P", Sp4, Aussen, false),
    (32, "L2109", "N_O_P", Sp3, Aussen, false),
    (33, "L2110", "N_O_P", Sp3, Aussen, false),
    (34, "L2111", "N_O_P", Sp3, Aussen, false),
    (35, "L2112", "N_O_P", Sp3, Aussen, false),
    (36, "L1111", "I-Nut 2xØ17.9 Vorstechen", Sp4, Innen, false),
    (37, "L2114", "Senker_Lochkreis_Ø5_Entgraten", Sp4, Radial, false),
];

const DEMO_SLOTS_ONE: &[Option<u64>] = &[
    Some(1), Some(3), Some(2), Some(26), Some(28), Some(27), Some(5), Some(8), Some(25),
    Some(14), Some(36), Some(9), Some(4), Some(30), Some(31), Some(27), Some(10),
];

const DEMO_SLOTS_TWO: &[Option<u64>] = &[
    Some(11), Some(12), Some(13), Some(21), Some(18), Some(22), Some(16), Some(20), Some(32),
    Some(33), Some(34), Some(35), None, Some(37), Some(19), Some(15), None,
];

const DEMO_NEXT_OP_ID: u64 = 38;

fn demo_slots(entries: &[Option<u64>]) -> SlotList {
    SlotList::from_entries(
        entries
            .iter()
            .map(|e| e.map(OperationId::sequential))
            .collect(),
    )
}

/// The demo catalog and slot plan.
pub fn demo_state() -> PlannerState {
    let library = DEMO_OPERATIONS
        .iter()
        .map(|&(n, code, title, spindle, category, doppelhalter)| {
            Operation::new(OperationId::sequential(n), code, title)
                .with_spindle(spindle)
                .with_category(category)
                .with_doppelhalter(doppelhalter)
        })
        .collect();

    PlannerState::new()
        .with_library(Catalog::from_operations(library))
        .with_slots(Channel::One, demo_slots(DEMO_SLOTS_ONE))
        .with_slots(Channel::Two, demo_slots(DEMO_SLOTS_TWO))
        .with_next_op_id(DEMO_NEXT_OP_ID)
        .with_view(ViewState {
            current_channel: Channel::Two,
            active_category: CategoryFilter::Only(Aussen),
            spindle_filter: SpindleFilter::Only(Sp4),
            plan_view_mode: PlanViewMode::ProgramTable,
            library_collapsed: false,
        })
}
