use crate::db::core::Chip;
use crate::db::description::ExternalPort;
use crate::db::droplet::Droplet;
use crate::db::indices::PinId;
use crate::db::resources::{Actuation, ActuationVector, Detector, Pin};
use crate::geom::point::Point;
use crate::util::config::ValidationConfig;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Diagnostics of a validation pass. Hard errors mean the model itself is
/// broken (e.g. a route leaves the grid); plain errors are constraint
/// violations to be shown to the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub hard_errors: Vec<String>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.hard_errors.is_empty()
    }

    pub fn total(&self) -> usize {
        self.errors.len() + self.hard_errors.len()
    }
}

/// Runs every check that only needs the assembled chip. Never fails; all
/// findings end up in the returned diagnostics.
pub fn run(chip: &Chip, config: &ValidationConfig) -> Diagnostics {
    log::info!("Starting Chip Verification");
    let mut diag = Diagnostics::default();

    report(
        "Droplet routes only move between neighbouring cells",
        check_paths_for_jumps(chip.droplets()),
        &mut diag.errors,
    );
    report(
        "All route positions lie on the grid",
        check_paths_for_positions(chip),
        &mut diag.hard_errors,
    );
    report(
        "No droplet enters an active blockage",
        check_path_for_blockages(chip),
        &mut diag.errors,
    );
    report(
        "Every cell has at most one pin",
        check_multiple_pin_assignments(chip.pins.values()),
        &mut diag.errors,
    );
    report(
        "Actuation vectors have consistent lengths",
        check_actuation_vector_lengths(&chip.cell_actuations, &chip.pin_actuations),
        &mut diag.errors,
    );
    report(
        "No cell is driven by both a pin and a cell actuation",
        check_pin_cell_ambiguity(chip),
        &mut diag.errors,
    );
    if config.strong_compatibility {
        report(
            "Cell and pin actuations are strongly compatible",
            check_cell_pin_actuation_compatibility(chip, true),
            &mut diag.errors,
        );
    }
    if config.weak_compatibility {
        report(
            "Cell and pin actuations are weakly compatible",
            check_cell_pin_actuation_compatibility(chip, false),
            &mut diag.errors,
        );
    }

    if diag.is_empty() {
        log::info!("\x1b[32mSUCCESS\x1b[0m: VALID CHIP");
    } else {
        log::error!(
            "\x1b[31mFAILURE\x1b[0m: INVALID CHIP ({} Errors)",
            diag.total()
        );
    }
    diag
}

fn report(what: &str, found: Vec<String>, sink: &mut Vec<String>) {
    if found.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: {}", what);
    } else {
        log::error!("\x1b[31mFAIL\x1b[0m: {} ({} problems)", what, found.len());
        for msg in &found {
            log::error!("{}", msg);
        }
        sink.extend(found);
    }
}

/// Every consecutive pair of route points must be reachable within one
/// step (4-connected). A droplet without any route is reported as well.
pub fn check_paths_for_jumps<'a>(drops: impl IntoIterator<Item = &'a Droplet>) -> Vec<String> {
    let mut errors = Vec::new();

    for drop in drops {
        let points = drop.positions();
        if points.is_empty() {
            errors.push(format!("Droplet {} has no route attached to it!", drop.id));
            continue;
        }

        for pair in points.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if !Point::reachable(prev, curr) {
                errors.push(format!(
                    "Droplet {}: Jump in route from {} to {}!",
                    drop.id, prev, curr
                ));
            }
        }
    }
    errors
}

pub fn check_paths_for_positions(chip: &Chip) -> Vec<String> {
    let mut errors = Vec::new();
    for drop in chip.droplets() {
        for &pos in drop.positions() {
            if !chip.has_field_at(pos) {
                errors.push(format!(
                    "Droplet {}: position {} of route not on grid!",
                    drop.id, pos
                ));
            }
        }
    }
    errors
}

pub fn check_path_for_blockages(chip: &Chip) -> Vec<String> {
    let mut errors = Vec::new();
    for drop in chip.droplets() {
        for (i, &pos) in drop.positions().iter().enumerate() {
            let t = drop.spawn_time() + i as u32;
            if let Ok(field) = chip.field_at(pos)
                && field.is_blocked(t)
            {
                errors.push(format!(
                    "Droplet {} moves into blockage at {} in time step {}",
                    drop.id, pos, t
                ));
            }
        }
    }
    errors
}

/// Also fires when the same pin lists a cell twice.
pub fn check_multiple_pin_assignments<'a>(pins: impl IntoIterator<Item = &'a Pin>) -> Vec<String> {
    let mut counts: BTreeMap<Point, usize> = BTreeMap::new();
    for pin in pins {
        for &cell in &pin.cells {
            *counts.entry(cell).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(cell, count)| format!("Cell {} has multiple pins assigned: {}", cell, count))
        .collect()
}

pub fn check_actuation_vector_lengths(
    cell_actuations: &HashMap<Point, ActuationVector>,
    pin_actuations: &HashMap<PinId, ActuationVector>,
) -> Vec<String> {
    let mut errors = Vec::new();

    let cell_lens: HashSet<usize> = cell_actuations.values().map(ActuationVector::len).collect();
    let pin_lens: HashSet<usize> = pin_actuations.values().map(ActuationVector::len).collect();

    if cell_lens.len() > 1 {
        errors.push("Different lengths in cell actuations".to_string());
    }
    if pin_lens.len() > 1 {
        errors.push("Different lengths in pin actuations".to_string());
    }
    if !cell_lens.is_empty() && !pin_lens.is_empty() && cell_lens != pin_lens {
        errors.push("Different lengths between cell and pin actuations".to_string());
    }
    errors
}

/// A cell with a pin that has its own actuation vector, and an individual
/// cell vector on top, is ambiguous. The resolver lets the pin win.
pub fn check_pin_cell_ambiguity(chip: &Chip) -> Vec<String> {
    let mut found: Vec<(Point, PinId)> = chip
        .fields()
        .filter(|f| f.cell_actuation().is_some())
        .filter_map(|f| f.pin.map(|pin| (f.pos(), pin)))
        .filter(|(_, pin)| chip.pin_actuations.contains_key(pin))
        .collect();
    found.sort();

    found
        .into_iter()
        .map(|(pos, pin)| {
            format!(
                "Cell {} has both pin {} actuations and cell actuations; the pin actuation is used",
                pos, pin
            )
        })
        .collect()
}

/// In strong mode every entry has to match exactly; in weak mode a
/// don't-care matches anything. Vectors of different lengths are left to
/// [`check_actuation_vector_lengths`].
pub fn check_cell_pin_actuation_compatibility(chip: &Chip, strong: bool) -> Vec<String> {
    let mut cells: Vec<(Point, PinId, &ActuationVector)> = chip
        .fields()
        .filter_map(|f| Some((f.pos(), f.pin?, f.actuation.as_ref()?)))
        .collect();
    cells.sort_by_key(|&(pos, pin, _)| (pos, pin));

    let mut errors = Vec::new();
    for (pos, pin, cell_vec) in cells {
        let Some(pin_vec) = chip.pin_actuations.get(&pin) else {
            continue;
        };
        if !compatible(pin_vec, cell_vec, strong) {
            errors.push(format!(
                "Cell and pin actuations for field at {} and pin {} are not {} compatible.",
                pos,
                pin,
                if strong { "strongly" } else { "weakly" }
            ));
        }
    }
    errors
}

fn compatible(v1: &ActuationVector, v2: &ActuationVector, strong: bool) -> bool {
    if v1.len() != v2.len() {
        return true;
    }
    v1.iter().zip(v2.iter()).all(|(a, b)| {
        a == b || (!strong && (a == Actuation::DontCare || b == Actuation::DontCare))
    })
}

/// A port's chip cell must exist, while the port itself must sit outside the
/// chip. Offending ports are reported and, if `remove` is set, dropped from
/// `items`.
pub fn check_external_ports<T>(
    chip: &Chip,
    kind: &str,
    items: &mut Vec<T>,
    port_of: impl Fn(&T) -> ExternalPort,
    remove: bool,
) -> Vec<String> {
    let mut errors = Vec::new();
    items.retain(|item| {
        let port = port_of(item);
        let mut msg = String::new();
        if !chip.has_field_at(port.grid_position) {
            msg.push_str(&format!(
                "{} target {} does not exist!",
                kind, port.grid_position
            ));
        }
        if chip.has_field_at(port.port_position()) {
            msg.push_str(&format!(
                "{} source {} is within the chip!",
                kind,
                port.port_position()
            ));
        }
        if msg.is_empty() {
            return true;
        }
        if remove {
            msg.push_str(" Removed invalid resource.");
        }
        errors.push(msg);
        !remove
    });
    errors
}

/// Drops detectors that cover cells missing from the chip.
pub fn check_for_positions(chip: &Chip, kind: &str, detectors: &mut Vec<Detector>) -> Vec<String> {
    let mut errors = Vec::new();
    detectors.retain(|det| {
        if chip.all_present(&det.position.positions()) {
            true
        } else {
            errors.push(format!(
                "Cannot place {} at position {}! Some positions do not exist on the chip.",
                kind, det.position
            ));
            false
        }
    });
    errors
}

/// Drops detectors whose cells already carry a resource, either on the chip
/// or claimed by an earlier entry of `detectors`.
pub fn check_for_resources(chip: &Chip, kind: &str, detectors: &mut Vec<Detector>) -> Vec<String> {
    let mut errors = Vec::new();
    let mut claimed: HashSet<Point> = HashSet::new();
    detectors.retain(|det| {
        let cells = det.position.positions();
        if chip.has_resource(&cells) || cells.iter().any(|p| claimed.contains(p)) {
            errors.push(format!(
                "Cannot place {} at position {}! Another resource is already present",
                kind, det.position
            ));
            false
        } else {
            claimed.extend(cells);
            true
        }
    });
    errors
}
