use crate::adjacency::adjacent_activations;
use crate::usage::compute_cell_usage;
use dmfb_common::db::core::Chip;
use dmfb_common::db::description::ChipDescription;
use dmfb_common::db::field::Field;
use dmfb_common::db::indices::{NetId, PinId};
use dmfb_common::db::resources::Pin;
use dmfb_common::util::check;
use dmfb_common::util::config::ValidationConfig;
use dmfb_common::util::profiler::ScopedTimer;
use std::collections::HashMap;

/// Assembles a chip from a parsed description and validates it.
///
/// Assembly never stops early. Everything found ends up in `chip.errors` or
/// `chip.hard_errors`; whether a chip with hard errors is usable is up to
/// the caller.
pub fn build(desc: ChipDescription, config: &ValidationConfig) -> Chip {
    let _timer = ScopedTimer::new("Chip assembly");

    let ChipDescription {
        grids,
        droplets,
        nets,
        mut sinks,
        mut dispensers,
        blockages,
        mut detectors,
        pin_assignments,
        pin_actuations,
        cell_actuations,
        mixers,
        fluid_types,
        droplet_fluids,
        annotations,
        parse_errors,
    } = desc;

    let mut chip = Chip::new();
    let mut errors = parse_errors;
    let mut hard_errors = Vec::new();

    for rect in &grids {
        for p in rect.positions() {
            if !chip.has_field_at(p) {
                chip.add_field(Field::new(p));
            }
        }
    }
    if grids.len() > 1 {
        log::warn!(
            "There were {} grid definitions. The cells were merged",
            grids.len()
        );
    }

    for drop in droplets {
        chip.add_droplet(drop);
    }
    chip.add_fluid_types(fluid_types);

    for (i, net) in nets.iter().enumerate() {
        let net_id = NetId::new(i);
        for src in net.sources() {
            match chip.droplet_mut(src.droplet_id) {
                Some(drop) => {
                    if drop.set_net(net_id).is_err() {
                        errors.push(format!(
                            "Droplet {} is a source of more than one net",
                            src.droplet_id
                        ));
                    }
                }
                None => errors.push(format!(
                    "Net source refers to unknown droplet {}",
                    src.droplet_id
                )),
            }

            match chip.field_at_mut(net.target()) {
                Ok(field) => field.target_ids.push(src.droplet_id),
                Err(e) => hard_errors.push(format!("Net target: {}", e)),
            }
            match chip.field_at_mut(src.start_position) {
                Ok(field) => field.source_ids.push(src.droplet_id),
                Err(e) => hard_errors.push(format!("Net source of droplet {}: {}", src.droplet_id, e)),
            }
        }
    }
    chip.add_nets(nets);

    for (drop, fluid) in droplet_fluids {
        chip.add_drop_to_fluid(drop, fluid);
    }

    let remove = config.remove_invalid_ports;
    errors.extend(check::check_external_ports(
        &chip,
        "Sink",
        &mut sinks,
        |s| *s,
        remove,
    ));
    errors.extend(check::check_external_ports(
        &chip,
        "Dispenser",
        &mut dispensers,
        |d| d.port,
        remove,
    ));
    for sink in sinks {
        let pos = sink.port_position();
        if chip.has_field_at(pos) {
            log::warn!("Not placing sink over existing field at {}", pos);
            continue;
        }
        chip.add_field(Field::sink(pos, sink.direction));
    }
    for disp in dispensers {
        let pos = disp.port.port_position();
        if chip.has_field_at(pos) {
            log::warn!("Not placing dispenser over existing field at {}", pos);
            continue;
        }
        chip.add_field(Field::dispenser(pos, disp.fluid, disp.port.direction));
    }

    for (rect, range) in &blockages {
        for p in rect.positions() {
            match chip.field_at_mut(p) {
                Ok(field) => field.attach_blockage(*range),
                Err(e) => hard_errors.push(format!("Blockage {}: {}", rect, e)),
            }
        }
    }
    chip.blockages = blockages;

    errors.extend(check::check_for_positions(&chip, "detector", &mut detectors));
    errors.extend(check::check_for_resources(&chip, "detector", &mut detectors));
    for det in detectors {
        let idx = chip.detectors.len();
        for p in det.position.positions() {
            if let Ok(field) = chip.field_at_mut(p) {
                field.detector = Some(idx);
            }
        }
        chip.detectors.push(det);
    }

    // A cell listed under several pins keeps the first one in declaration order.
    let mut pins: HashMap<PinId, Pin> = HashMap::new();
    for (cell, id) in pin_assignments {
        pins.entry(id).or_insert_with(|| Pin::new(id)).cells.push(cell);
        match chip.field_at_mut(cell) {
            Ok(field) => match field.pin {
                Some(owner) if owner != id => {
                    log::warn!("Cell {} stays on pin {}, ignoring pin {}", cell, owner, id);
                }
                _ => field.pin = Some(id),
            },
            Err(e) => hard_errors.push(format!("Pin {}: {}", id, e)),
        }
    }
    chip.pins = pins;
    chip.pin_actuations = pin_actuations;

    for (p, vec) in &cell_actuations {
        match chip.field_at_mut(*p) {
            Ok(field) => field.actuation = Some(vec.clone()),
            Err(e) => hard_errors.push(format!("Cell actuation: {}", e)),
        }
    }
    chip.cell_actuations = cell_actuations;

    for mixer in &mixers {
        for p in mixer.position.positions() {
            log::trace!("Adding mixer {} to field {}", mixer, p);
            match chip.field_at_mut(p) {
                Ok(field) => field.mixers.push(mixer.id),
                Err(e) => hard_errors.push(format!("Mixer {}: {}", mixer.id, e)),
            }
        }
    }
    chip.mixers = mixers;

    for a in annotations {
        chip.add_annotation(a);
    }

    let diag = check::run(&chip, config);
    errors.extend(diag.errors);
    hard_errors.extend(diag.hard_errors);

    compute_cell_usage(&mut chip);

    let violations: Vec<String> = adjacent_activations(&mut chip)
        .violations()
        .iter()
        .map(ToString::to_string)
        .collect();
    if config.report_adjacency {
        for v in &violations {
            log::error!("{}", v);
        }
        errors.extend(violations);
    }

    log::info!(
        "Chip assembled: {} fields, {} droplets, {} nets, {} errors, {} hard errors",
        chip.num_fields(),
        chip.num_droplets(),
        chip.nets().len(),
        errors.len(),
        hard_errors.len()
    );

    chip.errors.extend(errors);
    chip.hard_errors.extend(hard_errors);
    chip
}
