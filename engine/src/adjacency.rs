use dmfb_common::db::core::Chip;
use dmfb_common::db::droplet::Droplet;
use dmfb_common::db::violation::{AdjacencyReport, FluidicConstraintViolation};
use dmfb_common::geom::point::Point;
use dmfb_common::util::profiler::ScopedTimer;
use std::collections::HashSet;

/// Cells where droplets of different nets come too close, at any time.
///
/// The result is cached on the chip. It is only recomputed when nothing is
/// cached yet or `chip.recalculate_adjacency` was set.
pub fn adjacent_activations(chip: &mut Chip) -> &AdjacencyReport {
    chip.adjacency_or_scan(scan)
}

/// Full `O(T * D^2)` scan over every time step and ordered droplet pair.
///
/// For each pair three situations count as a violation: both droplets now,
/// the first droplet's next position against the second's current one, and
/// the first's current position against the second's next one.
pub fn scan(chip: &Chip) -> AdjacencyReport {
    let _timer = ScopedTimer::new("Adjacency scan");
    let droplets: Vec<&Droplet> = chip.droplets().collect();
    let mut result = HashSet::new();

    for timestep in 1..=chip.max_t() {
        for d1 in &droplets {
            let p1 = d1.position_at(timestep);
            let pp1 = d1.position_at(timestep + 1);
            for d2 in &droplets {
                log::trace!("Comparing droplets {} and {}", d1, d2);
                if d1.id == d2.id || chip.same_net(d1.id, d2.id) {
                    continue;
                }
                let p2 = d2.position_at(timestep);
                let pp2 = d2.position_at(timestep + 1);

                record(p1, d1, p2, d2, timestep, &mut result);
                record(pp1, d1, p2, d2, timestep, &mut result);
                record(p1, d1, pp2, d2, timestep, &mut result);
            }
        }
    }

    let report = AdjacencyReport::from_violations(result);
    log::debug!(
        "{} violations on {} cells",
        report.len(),
        report.fields().len()
    );
    report
}

fn record(
    a: Option<Point>,
    d1: &Droplet,
    b: Option<Point>,
    d2: &Droplet,
    timestep: u32,
    out: &mut HashSet<FluidicConstraintViolation>,
) {
    if let (Some(f1), Some(f2)) = (a, b)
        && Point::adjacent(a, b)
    {
        log::debug!(
            "Points {}({}) and {}({}) are adjacent in time step {}",
            f1,
            d1,
            f2,
            d2,
            timestep
        );
        out.insert(FluidicConstraintViolation::new(d1.id, f1, d2.id, f2, timestep));
    }
}
