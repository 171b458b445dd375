use crate::db::description::{ChipDescription, DispenserDef, ExternalPort};
use crate::db::droplet::Droplet;
use crate::db::indices::{DropletId, FluidId, MixerId, PinId};
use crate::db::net::{Net, Source};
use crate::db::resources::{ActuationVector, Detector, Mixer};
use crate::geom::point::{Direction, Point};
use crate::geom::range::Range;
use crate::geom::rect::Rect;
use crate::util::config::GeneratorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a random chip whose routes only use legal single-cell moves.
/// Droplets may still come too close to each other or run into blockages;
/// finding that is the validator's job.
pub fn generate_random_chip(config: &GeneratorConfig) -> ChipDescription {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let w = config.width.max(2);
    let h = config.height.max(2);
    let route_len = config.max_route_length.max(1);
    let spawn_window = config.spawn_window.max(1);
    // No event may outlast the actuation vectors generated below.
    let horizon = spawn_window + route_len as u32;

    log::info!(
        "Generating chip: {}x{}, {} droplets, {} mixers, {} blockages",
        w,
        h,
        config.droplets,
        config.mixers,
        config.blockages
    );

    let grid = Rect::new(Point::new(0, 0), Point::new(w - 1, h - 1));
    let mut desc = ChipDescription::with_grid(grid);

    desc.fluid_types.insert(FluidId(1), "sample".to_string());
    desc.fluid_types.insert(FluidId(2), "reagent".to_string());

    for i in 0..config.droplets {
        let id = DropletId::new(i + 1);
        let spawn = rng.gen_range(1..=spawn_window);
        let len = rng.gen_range(1..=route_len);
        let mut pos = Point::new(rng.gen_range(0..w), rng.gen_range(0..h));
        let mut drop = Droplet::with_spawn_time(id, spawn);
        drop.add_position(pos);
        for _ in 1..len {
            let step = match rng.gen_range(0..5) {
                0 => Point::new(0, 0),
                k => Point::DIRECTIONS[k - 1],
            };
            let next = pos + step;
            if grid.contains(next) {
                pos = next;
            }
            drop.add_position(pos);
        }
        desc.droplet_fluids
            .insert(id, FluidId(rng.gen_range(1..=2)));

        // Pair every other droplet with its predecessor.
        if i % 2 == 1
            && let Some(prev) = desc.droplets.last()
            && let (Ok(a), Ok(b)) = (prev.first_position(), drop.first_position())
            && let Ok(net) = Net::new(
                vec![
                    Source::spawned_at(prev.id, a, prev.spawn_time()),
                    Source::spawned_at(id, b, spawn),
                ],
                pos,
            )
        {
            desc.nets.push(net);
        }
        desc.droplets.push(drop);
    }

    for i in 0..config.mixers {
        let corner = Point::new(rng.gen_range(0..w - 1), rng.gen_range(0..h - 1));
        let begin = rng.gen_range(1..=horizon) as i64;
        let end = rng.gen_range(begin..=horizon as i64);
        desc.mixers.push(Mixer {
            id: MixerId::new(i),
            position: Rect::new(corner, corner + Point::new(1, 1)),
            timing: Range::new(begin, end),
        });
    }

    for _ in 0..config.blockages {
        let p = Point::new(rng.gen_range(0..w), rng.gen_range(0..h));
        let begin = rng.gen_range(1..=horizon) as i64;
        let end = rng.gen_range(begin..=horizon as i64);
        desc.blockages
            .push((Rect::from_point(p), Range::new(begin, end)));
    }

    desc.sinks
        .push(ExternalPort::new(Point::new(w - 1, h / 2), Direction::East));
    desc.dispensers.push(DispenserDef {
        fluid: FluidId(1),
        port: ExternalPort::new(Point::new(0, h / 2), Direction::West),
    });
    desc.detectors.push(Detector::at(
        Point::new(w / 2, h / 2),
        rng.gen_range(1..=horizon),
        FluidId(1),
    ));

    // One pin driving the top row's first two cells.
    let pin = PinId(1);
    desc.pin_assignments.push((Point::new(0, h - 1), pin));
    desc.pin_assignments.push((Point::new(1, h - 1), pin));
    let pattern: String = (0..horizon)
        .map(|_| match rng.gen_range(0..3) {
            0 => '0',
            1 => '1',
            _ => 'X',
        })
        .collect();
    desc.pin_actuations
        .insert(pin, ActuationVector::from(pattern.as_str()));

    desc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::check::check_paths_for_jumps;

    fn seeded(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn routes_stay_on_grid_and_are_legal() {
        let desc = generate_random_chip(&seeded(7));
        let grid = desc.grids[0];
        assert_eq!(desc.droplets.len(), 6);
        for d in &desc.droplets {
            assert!(d.positions().iter().all(|&p| grid.contains(p)));
        }
        assert!(check_paths_for_jumps(&desc.droplets).is_empty());
    }

    #[test]
    fn same_seed_same_chip() {
        let a = generate_random_chip(&seeded(42));
        let b = generate_random_chip(&seeded(42));
        let routes = |d: &ChipDescription| {
            d.droplets
                .iter()
                .map(|x| x.positions().to_vec())
                .collect::<Vec<_>>()
        };
        assert_eq!(routes(&a), routes(&b));
        assert_eq!(a.nets, b.nets);
    }
}
