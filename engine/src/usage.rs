use dmfb_common::db::core::Chip;
use dmfb_common::geom::point::Point;
use dmfb_common::util::profiler::ScopedTimer;
use std::collections::{HashMap, HashSet};

/// Recomputes every field's usage: the number of time steps in
/// `1..=max_t` during which at least one droplet sits on it.
pub fn compute_cell_usage(chip: &mut Chip) {
    let _timer = ScopedTimer::new("Cell usage");
    log::debug!("Computing cell usage");

    let mut counts: HashMap<Point, u32> = HashMap::new();
    for t in 1..=chip.max_t() {
        let occupied: HashSet<Point> = chip.droplets().filter_map(|d| d.position_at(t)).collect();
        for p in occupied {
            *counts.entry(p).or_insert(0) += 1;
        }
    }

    for field in chip.fields_mut() {
        field.usage = counts.get(&field.pos()).copied().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmfb_common::db::droplet::Droplet;
    use dmfb_common::db::field::Field;
    use dmfb_common::db::indices::DropletId;

    #[test]
    fn counts_occupied_steps() {
        let mut chip = Chip::new();
        for x in 0..3 {
            chip.add_field(Field::new(Point::new(x, 0)));
        }
        chip.add_droplet(Droplet::with_route(
            DropletId(1),
            1,
            vec![Point::new(0, 0), Point::new(0, 0), Point::new(1, 0)],
        ));
        chip.add_droplet(Droplet::with_route(DropletId(2), 2, vec![Point::new(0, 0)]));
        chip.field_at_mut(Point::new(2, 0)).unwrap().usage = 9;

        compute_cell_usage(&mut chip);
        assert_eq!(chip.field_at(Point::new(0, 0)).unwrap().usage, 2);
        assert_eq!(chip.field_at(Point::new(1, 0)).unwrap().usage, 1);
        assert_eq!(chip.field_at(Point::new(2, 0)).unwrap().usage, 0);
        assert_eq!(chip.max_usage(), 2);
    }
}
