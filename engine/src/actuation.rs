use dmfb_common::db::core::Chip;
use dmfb_common::db::field::Field;
use dmfb_common::db::resources::{Actuation, ActuationVector};
use dmfb_common::error::ChipResult;
use dmfb_common::geom::point::Point;

/// Whether the electrode under `field` is switched on at time step `t`.
///
/// Rules, first match wins:
/// 1. the field's pin has a pin actuation vector: use it;
/// 2. the field has a non-empty cell actuation vector: use it;
/// 3. otherwise the cell is on iff a droplet sits on it.
///
/// An active mixer covering the field forces the result on afterwards.
/// Vectors shorter than `t` are an error, not an implicit "off".
pub fn is_actuated(chip: &Chip, field: &Field, t: u32) -> ChipResult<bool> {
    let pin_vector = field
        .pin
        .filter(|_| !chip.pin_actuations.is_empty())
        .and_then(|pin| chip.pin_actuations.get(&pin));

    let on = match (pin_vector, field.cell_actuation()) {
        (Some(vec), _) => step_is_on(vec, t)?,
        (None, Some(vec)) => step_is_on(vec, t)?,
        (None, None) => chip.droplet_on_position(field.pos(), t),
    };

    Ok(on || mixer_active(chip, field, t))
}

fn step_is_on(vec: &ActuationVector, t: u32) -> ChipResult<bool> {
    Ok(vec.at_step(t)? == Actuation::On)
}

fn mixer_active(chip: &Chip, field: &Field, t: u32) -> bool {
    chip.mixers.iter().any(|m| {
        field.mixers.contains(&m.id) && m.position.contains(field.pos()) && m.timing.in_range(t)
    })
}

pub fn is_actuated_at(chip: &Chip, p: Point, t: u32) -> ChipResult<bool> {
    is_actuated(chip, chip.field_at(p)?, t)
}

/// All actuated cells at `t`, sorted.
pub fn actuated_cells(chip: &Chip, t: u32) -> ChipResult<Vec<Point>> {
    let mut cells = Vec::new();
    for field in chip.fields() {
        if is_actuated(chip, field, t)? {
            cells.push(field.pos());
        }
    }
    cells.sort();
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmfb_common::db::droplet::Droplet;
    use dmfb_common::db::indices::{DropletId, MixerId, PinId};
    use dmfb_common::db::resources::Mixer;
    use dmfb_common::error::ChipError;
    use dmfb_common::geom::range::Range;
    use dmfb_common::geom::rect::Rect;

    fn chip_3x3() -> Chip {
        let mut chip = Chip::new();
        for p in Rect::new(Point::new(0, 0), Point::new(2, 2)).positions() {
            chip.add_field(Field::new(p));
        }
        chip
    }

    fn at(chip: &Chip, x: i32, y: i32, t: u32) -> ChipResult<bool> {
        is_actuated_at(chip, Point::new(x, y), t)
    }

    #[test]
    fn droplet_presence() {
        let mut chip = chip_3x3();
        chip.add_droplet(Droplet::with_route(
            DropletId(1),
            1,
            vec![Point::new(0, 0), Point::new(1, 0)],
        ));
        assert_eq!(at(&chip, 0, 0, 1), Ok(true));
        assert_eq!(at(&chip, 0, 0, 2), Ok(false));
        assert_eq!(at(&chip, 1, 0, 2), Ok(true));
        assert_eq!(actuated_cells(&chip, 2), Ok(vec![Point::new(1, 0)]));
    }

    #[test]
    fn pin_beats_droplet_and_mixer_beats_pin() {
        let mut chip = chip_3x3();
        let p = Point::new(1, 1);
        chip.field_at_mut(p).unwrap().pin = Some(PinId(4));
        chip.pin_actuations.insert(PinId(4), ActuationVector::from("00"));
        chip.add_droplet(Droplet::with_route(DropletId(1), 1, vec![p, p]));
        assert_eq!(at(&chip, 1, 1, 1), Ok(false));

        chip.mixers.push(Mixer {
            id: MixerId(0),
            position: Rect::from_point(p),
            timing: Range::new(2, 2),
        });
        chip.field_at_mut(p).unwrap().mixers.push(MixerId(0));
        assert_eq!(at(&chip, 1, 1, 1), Ok(false));
        assert_eq!(at(&chip, 1, 1, 2), Ok(true));
    }

    #[test]
    fn pin_beats_cell_vector() {
        let mut chip = chip_3x3();
        let f = chip.field_at_mut(Point::new(0, 0)).unwrap();
        f.pin = Some(PinId(1));
        f.actuation = Some(ActuationVector::from("1"));
        chip.pin_actuations.insert(PinId(1), ActuationVector::from("0"));
        assert_eq!(at(&chip, 0, 0, 1), Ok(false));
    }

    #[test]
    fn missing_pin_vector_falls_through() {
        let mut chip = chip_3x3();
        let f = chip.field_at_mut(Point::new(0, 0)).unwrap();
        f.pin = Some(PinId(1));
        f.actuation = Some(ActuationVector::from("1"));
        chip.pin_actuations.insert(PinId(2), ActuationVector::from("0"));
        assert_eq!(at(&chip, 0, 0, 1), Ok(true));

        // Pin without any pin vectors on the chip: droplet presence decides.
        let mut chip = chip_3x3();
        chip.field_at_mut(Point::new(2, 2)).unwrap().pin = Some(PinId(1));
        chip.add_droplet(Droplet::with_route(DropletId(1), 1, vec![Point::new(2, 2)]));
        assert_eq!(at(&chip, 2, 2, 1), Ok(true));
    }

    #[test]
    fn short_vector_fails_fast() {
        let mut chip = chip_3x3();
        chip.field_at_mut(Point::new(0, 0)).unwrap().actuation = Some(ActuationVector::from("10"));
        assert_eq!(at(&chip, 0, 0, 1), Ok(true));
        assert_eq!(
            at(&chip, 0, 0, 3),
            Err(ChipError::ActuationIndexOutOfRange { index: 2, len: 2 })
        );
        assert!(actuated_cells(&chip, 3).is_err());
    }

    #[test]
    fn unknown_cell() {
        let chip = chip_3x3();
        assert_eq!(at(&chip, 7, 7, 1), Err(ChipError::NoFieldAt(Point::new(7, 7))));
    }
}
