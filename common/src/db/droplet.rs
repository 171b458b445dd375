use crate::db::indices::{DropletId, NetId};
use crate::error::{ChipError, ChipResult};
use crate::geom::point::Point;
use std::fmt;

/// A unit of fluid and the cells it occupies over time.
///
/// `route[i]` is the position at time step `spawn_time + i`. The droplet is
/// absent from the chip before it spawns and after its route ends.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub id: DropletId,
    spawn_time: u32,
    route: Vec<Point>,
    net: Option<NetId>,
}

impl Droplet {
    pub fn new(id: DropletId) -> Self {
        Self::with_spawn_time(id, 1)
    }

    /// Spawn times below 1 are raised to 1.
    pub fn with_spawn_time(id: DropletId, spawn_time: u32) -> Self {
        Self {
            id,
            spawn_time: spawn_time.max(1),
            route: Vec::new(),
            net: None,
        }
    }

    pub fn with_route(id: DropletId, spawn_time: u32, route: Vec<Point>) -> Self {
        let mut d = Self::with_spawn_time(id, spawn_time);
        d.route = route;
        d
    }

    pub fn spawn_time(&self) -> u32 {
        self.spawn_time
    }

    pub fn positions(&self) -> &[Point] {
        &self.route
    }

    pub fn add_position(&mut self, p: Point) {
        self.route.push(p);
    }

    pub fn route_length(&self) -> usize {
        self.route.len()
    }

    pub fn net(&self) -> Option<NetId> {
        self.net
    }

    /// Links the droplet to its net. The link is made once, after parsing.
    pub fn set_net(&mut self, net: NetId) -> ChipResult<()> {
        if self.net.is_some() {
            return Err(ChipError::NetAlreadySet { droplet: self.id });
        }
        self.net = Some(net);
        Ok(())
    }

    fn offset(&self, t: u32) -> Option<usize> {
        t.checked_sub(self.spawn_time).map(|i| i as usize)
    }

    pub fn position_at(&self, t: u32) -> Option<Point> {
        self.offset(t).and_then(|i| self.route.get(i).copied())
    }

    /// Like [`Droplet::position_at`] but clamps to the first/last route
    /// point outside the droplet's lifetime. `None` only for empty routes.
    pub fn safe_position_at(&self, t: u32) -> Option<Point> {
        match self.offset(t) {
            None => self.route.first().copied(),
            Some(i) if i >= self.route.len() => self.route.last().copied(),
            Some(i) => Some(self.route[i]),
        }
    }

    pub fn first_position(&self) -> ChipResult<Point> {
        self.route
            .first()
            .copied()
            .ok_or(ChipError::EmptyRoute { droplet: self.id })
    }

    pub fn last_position(&self) -> ChipResult<Point> {
        self.route
            .last()
            .copied()
            .ok_or(ChipError::EmptyRoute { droplet: self.id })
    }

    /// Last time step at which the droplet is on the chip.
    pub fn max_time(&self) -> u32 {
        (self.spawn_time + self.route.len() as u32).saturating_sub(1)
    }
}

impl PartialEq for Droplet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Droplet {}

impl fmt::Display for Droplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D[{}@{}]", self.id, self.spawn_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drop_at(spawn: u32, route: &[(i32, i32)]) -> Droplet {
        Droplet::with_route(
            DropletId(1),
            spawn,
            route.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn lifetime_bounds() {
        let d = drop_at(3, &[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(d.max_time(), 5);
        assert_eq!(d.position_at(2), None);
        assert_eq!(d.position_at(3), Some(Point::new(0, 0)));
        assert_eq!(d.position_at(5), Some(Point::new(2, 0)));
        assert_eq!(d.position_at(6), None);
        assert_eq!(d.safe_position_at(1), Some(Point::new(0, 0)));
        assert_eq!(d.safe_position_at(9), Some(Point::new(2, 0)));
    }

    #[test]
    fn empty_route() {
        let d = Droplet::new(DropletId(4));
        assert_eq!(d.position_at(1), None);
        assert_eq!(d.safe_position_at(1), None);
        assert_eq!(d.first_position(), Err(ChipError::EmptyRoute { droplet: DropletId(4) }));
    }

    #[test]
    fn net_is_set_once() {
        let mut d = drop_at(1, &[(0, 0)]);
        assert!(d.set_net(NetId(0)).is_ok());
        assert!(d.set_net(NetId(1)).is_err());
        assert_eq!(d.net(), Some(NetId(0)));
    }

    #[test]
    fn display() {
        assert_eq!(drop_at(2, &[(0, 0)]).to_string(), "D[1@2]");
    }

    proptest! {
        #[test]
        fn position_agrees_with_safe_position(
            spawn in 1u32..10,
            len in 1usize..8,
            t in 0u32..30,
        ) {
            let route: Vec<(i32, i32)> = (0..len as i32).map(|i| (i, 0)).collect();
            let d = drop_at(spawn, &route);
            let first = d.first_position().unwrap();
            let last = d.last_position().unwrap();
            if t < spawn {
                prop_assert_eq!(d.position_at(t), None);
                prop_assert_eq!(d.safe_position_at(t), Some(first));
            } else if t > d.max_time() {
                prop_assert_eq!(d.position_at(t), None);
                prop_assert_eq!(d.safe_position_at(t), Some(last));
            } else {
                prop_assert_eq!(d.position_at(t), d.safe_position_at(t));
            }
        }
    }
}
