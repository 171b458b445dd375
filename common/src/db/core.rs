use crate::db::droplet::Droplet;
use crate::db::field::Field;
use crate::db::indices::*;
use crate::db::net::Net;
use crate::db::resources::{ActuationVector, Detector, Mixer, Pin};
use crate::db::violation::AdjacencyReport;
use crate::error::{ChipError, ChipResult};
use crate::geom::point::Point;
use crate::geom::range::Range;
use crate::geom::rect::Rect;
use std::collections::{BTreeMap, HashMap};

/// A biochip: the grid of fields plus everything that moves across or
/// drives it over time.
pub struct Chip {
    pub blockages: Vec<(Rect, Range)>,
    pub detectors: Vec<Detector>,
    pub pins: HashMap<PinId, Pin>,
    pub pin_actuations: HashMap<PinId, ActuationVector>,
    pub cell_actuations: HashMap<Point, ActuationVector>,
    pub mixers: Vec<Mixer>,

    pub errors: Vec<String>,
    pub hard_errors: Vec<String>,

    /// Set when droplet routes change; the next adjacency query rescans.
    pub recalculate_adjacency: bool,
    adjacency_cache: Option<AdjacencyReport>,

    fields: HashMap<Point, Field>,
    droplets: BTreeMap<DropletId, Droplet>,
    nets: Vec<Net>,

    fluid_types: HashMap<FluidId, String>,
    droplet_fluids: HashMap<DropletId, FluidId>,
    annotations: Vec<String>,
}

impl Default for Chip {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip {
    pub fn new() -> Self {
        Self {
            blockages: Vec::new(),
            detectors: Vec::new(),
            pins: HashMap::new(),
            pin_actuations: HashMap::new(),
            cell_actuations: HashMap::new(),
            mixers: Vec::new(),
            errors: Vec::new(),
            hard_errors: Vec::new(),
            recalculate_adjacency: false,
            adjacency_cache: None,
            fields: HashMap::with_capacity(256),
            droplets: BTreeMap::new(),
            nets: Vec::new(),
            fluid_types: HashMap::new(),
            droplet_fluids: HashMap::new(),
            annotations: Vec::new(),
        }
    }

    // ---- fields ----

    /// Inserts a field under its own position. An existing field at that
    /// position is replaced and returned.
    pub fn add_field(&mut self, field: Field) -> Option<Field> {
        let pos = field.pos();
        let old = self.fields.insert(pos, field);
        if old.is_some() {
            log::warn!("Field added twice at {}, removed older instance", pos);
        }
        old
    }

    pub fn has_field_at(&self, p: Point) -> bool {
        self.fields.contains_key(&p)
    }

    pub fn field_at(&self, p: Point) -> ChipResult<&Field> {
        self.fields.get(&p).ok_or(ChipError::NoFieldAt(p))
    }

    pub fn field_at_mut(&mut self, p: Point) -> ChipResult<&mut Field> {
        self.fields.get_mut(&p).ok_or(ChipError::NoFieldAt(p))
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.values_mut()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn all_coordinates(&self) -> impl Iterator<Item = Point> + '_ {
        self.fields.keys().copied()
    }

    pub fn non_existent_fields(&self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .copied()
            .filter(|&p| !self.has_field_at(p))
            .collect()
    }

    pub fn all_present(&self, points: &[Point]) -> bool {
        points.iter().all(|&p| self.has_field_at(p))
    }

    /// Cells outside the chip count as free.
    pub fn has_resource(&self, points: &[Point]) -> bool {
        points
            .iter()
            .any(|p| self.fields.get(p).is_some_and(|f| f.has_resource()))
    }

    pub fn fields_for_pin(&self, pin: PinId) -> Vec<&Field> {
        self.fields.values().filter(|f| f.pin == Some(pin)).collect()
    }

    /// Lower left corner of the bounding box of all fields.
    pub fn min_coord(&self) -> Option<Point> {
        let x = self.fields.keys().map(|p| p.x).min()?;
        let y = self.fields.keys().map(|p| p.y).min()?;
        Some(Point::new(x, y))
    }

    /// Upper right corner of the bounding box of all fields.
    pub fn max_coord(&self) -> Option<Point> {
        let x = self.fields.keys().map(|p| p.x).max()?;
        let y = self.fields.keys().map(|p| p.y).max()?;
        Some(Point::new(x, y))
    }

    pub fn max_usage(&self) -> u32 {
        self.fields.values().map(|f| f.usage).max().unwrap_or(0)
    }

    // ---- droplets & nets ----

    pub fn add_droplet(&mut self, drop: Droplet) {
        if let Some(old) = self.droplets.insert(drop.id, drop) {
            log::warn!("Droplet {} defined twice, keeping the later one", old.id);
        }
        self.recalculate_adjacency = true;
    }

    pub fn droplets(&self) -> impl Iterator<Item = &Droplet> {
        self.droplets.values()
    }

    pub fn num_droplets(&self) -> usize {
        self.droplets.len()
    }

    pub fn droplet(&self, id: DropletId) -> Option<&Droplet> {
        self.droplets.get(&id)
    }

    /// Mutable access to a route. Callers that change it must call
    /// [`Chip::invalidate_adjacency`].
    pub fn droplet_mut(&mut self, id: DropletId) -> Option<&mut Droplet> {
        self.droplets.get_mut(&id)
    }

    pub fn add_nets(&mut self, nets: impl IntoIterator<Item = Net>) {
        self.nets.extend(nets);
        self.recalculate_adjacency = true;
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())
    }

    /// Nets whose bounding box covers `p`.
    pub fn nets_of(&self, p: Point) -> Vec<NetId> {
        self.nets
            .iter()
            .enumerate()
            .filter(|(_, n)| n.contains_point(p))
            .map(|(i, _)| NetId::new(i))
            .collect()
    }

    /// Net membership is read from the nets' sources, not from the droplets'
    /// back-references.
    pub fn same_net(&self, d1: DropletId, d2: DropletId) -> bool {
        self.nets
            .iter()
            .rfind(|n| n.contains_droplet_id(d1))
            .is_some_and(|n| n.contains_droplet_id(d2))
    }

    pub fn droplet_on_position(&self, p: Point, t: u32) -> bool {
        self.droplets.values().any(|d| d.position_at(t) == Some(p))
    }

    // ---- fluids & annotations ----

    pub fn add_fluid_types(&mut self, types: impl IntoIterator<Item = (FluidId, String)>) {
        self.fluid_types.extend(types);
    }

    pub fn add_drop_to_fluid(&mut self, droplet: DropletId, fluid: FluidId) {
        self.droplet_fluids.insert(droplet, fluid);
    }

    pub fn fluid_id(&self, droplet: DropletId) -> Option<FluidId> {
        self.droplet_fluids.get(&droplet).copied()
    }

    pub fn fluid_type(&self, fluid: Option<FluidId>) -> Option<&str> {
        fluid
            .and_then(|id| self.fluid_types.get(&id))
            .map(String::as_str)
    }

    pub fn add_annotation(&mut self, annotation: String) {
        self.annotations.push(annotation);
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    // ---- time ----

    /// Latest time step at which anything happens on the chip.
    pub fn max_t(&self) -> u32 {
        let droplets = self.droplets.values().map(Droplet::max_time);
        let mixers = self.mixers.iter().map(|m| m.timing.end);
        let blockages = self.blockages.iter().map(|(_, r)| r.end);
        let vectors = self
            .pin_actuations
            .values()
            .chain(self.cell_actuations.values())
            .map(|v| v.len() as u32);

        droplets
            .chain(mixers)
            .chain(blockages)
            .chain(vectors)
            .max()
            .unwrap_or(0)
    }

    pub fn max_route_length(&self) -> usize {
        self.droplets
            .values()
            .map(Droplet::route_length)
            .max()
            .unwrap_or(0)
    }

    // ---- adjacency cache ----

    pub fn invalidate_adjacency(&mut self) {
        self.recalculate_adjacency = true;
    }

    pub fn cached_adjacency(&self) -> Option<&AdjacencyReport> {
        self.adjacency_cache.as_ref()
    }

    /// Returns the cached report, running `scan` first when nothing is cached
    /// or [`Chip::recalculate_adjacency`] is set.
    pub fn adjacency_or_scan(
        &mut self,
        scan: impl FnOnce(&Chip) -> AdjacencyReport,
    ) -> &AdjacencyReport {
        let report = match self.adjacency_cache.take() {
            Some(cached) if !self.recalculate_adjacency => cached,
            _ => {
                log::debug!("Recalculating adjacency");
                self.recalculate_adjacency = false;
                scan(self)
            }
        };
        self.adjacency_cache.insert(report)
    }
}
