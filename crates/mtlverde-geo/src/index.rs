use geo::{BoundingRect, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

/// Bounding box of one geometry, tagged with its position in the source slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedGeometry {
    pub idx: usize,
    envelope: AABB<[f64; 2]>,
}

impl IndexedGeometry {
    /// `None` for an empty geometry, which has no bounding box
    pub fn new(idx: usize, geometry: &MultiPolygon<f64>) -> Option<Self> {
        envelope_of(geometry).map(|envelope| Self { idx, envelope })
    }
}

impl RTreeObject for IndexedGeometry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope_of(geometry: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());
    Some(AABB::from_corners([min.x, min.y], [max.x, max.y]))
}

/// R-tree over geometry bounding boxes.
///
/// Only a prefilter: candidates still need the exact intersection test.
pub struct SpatialIndex {
    tree: RTree<IndexedGeometry>,
}

impl SpatialIndex {
    /// Index a slice of geometries. Empty geometries are left out.
    pub fn from_geometries<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Self {
        let indexed: Vec<IndexedGeometry> = geometries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, geometry)| IndexedGeometry::new(idx, geometry))
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions whose bounding box intersects the query geometry's, in ascending order
    pub fn candidates(&self, geometry: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(envelope) = envelope_of(geometry) else {
            return Vec::new();
        };

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|indexed| indexed.idx)
            .collect();
        hits.sort_unstable();
        hits
    }
}
