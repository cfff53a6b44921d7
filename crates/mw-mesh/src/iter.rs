use std::iter::FusedIterator;

use mw_geometry::BezierPatch;

use crate::mesh::BezierMesh;

/// Iterator over the patches of a mesh in row-major order.
///
/// Patches are assembled on the fly; the iterator borrows the mesh and
/// never outlives it.
#[derive(Debug, Clone)]
pub struct PatchIter<'a> {
    mesh: &'a BezierMesh,
    front: usize,
    back: usize,
}

impl<'a> PatchIter<'a> {
    pub fn new(mesh: &'a BezierMesh) -> Self {
        Self {
            mesh,
            front: 0,
            back: mesh.patch_count(),
        }
    }

    /// Signed number of forward steps from this iterator's front to `other`'s.
    pub fn distance_to(&self, other: &PatchIter<'_>) -> isize {
        other.front as isize - self.front as isize
    }

    /// An exhausted iterator positioned one past the last patch.
    pub fn end(mesh: &'a BezierMesh) -> Self {
        let count = mesh.patch_count();
        Self {
            mesh,
            front: count,
            back: count,
        }
    }

    /// `(col, row)` of the patch the next call to `next()` yields.
    pub fn position(&self) -> Option<(usize, usize)> {
        (self.front < self.back).then(|| self.mesh.patch_position(self.front))
    }
}

impl<'a> Iterator for PatchIter<'a> {
    type Item = BezierPatch;

    fn next(&mut self) -> Option<BezierPatch> {
        if self.front >= self.back {
            return None;
        }
        let patch = self.mesh.patch_at_index(self.front).ok()?;
        self.front += 1;
        Some(patch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back.saturating_sub(self.front);
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<BezierPatch> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a> DoubleEndedIterator for PatchIter<'a> {
    fn next_back(&mut self) -> Option<BezierPatch> {
        if self.front >= self.back {
            return None;
        }
        let patch = self.mesh.patch_at_index(self.back - 1).ok()?;
        self.back -= 1;
        Some(patch)
    }

    fn nth_back(&mut self, n: usize) -> Option<BezierPatch> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<'a> ExactSizeIterator for PatchIter<'a> {}

impl<'a> FusedIterator for PatchIter<'a> {}
