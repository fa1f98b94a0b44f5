//! The `Spatial` trait: anything that can report a bounding box can be
//! stored in an [`RTree`](crate::RTree).

use std::rc::Rc;
use std::sync::Arc;

use crate::bounding_box::BoundingBox;

/// An object with a position in space.
///
/// The tree asks for the bounds once, when the object is inserted, and
/// again when the object is passed to `delete` or `contains`. An object's
/// bounds must not change while it is stored.
pub trait Spatial {
    /// Returns the bounding box of this object.
    fn bounds(&self) -> BoundingBox;
}

impl Spatial for BoundingBox {
    fn bounds(&self) -> BoundingBox {
        self.clone()
    }
}

impl<S: Spatial + ?Sized> Spatial for &S {
    fn bounds(&self) -> BoundingBox {
        (**self).bounds()
    }
}

impl<S: Spatial + ?Sized> Spatial for Box<S> {
    fn bounds(&self) -> BoundingBox {
        (**self).bounds()
    }
}

impl<S: Spatial + ?Sized> Spatial for Rc<S> {
    fn bounds(&self) -> BoundingBox {
        (**self).bounds()
    }
}

impl<S: Spatial + ?Sized> Spatial for Arc<S> {
    fn bounds(&self) -> BoundingBox {
        (**self).bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing {
        bbox: BoundingBox,
    }

    impl Spatial for Thing {
        fn bounds(&self) -> BoundingBox {
            self.bbox.clone()
        }
    }

    #[test]
    fn test_handles_forward_bounds() {
        let bbox = BoundingBox::new(vec![0.0, 0.0], vec![1.0, 2.0]).unwrap();
        let thing = Arc::new(Thing { bbox: bbox.clone() });

        assert_eq!(thing.bounds(), bbox);
        assert_eq!((&thing).bounds(), bbox);
        assert_eq!(Box::new(Thing { bbox: bbox.clone() }).bounds(), bbox);
        assert_eq!(Rc::new(bbox.clone()).bounds(), bbox);
    }
}
