// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability set a value needs to be stored in a tree.

use std::rc::Rc;
use std::sync::Arc;

use crate::types::{Bound, Vec3i};

/// An entity located in space.
///
/// Trees only ever look at [`id`](Self::id) and [`location`](Self::location).
/// [`bound`](Self::bound) is consumed by bounding-volume backends and defaults to a
/// degenerate box at the location.
///
/// Trees store entities by value and hand out clones from searches, so large payloads
/// are best stored behind `Rc`/`Arc` (which implement `Spatial` when their target does).
pub trait Spatial {
    /// Stable identifier, unique within one tree.
    fn id(&self) -> i64;

    /// Position in the tree's integer coordinate space.
    fn location(&self) -> Vec3i;

    /// Extent of the entity.
    fn bound(&self) -> Bound {
        let p = self.location();
        Bound::new(p, p)
    }
}

macro_rules! forward_spatial {
    ($($ptr:ty),*) => {
        $(
            impl<T: Spatial + ?Sized> Spatial for $ptr {
                #[inline]
                fn id(&self) -> i64 {
                    (**self).id()
                }

                #[inline]
                fn location(&self) -> Vec3i {
                    (**self).location()
                }

                #[inline]
                fn bound(&self) -> Bound {
                    (**self).bound()
                }
            }
        )*
    };
}

forward_spatial!(&T, Box<T>, Rc<T>, Arc<T>);
