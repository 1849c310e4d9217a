//! Type-erased storage for initialized feature slices.
//!
//! Each slice crate builds its state once at startup and hands it over as an
//! [`InitializedSlice`]; handlers later look it up by type.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Shared state of one feature slice.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    /// Stable slice name, e.g. `orders`.
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(name: &'static str, state: T) -> Self {
        Self { id: TypeId::of::<T>(), name, state: Box::new(state) }
    }

    /// Borrows the state as `T` when the types match.
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
