//! Registry entries for initialized feature slices.
//!
//! Each feature crate exposes one shared state type. The server boxes it into an
//! [`InitializedSlice`] so `ApiState` can hold every feature in one map keyed by type.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

/// Feature state that can be shared across request tasks.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A type-erased feature slice together with its [`TypeId`].
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>(), state: Box::new(state) }
    }

    /// Borrows the concrete state back if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe(u8);

    impl FeatureSlice for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn downcast_round_trips_only_for_the_same_type() {
        let slice = InitializedSlice::new(Probe(7));
        assert_eq!(slice.id, TypeId::of::<Probe>());
        assert!(slice.name.ends_with("Probe"));
        assert_eq!(slice.downcast_ref::<Probe>().map(|p| p.0), Some(7));
    }
}
