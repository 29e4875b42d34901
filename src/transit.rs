//! Closed sum types returned by reactions: either no change, or a typed
//! request to transition to one of a statically-declared set of targets.
//!
//! The engine itself only ever sees the type-erased [`Outcome`]; the
//! [`TransitResultN`](TransitResult1) family exists so that user code keeps
//! an exhaustively-matchable, typed return value at the call site.

use std::any::TypeId;
use std::marker::PhantomData;

/// No state change.
pub struct TransitNone;

/// A typed request to transition to state `T`.
pub struct Transit<T>(PhantomData<T>);

impl<T> Transit<T> {
    pub fn new() -> Self {
        Transit(PhantomData)
    }
}

impl<T> Default for Transit<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine-internal, type-erased result of visiting a [`TransitResultN`]
/// value: either nothing happened, or a transition to the state identified
/// by `TypeId` must be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    None,
    To(TypeId),
}

pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for TransitNone {
    fn into_outcome(self) -> Outcome {
        Outcome::None
    }
}

impl<T: 'static> IntoOutcome for Transit<T> {
    fn into_outcome(self) -> Outcome {
        Outcome::To(TypeId::of::<T>())
    }
}

macro_rules! transit_result {
    ($name:ident, $($var:ident => $variant:ident : $ty:ident),+) => {
        #[doc = concat!("A reaction result over ", stringify!($name), " statically-declared targets.")]
        pub enum $name<$($ty: 'static),+> {
            None,
            $($variant(Transit<$ty>)),+
        }

        impl<$($ty: 'static),+> $name<$($ty),+> {
            pub fn none() -> Self {
                $name::None
            }

            $(
                pub fn $var() -> Self {
                    $name::$variant(Transit::new())
                }
            )+
        }

        impl<$($ty: 'static),+> IntoOutcome for $name<$($ty),+> {
            fn into_outcome(self) -> Outcome {
                match self {
                    $name::None => Outcome::None,
                    $($name::$variant(t) => t.into_outcome(),)+
                }
            }
        }
    };
}

transit_result!(TransitResult1, to_a => ToA: A);
transit_result!(TransitResult2, to_a => ToA: A, to_b => ToB: B);
transit_result!(TransitResult3, to_a => ToA: A, to_b => ToB: B, to_c => ToC: C);
transit_result!(TransitResult4, to_a => ToA: A, to_b => ToB: B, to_c => ToC: C, to_d => ToD: D);
