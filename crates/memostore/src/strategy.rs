// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Composition of several producers into one factory.
//!
//! A builder collects producers in a tuple, one slot per value. When the
//! repository is built the tuple becomes a single [`Factory`] whose output is
//! the tuple of values, computed either in declared order or concurrently
//! with an all-or-nothing join.

use ohno::EnrichableExt;

use crate::producer::{Factory, Producer};
use crate::{Error, Execution};

mod sealed {
    pub(crate) trait Sealed {}
}

use sealed::Sealed;

/// Producer collections that can grow by one value slot.
///
/// This trait is sealed. It is implemented for `()` and for tuples of one to
/// six [`Producer`]s, which caps a repository at seven values per key.
#[expect(private_bounds, reason = "intentionally sealed trait pattern")]
pub trait Append<K, V>: Sealed {
    /// The collection after appending a producer of `V`.
    type Output;

    /// Appends `producer` as the last value slot.
    fn append(self, producer: Producer<K, V>) -> Self::Output;
}

/// Producer collections that can be turned into a [`Factory`].
///
/// This trait is sealed. It is implemented for tuples of one to seven
/// [`Producer`]s and for a pre-composed [`Factory`], which ignores the
/// requested [`Execution`].
#[expect(private_bounds, reason = "intentionally sealed trait pattern")]
pub trait IntoFactory<K>: Sealed {
    /// The values an entry holds: the bare value for one producer, a tuple otherwise.
    type Values;

    /// Builds the factory for the given strategy.
    fn into_factory(self, execution: Execution) -> Factory<K, Self::Values>;
}

/// Positional access to one value of a multi-value entry.
///
/// Implemented for every position of tuples with two to seven elements.
///
/// # Examples
///
/// ```
/// use memostore::Field;
///
/// let values = (1_u8, "two", 3.0_f32);
/// assert_eq!(<_ as Field<1>>::into_field(values), "two");
/// ```
pub trait Field<const I: usize> {
    /// The type of the value at position `I`.
    type Output;

    /// Consumes the tuple and returns the value at position `I`.
    fn into_field(self) -> Self::Output;
}

impl Sealed for () {}

impl<K, V> Append<K, V> for () {
    type Output = (Producer<K, V>,);

    fn append(self, producer: Producer<K, V>) -> Self::Output {
        (producer,)
    }
}

impl<K, T> Sealed for Factory<K, T> {}

impl<K, T> IntoFactory<K> for Factory<K, T> {
    type Values = T;

    fn into_factory(self, _execution: Execution) -> Factory<K, T> {
        self
    }
}

impl<K, V> Sealed for (Producer<K, V>,) {}

impl<K, V> IntoFactory<K> for (Producer<K, V>,) {
    type Values = V;

    fn into_factory(self, _execution: Execution) -> Factory<K, V> {
        self.0.into()
    }
}

fn failure<V>(slot: Option<Result<V, Error>>) -> Option<Error> {
    match slot {
        Some(Ok(_)) => None,
        Some(Err(error)) => Some(error),
        None => Some(Error::computation("producer did not complete")),
    }
}

/// Folds the failures of a parallel cohort into one error.
///
/// The first failure in declared order becomes the reported error.
fn aggregate(total: usize, failures: impl IntoIterator<Item = Option<Error>>) -> Error {
    let failures: Vec<Error> = failures.into_iter().flatten().collect();
    for error in &failures {
        tracing::debug!(error = %error, "repository.producer_failed");
    }

    let count = failures.len();
    failures.into_iter().next().map_or_else(
        || Error::computation("producer cohort failed without an error"),
        |first| first.enrich(format!("{count} of {total} producers failed")),
    )
}

/// One producer's pending result inside a parallel cohort.
struct Slot<'a, K, V> {
    producer: &'a Producer<K, V>,
    result: Option<Result<V, Error>>,
}

impl<'a, K, V> Slot<'a, K, V> {
    fn new(producer: &'a Producer<K, V>) -> Self {
        Self { producer, result: None }
    }

    fn fill(&mut self, key: &K) {
        self.result = Some(self.producer.produce(key));
    }
}

macro_rules! impl_append {
    ($(($V:ident, $p:ident)),+) => {
        impl<K, $($V,)+ V> Append<K, V> for ($(Producer<K, $V>,)+) {
            type Output = ($(Producer<K, $V>,)+ Producer<K, V>);

            fn append(self, producer: Producer<K, V>) -> Self::Output {
                let ($($p,)+) = self;
                ($($p,)+ producer)
            }
        }
    };
}

impl_append!((V1, p1));
impl_append!((V1, p1), (V2, p2));
impl_append!((V1, p1), (V2, p2), (V3, p3));
impl_append!((V1, p1), (V2, p2), (V3, p3), (V4, p4));
impl_append!((V1, p1), (V2, p2), (V3, p3), (V4, p4), (V5, p5));
impl_append!((V1, p1), (V2, p2), (V3, p3), (V4, p4), (V5, p5), (V6, p6));

macro_rules! impl_into_factory {
    ($count:literal; $(($V:ident, $p:ident)),+) => {
        impl<K, $($V),+> Sealed for ($(Producer<K, $V>,)+) {}

        impl<K, $($V),+> IntoFactory<K> for ($(Producer<K, $V>,)+)
        where
            K: Sync + 'static,
            $($V: Send + 'static,)+
        {
            type Values = ($($V,)+);

            fn into_factory(self, execution: Execution) -> Factory<K, Self::Values> {
                let ($($p,)+) = self;
                match execution {
                    // Tuple expressions evaluate left to right, so `?` stops at the first failure.
                    Execution::Sequential => Factory::from_fn(move |key: &K| Ok(($($p.produce(key)?,)+))),
                    Execution::Parallel => Factory::from_fn(move |key: &K| {
                        let ($(mut $p,)+) = ($(Slot::new(&$p),)+);
                        rayon::scope(|scope| {
                            $(
                                let slot = &mut $p;
                                scope.spawn(move |_| slot.fill(key));
                            )+
                        });
                        match ($($p.result,)+) {
                            ($(Some(Ok($p)),)+) => Ok(($($p,)+)),
                            ($($p,)+) => Err(aggregate($count, [$(failure($p)),+])),
                        }
                    }),
                }
            }
        }
    };
}

impl_into_factory!(2; (V1, p1), (V2, p2));
impl_into_factory!(3; (V1, p1), (V2, p2), (V3, p3));
impl_into_factory!(4; (V1, p1), (V2, p2), (V3, p3), (V4, p4));
impl_into_factory!(5; (V1, p1), (V2, p2), (V3, p3), (V4, p4), (V5, p5));
impl_into_factory!(6; (V1, p1), (V2, p2), (V3, p3), (V4, p4), (V5, p5), (V6, p6));
impl_into_factory!(7; (V1, p1), (V2, p2), (V3, p3), (V4, p4), (V5, p5), (V6, p6), (V7, p7));

macro_rules! impl_field {
    (@one ($($T:ident),+) $index:tt $Out:ident) => {
        impl<$($T),+> Field<$index> for ($($T,)+) {
            type Output = $Out;

            fn into_field(self) -> Self::Output {
                self.$index
            }
        }
    };
    ($tuple:tt; $($index:tt => $Out:ident),+) => {
        $( impl_field!(@one $tuple $index $Out); )+
    };
}

impl_field!((A, B); 0 => A, 1 => B);
impl_field!((A, B, C); 0 => A, 1 => B, 2 => C);
impl_field!((A, B, C, D); 0 => A, 1 => B, 2 => C, 3 => D);
impl_field!((A, B, C, D, E); 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_field!((A, B, C, D, E, F); 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_field!((A, B, C, D, E, F, G); 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
