//! Secret value wrappers.
//!
//! Credentials and card data are carried inside [`Secret`] so that a stray
//! `Debug` format can never leak them; access to the inner value is explicit
//! through [`PeekInterface`] or [`ExposeInterface`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Controls how a masked value renders in debug output.
pub trait Strategy<T> {
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Default strategy: print only the type name of the masked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithType {}

impl<T> Strategy<T> for WithType {
    fn fmt(_val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*** {} ***", std::any::type_name::<T>())
    }
}

/// A value that must not appear in logs or debug output.
///
/// Serialization passes the inner value through untouched, since wire
/// requests legitimately contain card numbers and keys; the transcript
/// scrubber is responsible for log safety on that path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret<T, S = WithType>(T, std::marker::PhantomData<S>);

impl<T, S> Secret<T, S> {
    pub fn new(value: T) -> Self {
        Self(value, std::marker::PhantomData)
    }
}

/// Borrow the inner value without consuming the secret.
pub trait PeekInterface<T> {
    fn peek(&self) -> &T;
}

/// Consume the secret, returning the inner value.
pub trait ExposeInterface<T> {
    fn expose(self) -> T;
}

impl<T, S> PeekInterface<T> for Secret<T, S> {
    fn peek(&self) -> &T {
        &self.0
    }
}

impl<T, S> ExposeInterface<T> for Secret<T, S> {
    fn expose(self) -> T {
        self.0
    }
}

impl<T, S> From<T> for Secret<T, S> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T, S: Strategy<T>> fmt::Debug for Secret<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        S::fmt(&self.0, f)
    }
}

impl<T: Default, S> Default for Secret<T, S> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Serialize, S> Serialize for Secret<T, S> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, S> Deserialize<'de> for Secret<T, S> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::new)
    }
}

/// A value that is either plain or masked, used for header lists so that
/// authorization headers keep their masking through debug output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Maskable<T> {
    Masked(Secret<T>),
    Normal(T),
}

impl<T> Maskable<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Masked(secret) => secret.expose(),
            Self::Normal(value) => value,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked(_))
    }
}

impl<T> From<T> for Maskable<T> {
    fn from(value: T) -> Self {
        Self::Normal(value)
    }
}

impl<T> From<Secret<T>> for Maskable<T> {
    fn from(value: Secret<T>) -> Self {
        Self::Masked(value)
    }
}
