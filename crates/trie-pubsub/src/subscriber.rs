// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscriber trait for receiving published data

/// Subscriber trait for receiving published data
///
/// # Thread Safety
/// Implementations must be Send + Sync as callbacks are invoked
/// inline on whichever thread calls `PubSub::publish`.
///
/// Closures taking `&T` implement this trait directly.
///
/// # Examples
/// ```
/// use trie_pubsub::Subscriber;
///
/// struct Printer {
///     name: String,
/// }
///
/// impl Subscriber<String> for Printer {
///     fn on_data(&self, data: &String) {
///         println!("{} <- {}", self.name, data);
///     }
/// }
/// ```
pub trait Subscriber<T: ?Sized>: Send + Sync {
    /// Called once for every publish routed to this subscription.
    ///
    /// # Panics
    /// A panic here is not caught: it unwinds out of `publish`, and
    /// deliveries already made for that publish are not undone.
    fn on_data(&self, data: &T);
}

impl<T, F> Subscriber<T> for F
where
    T: ?Sized,
    F: Fn(&T) + Send + Sync,
{
    fn on_data(&self, data: &T) {
        self(data);
    }
}
