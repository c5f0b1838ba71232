//! Ordered locator strategies with "first match wins" resolution.
//!
//! A fallback chain is plain data: a slice of named lookup functions tried in
//! declared order. Resolution short-circuits on the first strategy that yields
//! a value; later strategies are never evaluated.
//!
//! ```
//! use critic_core::strategy::{Strategy, first_match};
//!
//! fn even(n: u32) -> Option<&'static str> { (n % 2 == 0).then_some("even") }
//! fn small(n: u32) -> Option<&'static str> { (n < 10).then_some("small") }
//!
//! const CHAIN: &[Strategy<fn(u32) -> Option<&'static str>>] = &[
//!     Strategy::new("even", even),
//!     Strategy::new("small", small),
//! ];
//!
//! assert_eq!(first_match(CHAIN, |f| f(4)), Some(("even", "even")));
//! assert_eq!(first_match(CHAIN, |f| f(3)), Some(("small", "small")));
//! assert_eq!(first_match(CHAIN, |f| f(11)), None);
//! ```

/// A named lookup function.
#[derive(Debug, Clone, Copy)]
pub struct Strategy<F> {
    pub name: &'static str,
    pub locate: F,
}

impl<F> Strategy<F> {
    pub const fn new(name: &'static str, locate: F) -> Self {
        Self { name, locate }
    }
}

/// Apply strategies in order and return the first value produced, tagged with
/// the name of the strategy that produced it.
///
/// `apply` receives each strategy's lookup function; it owns the call so the
/// function type may carry higher-ranked lifetimes (e.g. borrowing a parsed tree).
pub fn first_match<F, V>(
    strategies: &[Strategy<F>],
    mut apply: impl FnMut(&F) -> Option<V>,
) -> Option<(&'static str, V)> {
    strategies
        .iter()
        .find_map(|s| apply(&s.locate).map(|v| (s.name, v)))
}

/// Like [`first_match`] but discards the winning strategy's name.
pub fn resolve<F, V>(strategies: &[Strategy<F>], apply: impl FnMut(&F) -> Option<V>) -> Option<V> {
    first_match(strategies, apply).map(|(_, v)| v)
}
