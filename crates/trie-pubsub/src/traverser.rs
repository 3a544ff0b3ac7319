// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Traversal strategies.
//!
//! A publisher hands the engine a [`Traverser`] alongside the data. At every
//! node reached, the engine asks it for the step at index 0, 1, 2, ... until it
//! answers `None`. Each [`Step`] names a child segment and, optionally, the
//! strategy to use below that child. Without one, the branch keeps the current
//! strategy.
//!
//! # Shapes
//!
//! ```text
//! flat:      idx 0 -> (a, S)   idx 1 -> (b, S)           one continuation
//! combined:  idx 0 -> (x, S1)  idx 1 -> (y, S2) ...      one per sub-strategy
//! ```
//!
//! Both are served by the same `at` call; the engine does not distinguish
//! them. Strategies are usually written by hand or emitted by a generator from
//! a data type's field layout; the stock ones here cover the common cases.

use crate::segment::PathSegment;
use std::fmt;
use std::sync::Arc;

/// One traversal step: the child segment plus an optional continuation.
pub struct Step<T: ?Sized> {
    pub segment: PathSegment,
    pub next: Option<Arc<dyn Traverser<T>>>,
}

impl<T: ?Sized> Step<T> {
    /// Step that keeps the current strategy below `segment`.
    pub fn new(segment: impl Into<PathSegment>) -> Self {
        Self {
            segment: segment.into(),
            next: None,
        }
    }

    /// Step that switches to `next` below `segment`.
    pub fn with_next(segment: impl Into<PathSegment>, next: Arc<dyn Traverser<T>>) -> Self {
        Self {
            segment: segment.into(),
            next: Some(next),
        }
    }
}

impl<T: ?Sized> Clone for Step<T> {
    fn clone(&self) -> Self {
        Self {
            segment: self.segment.clone(),
            next: self.next.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("segment", &self.segment)
            .field("has_next", &self.next.is_some())
            .finish()
    }
}

/// Computes, per node, which children a data item continues toward.
///
/// `at` must answer `Some` for a contiguous prefix of indices and `None` from
/// then on, for a given `(data, path)`. It should be pure: the engine may call
/// it more than once for the same index.
pub trait Traverser<T: ?Sized>: Send + Sync {
    /// Step at `idx` for `data` sitting at `path`, or `None` when exhausted.
    fn at(&self, idx: usize, data: &T, path: &[PathSegment]) -> Option<Step<T>>;
}

impl<T: ?Sized, X: Traverser<T> + ?Sized> Traverser<T> for Arc<X> {
    fn at(&self, idx: usize, data: &T, path: &[PathSegment]) -> Option<Step<T>> {
        (**self).at(idx, data, path)
    }
}

/// Closure adapter, see [`traverser_fn`].
pub struct FnTraverser<F>(F);

/// Wrap a closure `(idx, data, path) -> Option<Step<T>>` as a strategy.
pub fn traverser_fn<T, F>(f: F) -> FnTraverser<F>
where
    T: ?Sized,
    F: Fn(usize, &T, &[PathSegment]) -> Option<Step<T>> + Send + Sync,
{
    FnTraverser(f)
}

impl<T, F> Traverser<T> for FnTraverser<F>
where
    T: ?Sized,
    F: Fn(usize, &T, &[PathSegment]) -> Option<Step<T>> + Send + Sync,
{
    fn at(&self, idx: usize, data: &T, path: &[PathSegment]) -> Option<Step<T>> {
        (self.0)(idx, data, path)
    }
}

/// Yields nothing: ends every branch it is attached to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Done;

impl<T: ?Sized> Traverser<T> for Done {
    fn at(&self, _idx: usize, _data: &T, _path: &[PathSegment]) -> Option<Step<T>> {
        None
    }
}

/// Fixed segments, no continuation.
#[derive(Debug, Clone, Default)]
pub struct FlatPaths {
    segments: Vec<PathSegment>,
}

impl FlatPaths {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: ?Sized> Traverser<T> for FlatPaths {
    fn at(&self, idx: usize, _data: &T, _path: &[PathSegment]) -> Option<Step<T>> {
        self.segments.get(idx).cloned().map(Step::new)
    }
}

/// Fixed segments sharing one continuation.
pub struct PathsWithTraverser<T: ?Sized> {
    segments: Vec<PathSegment>,
    next: Arc<dyn Traverser<T>>,
}

impl<T: ?Sized> PathsWithTraverser<T> {
    pub fn new<I, S>(segments: I, next: Arc<dyn Traverser<T>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            next,
        }
    }
}

impl<T: ?Sized> Traverser<T> for PathsWithTraverser<T> {
    fn at(&self, idx: usize, _data: &T, _path: &[PathSegment]) -> Option<Step<T>> {
        self.segments
            .get(idx)
            .map(|segment| Step::with_next(segment.clone(), Arc::clone(&self.next)))
    }
}

/// Explicit list of steps, each with its own continuation.
pub struct PathAndTraversers<T: ?Sized> {
    steps: Vec<Step<T>>,
}

impl<T: ?Sized> PathAndTraversers<T> {
    #[must_use]
    pub fn new(steps: Vec<Step<T>>) -> Self {
        Self { steps }
    }
}

impl<T: ?Sized> Traverser<T> for PathAndTraversers<T> {
    fn at(&self, idx: usize, _data: &T, _path: &[PathSegment]) -> Option<Step<T>> {
        self.steps.get(idx).cloned()
    }
}

/// Several independent strategies concatenated into one index space.
///
/// Used for peer fields of a record or the variants of a tagged union: each
/// part keeps descending with its own strategy. A part's step without a
/// continuation continues with that part, not with the combination.
///
/// `at(idx)` re-counts the steps of every part before the one holding `idx`,
/// so enumerating a node costs `O(parts * steps^2)` calls to the parts. Keep
/// parts short or precompute a [`PathAndTraversers`] for wide levels.
pub struct CombinedPaths<T: ?Sized> {
    parts: Vec<Arc<dyn Traverser<T>>>,
}

impl<T: ?Sized> CombinedPaths<T> {
    #[must_use]
    pub fn new(parts: Vec<Arc<dyn Traverser<T>>>) -> Self {
        Self { parts }
    }
}

impl<T: ?Sized> Traverser<T> for CombinedPaths<T> {
    fn at(&self, idx: usize, data: &T, path: &[PathSegment]) -> Option<Step<T>> {
        let mut local = idx;
        for part in &self.parts {
            if let Some(mut step) = part.at(local, data, path) {
                if step.next.is_none() {
                    step.next = Some(Arc::clone(part));
                }
                return Some(step);
            }
            // `local` is past this part's end, so its length is below `local`.
            let len = (0..local)
                .take_while(|&i| part.at(i, data, path).is_some())
                .count();
            local = local.saturating_sub(len);
        }
        None
    }
}

/// Follows a single fixed path: at depth `n` it yields the `n`-th segment.
#[derive(Debug, Clone, Default)]
pub struct LinearTraverser {
    path: Vec<PathSegment>,
}

impl LinearTraverser {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: ?Sized> Traverser<T> for LinearTraverser {
    fn at(&self, idx: usize, _data: &T, path: &[PathSegment]) -> Option<Step<T>> {
        if idx != 0 {
            return None;
        }
        self.path.get(path.len()).cloned().map(Step::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::to_path;

    fn collect<T: ?Sized>(t: &dyn Traverser<T>, data: &T, path: &[PathSegment]) -> Vec<Step<T>> {
        (0..).map_while(|i| t.at(i, data, path)).collect()
    }

    fn segments<T: ?Sized>(steps: &[Step<T>]) -> Vec<PathSegment> {
        steps.iter().map(|s| s.segment.clone()).collect()
    }

    #[test]
    fn test_done_yields_nothing() {
        assert!(collect::<str>(&Done, "x", &[]).is_empty());
    }

    #[test]
    fn test_flat_paths() {
        let t = FlatPaths::new(["a", "b"]);
        let steps = collect::<str>(&t, "x", &[]);

        assert_eq!(segments(&steps), to_path(["a", "b"]));
        assert!(steps.iter().all(|s| s.next.is_none()));
    }

    #[test]
    fn test_paths_with_traverser_share_continuation() {
        let next: Arc<dyn Traverser<str>> = Arc::new(Done);
        let t = PathsWithTraverser::new(["a", "b", "c"], Arc::clone(&next));
        let steps = collect::<str>(&t, "x", &[]);

        assert_eq!(steps.len(), 3);
        for step in &steps {
            let step_next = step.next.as_ref().expect("continuation");
            assert!(Arc::ptr_eq(step_next, &next));
        }
    }

    #[test]
    fn test_path_and_traversers() {
        let done: Arc<dyn Traverser<str>> = Arc::new(Done);
        let t = PathAndTraversers::new(vec![Step::new("a"), Step::with_next(1i64, done)]);
        let steps = collect::<str>(&t, "x", &[]);

        assert_eq!(segments(&steps), vec![PathSegment::from("a"), PathSegment::from(1i64)]);
        assert!(steps[0].next.is_none());
        assert!(steps[1].next.is_some());
    }

    #[test]
    fn test_combined_paths_concatenate_index_space() {
        let first: Arc<dyn Traverser<str>> = Arc::new(FlatPaths::new(["a", "b"]));
        let empty: Arc<dyn Traverser<str>> = Arc::new(Done);
        let second: Arc<dyn Traverser<str>> = Arc::new(FlatPaths::new(["c"]));
        let t = CombinedPaths::new(vec![
            Arc::clone(&first),
            Arc::clone(&empty),
            Arc::clone(&second),
        ]);
        let steps = collect::<str>(&t, "x", &[]);

        assert_eq!(segments(&steps), to_path(["a", "b", "c"]));
        // Steps without their own continuation continue with their part.
        assert!(Arc::ptr_eq(steps[0].next.as_ref().expect("next"), &first));
        assert!(Arc::ptr_eq(steps[1].next.as_ref().expect("next"), &first));
        assert!(Arc::ptr_eq(steps[2].next.as_ref().expect("next"), &second));
        assert!(t.at(3, "x", &[]).is_none());
    }

    /// Counts calls to the wrapped strategy.
    struct Counting {
        inner: FlatPaths,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Traverser<str> for Counting {
        fn at(&self, idx: usize, data: &str, path: &[PathSegment]) -> Option<Step<str>> {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.at(idx, data, path)
        }
    }

    #[test]
    fn test_combined_paths_bounded_part_calls() {
        let counting = Arc::new(Counting {
            inner: FlatPaths::new(["a", "b", "c"]),
            calls: Default::default(),
        });
        let first: Arc<dyn Traverser<str>> = counting.clone();
        let second: Arc<dyn Traverser<str>> = Arc::new(FlatPaths::new(["d", "e", "f"]));
        let t = CombinedPaths::new(vec![first, second]);

        let steps = collect::<str>(&t, "x", &[]);
        assert_eq!(segments(&steps), to_path(["a", "b", "c", "d", "e", "f"]));

        // Indices 0..3 hit the part directly. Each of the 4 later indices
        // (the terminating one included) probes once, then re-counts the part
        // up to at most the index: 3 + (1 + 3) + 3 * (1 + 4).
        let calls = counting.calls.load(std::sync::atomic::Ordering::SeqCst);
        assert_eq!(calls, 22);
    }

    #[test]
    fn test_combined_paths_keep_explicit_continuation() {
        let done: Arc<dyn Traverser<str>> = Arc::new(Done);
        let part: Arc<dyn Traverser<str>> =
            Arc::new(PathsWithTraverser::new(["a"], Arc::clone(&done)));
        let t = CombinedPaths::new(vec![part]);

        let step = t.at(0, "x", &[]).expect("step");
        assert!(Arc::ptr_eq(step.next.as_ref().expect("next"), &done));
    }

    #[test]
    fn test_linear_traverser_follows_depth() {
        let t = LinearTraverser::new(["a", "b"]);

        assert_eq!(segments(&collect::<str>(&t, "x", &[])), to_path(["a"]));
        assert_eq!(segments(&collect::<str>(&t, "x", &to_path(["a"]))), to_path(["b"]));
        assert!(collect::<str>(&t, "x", &to_path(["a", "b"])).is_empty());
    }

    #[test]
    fn test_fn_traverser_sees_data_and_path() {
        let t = traverser_fn(|idx: usize, data: &String, path: &[PathSegment]| {
            if idx == 0 && path.is_empty() {
                Some(Step::new(data.clone()))
            } else {
                None
            }
        });

        let data = "hello".to_string();
        let steps = collect::<String>(&t, &data, &[]);
        assert_eq!(segments(&steps), to_path(["hello"]));
        assert!(collect::<String>(&t, &data, &to_path(["hello"])).is_empty());
    }
}
