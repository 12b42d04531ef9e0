//! Deferred output values.
//!
//! An [`Output`] is a write-once value that a resource declaration exposes
//! before the underlying resource exists. Dependent declarations reference it
//! freely; the realization engine resolves it once the resource is created.
//! Combinators registered on outputs are pure and memoized, so each runs at
//! most once over resolved inputs.
//!
//! Outputs carry a secret flag. Secretness is sticky: any combinator over a
//! secret input yields a secret result, and a secret value is never printed
//! by the `Debug` implementation.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::resource::NodeId;

enum Source<T> {
    /// A plain cell, resolved exactly once by the engine (or at construction).
    Cell(RwLock<Option<T>>),
    /// A derived value: thunk over other outputs, memoized on first success.
    Derived {
        thunk: Box<dyn Fn() -> Option<T> + Send + Sync>,
        memo: RwLock<Option<T>>,
    },
}

struct Inner<T> {
    source: Source<T>,
    secret: bool,
    /// Nodes whose realization this value waits on.
    deps: Vec<NodeId>,
}

/// A deferred, possibly secret value resolved by the realization engine.
pub struct Output<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Output<T> {
    fn from_parts(source: Source<T>, secret: bool, mut deps: Vec<NodeId>) -> Self {
        deps.sort_unstable();
        deps.dedup();
        Self {
            inner: Arc::new(Inner {
                source,
                secret,
                deps,
            }),
        }
    }

    /// An output already holding a known value.
    pub fn resolved(value: T) -> Self {
        Self::from_parts(Source::Cell(RwLock::new(Some(value))), false, Vec::new())
    }

    /// An output holding a known value classified as secret.
    pub fn secret(value: T) -> Self {
        Self::from_parts(Source::Cell(RwLock::new(Some(value))), true, Vec::new())
    }

    /// An unresolved cell owned by the resource realized as `deps`.
    pub fn pending(deps: Vec<NodeId>) -> Self {
        Self::from_parts(Source::Cell(RwLock::new(None)), false, deps)
    }

    /// An unresolved secret cell.
    pub fn pending_secret(deps: Vec<NodeId>) -> Self {
        Self::from_parts(Source::Cell(RwLock::new(None)), true, deps)
    }

    /// Whether the value is classified as secret.
    pub fn is_secret(&self) -> bool {
        self.inner.secret
    }

    /// Nodes this value waits on, in ascending order.
    pub fn deps(&self) -> &[NodeId] {
        &self.inner.deps
    }

    /// Resolve a pending cell. Cells are write-once; resolving twice or
    /// resolving a derived output is an error.
    pub fn resolve(&self, value: T) -> CoreResult<()> {
        match &self.inner.source {
            Source::Cell(cell) => {
                let mut guard = cell.write();
                if guard.is_some() {
                    return Err(CoreError::AlreadyResolved);
                }
                *guard = Some(value);
                Ok(())
            }
            Source::Derived { .. } => Err(CoreError::NotResolvable),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Output<T> {
    /// The resolved value, if available. Derived outputs evaluate their
    /// combinator on first success and memoize the result.
    pub fn try_get(&self) -> Option<T> {
        match &self.inner.source {
            Source::Cell(cell) => cell.read().clone(),
            Source::Derived { thunk, memo } => {
                if let Some(v) = memo.read().clone() {
                    return Some(v);
                }
                let computed = thunk()?;
                let mut guard = memo.write();
                if guard.is_none() {
                    *guard = Some(computed);
                }
                guard.clone()
            }
        }
    }

    /// Whether the value has resolved.
    pub fn is_resolved(&self) -> bool {
        self.try_get().is_some()
    }

    /// Register a pure combinator over this value, producing a derived
    /// output. Secretness propagates.
    pub fn apply<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let src = self.clone();
        Output::from_parts(
            Source::Derived {
                thunk: Box::new(move || src.try_get().map(&f)),
                memo: RwLock::new(None),
            },
            self.inner.secret,
            self.inner.deps.clone(),
        )
    }

    /// Combine two outputs into a pair.
    pub fn zip<U>(&self, other: &Output<U>) -> Output<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let a = self.clone();
        let b = other.clone();
        let mut deps = self.inner.deps.clone();
        deps.extend_from_slice(&other.inner.deps);
        Output::from_parts(
            Source::Derived {
                thunk: Box::new(move || Some((a.try_get()?, b.try_get()?))),
                memo: RwLock::new(None),
            },
            self.inner.secret || other.inner.secret,
            deps,
        )
    }

    /// The value rendered for plans and logs: secrets are always redacted,
    /// unresolved values shown as a placeholder.
    pub fn display_value(&self) -> String
    where
        T: fmt::Display,
    {
        if self.inner.secret {
            return "[secret]".to_string();
        }
        match self.try_get() {
            Some(v) => v.to_string(),
            None => "<unresolved>".to_string(),
        }
    }
}

/// Combine three outputs into a triple, for combinators over three inputs.
pub fn tuple3<A, B, C>(a: &Output<A>, b: &Output<B>, c: &Output<C>) -> Output<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    a.zip(b).zip(c).apply(|((a, b), c)| (a, b, c))
}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.secret {
            return f.write_str("Output([secret])");
        }
        match self.try_get() {
            Some(v) => write!(f, "Output({v:?})"),
            None => f.write_str("Output(<unresolved>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::NodeId;

    #[test]
    fn resolved_value_is_available() {
        let out = Output::resolved("hello".to_string());
        assert_eq!(out.try_get().as_deref(), Some("hello"));
        assert!(!out.is_secret());
    }

    #[test]
    fn pending_cell_resolves_once() {
        let out: Output<String> = Output::pending(vec![NodeId(1)]);
        assert!(out.try_get().is_none());

        out.resolve("v".to_string()).unwrap();
        assert_eq!(out.try_get().as_deref(), Some("v"));

        assert!(matches!(
            out.resolve("w".to_string()),
            Err(CoreError::AlreadyResolved)
        ));
    }

    #[test]
    fn apply_waits_for_input() {
        let base: Output<String> = Output::pending(vec![NodeId(3)]);
        let derived = base.apply(|v| format!("{v}!"));

        assert!(derived.try_get().is_none());
        base.resolve("ready".to_string()).unwrap();
        assert_eq!(derived.try_get().as_deref(), Some("ready!"));
        assert_eq!(derived.deps(), &[NodeId(3)]);
    }

    #[test]
    fn derived_output_rejects_direct_resolution() {
        let base = Output::resolved(1u32);
        let derived = base.apply(|v| v + 1);
        assert!(matches!(derived.resolve(5), Err(CoreError::NotResolvable)));
    }

    #[test]
    fn secret_propagates_through_combinators() {
        let pwd = Output::secret("hunter2".to_string());
        let plain = Output::resolved("db".to_string());
        let combined = pwd.zip(&plain).apply(|(p, d)| format!("{d}:{p}"));

        assert!(combined.is_secret());
        assert_eq!(combined.display_value(), "[secret]");
        assert_eq!(format!("{combined:?}"), "Output([secret])");
        // The value itself is still reachable for the engine.
        assert_eq!(combined.try_get().as_deref(), Some("db:hunter2"));
    }

    #[test]
    fn tuple3_merges_deps() {
        let a: Output<String> = Output::pending(vec![NodeId(2)]);
        let b: Output<String> = Output::pending(vec![NodeId(1)]);
        let c = Output::resolved("x".to_string());
        let t = tuple3(&a, &b, &c);

        assert_eq!(t.deps(), &[NodeId(1), NodeId(2)]);
        a.resolve("a".to_string()).unwrap();
        assert!(t.try_get().is_none());
        b.resolve("b".to_string()).unwrap();
        assert_eq!(
            t.try_get(),
            Some(("a".to_string(), "b".to_string(), "x".to_string()))
        );
    }
}
