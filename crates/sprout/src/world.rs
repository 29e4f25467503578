//! Process-wide registry of compiled example trees.
//!
//! The [`World`] maps each spec type to a [`SpecRoot`] slot. Slots are
//! created lazily under the registry lock and never removed; each slot
//! compiles its tree at most once, even when several threads trigger first
//! use at the same time.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, error};

use crate::dsl::SpecBuilder;
use crate::error::SpecError;
use crate::group::ExampleGroup;
use crate::spec::Spec;
use crate::unwind;

/// Tracing target for registry and compilation events.
const WORLD_TARGET: &str = "sprout::world";

static SHARED: OnceLock<World> = OnceLock::new();

/// Registry of root groups keyed by spec type.
#[derive(Debug, Default)]
pub struct World {
    roots: Mutex<HashMap<TypeId, Arc<SpecRoot>>>,
}

impl World {
    /// Creates an empty registry, independent of the shared one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    #[must_use]
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::new)
    }

    /// Returns the root slot for `S`, creating an empty one on first call.
    ///
    /// Concurrent callers asking for the same type receive the same slot.
    #[must_use]
    pub fn root_for<S: Spec>(&self) -> Arc<SpecRoot> {
        // The map is insert-only, so a poisoned lock still guards a
        // consistent map.
        let mut roots = self.roots.lock().unwrap_or_else(PoisonError::into_inner);
        let root = roots.entry(TypeId::of::<S>()).or_insert_with(|| {
            debug!(target: WORLD_TARGET, spec = S::name(), "registering spec root");
            Arc::new(SpecRoot::new(S::name(), S::spec))
        });
        Arc::clone(root)
    }

    /// Number of spec types registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no spec type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The root slot of a single spec type.
pub struct SpecRoot {
    name: &'static str,
    build: fn(&mut SpecBuilder),
    compiled: OnceLock<Result<Arc<ExampleGroup>, SpecError>>,
    compilations: AtomicUsize,
}

impl SpecRoot {
    fn new(name: &'static str, build: fn(&mut SpecBuilder)) -> Self {
        Self {
            name,
            build,
            compiled: OnceLock::new(),
            compilations: AtomicUsize::new(0),
        }
    }

    /// Name of the spec type this slot belongs to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Builds the example tree on first call and returns the cached result
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Compilation`] when the spec-building closure
    /// panicked. The error is cached: every later call observes it too.
    pub fn compile(&self) -> Result<Arc<ExampleGroup>, SpecError> {
        self.compiled.get_or_init(|| self.build_tree()).clone()
    }

    /// Whether compilation has already run.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// How many times the spec-building closure has been invoked.
    #[must_use]
    pub fn compilation_count(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }

    fn build_tree(&self) -> Result<Arc<ExampleGroup>, SpecError> {
        self.compilations.fetch_add(1, Ordering::SeqCst);
        debug!(target: WORLD_TARGET, spec = self.name, "compiling example tree");

        let build = self.build;
        let mut builder = SpecBuilder::new(ExampleGroup::root());
        match panic::catch_unwind(AssertUnwindSafe(|| build(&mut builder))) {
            Ok(()) => {
                let root = builder.finish();
                debug!(
                    target: WORLD_TARGET,
                    spec = self.name,
                    examples = root.example_count(),
                    "example tree compiled"
                );
                Ok(Arc::new(root))
            }
            Err(payload) => {
                let failure = SpecError::Compilation {
                    spec: self.name,
                    message: unwind::panic_message(payload.as_ref()),
                };
                error!(
                    target: WORLD_TARGET,
                    spec = self.name,
                    error = %failure,
                    "example tree compilation failed"
                );
                Err(failure)
            }
        }
    }
}

impl fmt::Debug for SpecRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecRoot")
            .field("name", &self.name)
            .field("compiled", &self.compiled.get())
            .field("compilations", &self.compilation_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    static SLOW_BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct SlowSpec;

    impl Spec for SlowSpec {
        fn spec(s: &mut SpecBuilder) {
            SLOW_BUILDS.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(20));
            s.it("exists", || Ok(()));
        }
    }

    struct EmptySpec;

    impl Spec for EmptySpec {
        fn spec(_: &mut SpecBuilder) {}
    }

    struct BrokenSpec;

    impl Spec for BrokenSpec {
        fn spec(s: &mut SpecBuilder) {
            s.describe("Broken", |_| {
                assert_eq!(1 + 1, 3, "evaluated during compilation");
            });
        }
    }

    #[test]
    fn new_world_is_empty() {
        let world = World::new();
        assert!(world.is_empty());
    }

    #[test]
    fn root_for_is_idempotent_per_type() {
        let world = World::new();
        let first = world.root_for::<EmptySpec>();
        let second = world.root_for::<EmptySpec>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn distinct_types_get_distinct_roots() {
        let world = World::new();
        let empty = world.root_for::<EmptySpec>();
        let broken = world.root_for::<BrokenSpec>();
        assert!(!Arc::ptr_eq(&empty, &broken));
        assert_eq!(world.len(), 2);
        assert_eq!(empty.name(), "EmptySpec");
        assert_eq!(broken.name(), "BrokenSpec");
    }

    #[test]
    fn slots_start_uncompiled() {
        let world = World::new();
        let root = world.root_for::<EmptySpec>();
        assert!(!root.is_compiled());
        assert_eq!(root.compilation_count(), 0);
    }

    #[test]
    fn compile_runs_the_closure_once() {
        let world = World::new();
        let root = world.root_for::<EmptySpec>();
        let first = root.compile().expect("first compile");
        let second = root.compile().expect("second compile");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(root.compilation_count(), 1);
        assert!(root.is_compiled());
    }

    #[test]
    fn compilation_panics_become_cached_errors() {
        let world = World::new();
        let root = world.root_for::<BrokenSpec>();
        let err = root.compile().expect_err("compilation fails");
        assert!(matches!(err, SpecError::Compilation { spec: "BrokenSpec", .. }));
        assert!(err.to_string().contains("evaluated during compilation"));

        let again = root.compile().expect_err("error is cached");
        assert_eq!(err, again);
        assert_eq!(root.compilation_count(), 1);
    }

    #[test]
    fn concurrent_first_use_builds_one_tree() {
        const THREADS: usize = 8;
        let world = Arc::new(World::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let world = Arc::clone(&world);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let root = world.root_for::<SlowSpec>();
                    let tree = root.compile().expect("compile");
                    (root, tree)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread joins"))
            .collect();

        let (first_root, first_tree) = results.first().expect("at least one result");
        for (root, tree) in &results {
            assert!(Arc::ptr_eq(first_root, root));
            assert!(Arc::ptr_eq(first_tree, tree));
        }
        assert_eq!(first_root.compilation_count(), 1);
        assert_eq!(SLOW_BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(world.len(), 1);
    }
}
