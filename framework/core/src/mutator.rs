use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;

/// Result type for mutator hooks and mutator factories.
///
/// This is an [anyhow::Result] so that mutators can use `?` on whatever they touch. The scenario
/// definition never wraps or recovers these errors.
pub type MutatorResult<T = ()> = anyhow::Result<T>;

/// Whether a build is a warm-up or part of the measured sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Phase {
    #[display("warm-up")]
    WarmUp,
    #[display("measured")]
    Measure,
}

/// Identifies the build a mutator hook is being called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    phase: Phase,
    iteration: u32,
}

impl BuildContext {
    /// Iterations count from 1 within each phase.
    pub fn new(phase: Phase, iteration: u32) -> Self {
        Self { phase, iteration }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// For example `warm-up build #2` or `measured build #10`.
    pub fn display_build_number(&self) -> String {
        format!("{} build #{}", self.phase, self.iteration)
    }
}

/// A reversible change to the build environment, applied around build iterations to simulate
/// incremental build conditions.
///
/// A mutator instance belongs to a single scenario run. Use a [BuildMutatorFactory] to get a
/// fresh one, since implementations are free to keep per-run state such as a counter or toggle.
///
/// All hooks default to doing nothing.
pub trait BuildMutator: Display + Send {
    /// Called once before the first build of the scenario.
    fn before_scenario(&mut self) -> MutatorResult {
        Ok(())
    }

    /// Called before the cleanup tasks run for a build.
    fn before_cleanup(&mut self, _context: &BuildContext) -> MutatorResult {
        Ok(())
    }

    /// Called after the cleanup tasks have run for a build.
    fn after_cleanup(&mut self, _context: &BuildContext) -> MutatorResult {
        Ok(())
    }

    /// Called before each warm-up and measured build.
    fn before_build(&mut self, _context: &BuildContext) -> MutatorResult {
        Ok(())
    }

    /// Called after each warm-up and measured build, with the build failure if there was one.
    fn after_build(
        &mut self,
        _context: &BuildContext,
        _failure: Option<&anyhow::Error>,
    ) -> MutatorResult {
        Ok(())
    }

    /// Called once after the last build of the scenario, even if a build failed.
    fn after_scenario(&mut self) -> MutatorResult {
        Ok(())
    }
}

/// A mutator that leaves the build untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBuildMutator;

impl Display for NoOpBuildMutator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "none")
    }
}

impl BuildMutator for NoOpBuildMutator {}

/// Applies several mutators as one.
///
/// Every hook is forwarded to the children in the order they were given, stopping at the first
/// child that fails.
pub struct CompositeBuildMutator {
    mutators: Vec<Box<dyn BuildMutator>>,
}

impl CompositeBuildMutator {
    pub fn new(mutators: Vec<Box<dyn BuildMutator>>) -> Self {
        Self { mutators }
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }

    fn for_each(
        &mut self,
        mut hook: impl FnMut(&mut dyn BuildMutator) -> MutatorResult,
    ) -> MutatorResult {
        for mutator in self.mutators.iter_mut() {
            hook(mutator.as_mut())?;
        }

        Ok(())
    }
}

impl Display for CompositeBuildMutator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.mutators.is_empty() {
            return write!(f, "none");
        }

        write!(f, "{}", self.mutators.iter().join(", "))
    }
}

impl BuildMutator for CompositeBuildMutator {
    fn before_scenario(&mut self) -> MutatorResult {
        self.for_each(|m| m.before_scenario())
    }

    fn before_cleanup(&mut self, context: &BuildContext) -> MutatorResult {
        self.for_each(|m| m.before_cleanup(context))
    }

    fn after_cleanup(&mut self, context: &BuildContext) -> MutatorResult {
        self.for_each(|m| m.after_cleanup(context))
    }

    fn before_build(&mut self, context: &BuildContext) -> MutatorResult {
        self.for_each(|m| m.before_build(context))
    }

    fn after_build(
        &mut self,
        context: &BuildContext,
        failure: Option<&anyhow::Error>,
    ) -> MutatorResult {
        self.for_each(|m| m.after_build(context, failure))
    }

    fn after_scenario(&mut self) -> MutatorResult {
        self.for_each(|m| m.after_scenario())
    }
}

type CreateMutatorFn = dyn Fn() -> MutatorResult<Box<dyn BuildMutator>> + Send + Sync;

/// Produces a new [BuildMutator] every time it is asked for one.
///
/// The factory is captured when a scenario is defined and shared by every clone of the scenario.
/// Whether it may be called from several threads at once is up to the closure it wraps; nothing
/// here serializes calls.
#[derive(Clone)]
pub struct BuildMutatorFactory {
    create_fn: Arc<CreateMutatorFn>,
}

impl BuildMutatorFactory {
    /// Wrap a closure that builds a mutator. Errors from the closure are passed back unchanged
    /// by [BuildMutatorFactory::create].
    pub fn new<M, F>(create_fn: F) -> Self
    where
        M: BuildMutator + 'static,
        F: Fn() -> MutatorResult<M> + Send + Sync + 'static,
    {
        Self {
            create_fn: Arc::new(move || {
                create_fn().map(|mutator| Box::new(mutator) as Box<dyn BuildMutator>)
            }),
        }
    }

    /// A factory for [NoOpBuildMutator].
    pub fn noop() -> Self {
        Self::new(|| Ok(NoOpBuildMutator))
    }

    /// Combine factories into one that produces a [CompositeBuildMutator].
    ///
    /// No factories gives [BuildMutatorFactory::noop] and a single factory is returned as is.
    pub fn composite(factories: Vec<BuildMutatorFactory>) -> Self {
        if factories.len() <= 1 {
            return factories.into_iter().next().unwrap_or_else(Self::noop);
        }

        Self::new(move || {
            let mutators = factories
                .iter()
                .map(|factory| factory.create())
                .collect::<MutatorResult<Vec<_>>>()?;
            Ok(CompositeBuildMutator::new(mutators))
        })
    }

    /// Create a new, independent mutator.
    pub fn create(&self) -> MutatorResult<Box<dyn BuildMutator>> {
        (self.create_fn)()
    }
}

impl Default for BuildMutatorFactory {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for BuildMutatorFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildMutatorFactory").finish_non_exhaustive()
    }
}
