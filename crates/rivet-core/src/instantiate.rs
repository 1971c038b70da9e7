//! # Instantiation
//!
//! Turns a [`ResolutionPlan`] into caller-defined instances.
//!
//! Rivet does not know how to build objects. A caller implements
//! [`Instantiator`] and [`construct`] walks the plan bottom-up, building every
//! shared instance exactly once. Lazy arguments are passed as deferred
//! descriptions; the caller builds them on demand with [`construct_argument`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::argument::{Argument, InstanceId, InstancePlan, ResolutionPlan};
use crate::range::literal::Scalar;
use crate::ResolveError;

/// A constructor argument with instances already built.
#[derive(Debug, Clone, PartialEq)]
pub enum Constructed<I> {
    Undefined,
    Literal(Scalar),
    Iri(String),
    Instance(I),
    /// Not yet built; pass to [`construct_argument`] when invoked.
    Lazy(Argument),
    List(Vec<Constructed<I>>),
    Map(Vec<(String, Constructed<I>)>),
}

/// Builds instances from their component and constructor arguments.
pub trait Instantiator {
    /// The built object. Shared instances are handed out as clones.
    type Instance: Clone;

    fn instantiate(
        &mut self,
        plan: &InstancePlan,
        arguments: Vec<Constructed<Self::Instance>>,
    ) -> Result<Self::Instance, ResolveError>;
}

/// Build the root instance of `plan`.
pub fn construct<T: Instantiator>(
    plan: &ResolutionPlan,
    instantiator: &mut T,
) -> Result<T::Instance, ResolveError> {
    Builder::new(plan, instantiator).instance(plan.root)
}

/// Build one argument of `plan`, typically the payload of a lazy argument.
pub fn construct_argument<T: Instantiator>(
    plan: &ResolutionPlan,
    argument: &Argument,
    instantiator: &mut T,
) -> Result<Constructed<T::Instance>, ResolveError> {
    Builder::new(plan, instantiator).argument(argument)
}

struct Builder<'p, T: Instantiator> {
    plan: &'p ResolutionPlan,
    instantiator: &'p mut T,
    built: BTreeMap<InstanceId, T::Instance>,
    building: BTreeSet<InstanceId>,
}

impl<'p, T: Instantiator> Builder<'p, T> {
    fn new(plan: &'p ResolutionPlan, instantiator: &'p mut T) -> Self {
        Self {
            plan,
            instantiator,
            built: BTreeMap::new(),
            building: BTreeSet::new(),
        }
    }

    fn instance(&mut self, id: InstanceId) -> Result<T::Instance, ResolveError> {
        if let Some(instance) = self.built.get(&id) {
            return Ok(instance.clone());
        }
        let plan: &'p ResolutionPlan = self.plan;
        let instance_plan = plan
            .get(id)
            .ok_or_else(|| ResolveError::NodeNotFound(format!("instance {id}")))?;
        if !self.building.insert(id) {
            return Err(ResolveError::CyclicReference(instance_plan.config.clone()));
        }
        let arguments = instance_plan
            .arguments
            .iter()
            .map(|argument| self.argument(argument))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(instance = %id, component = %instance_plan.component, "constructing");
        let instance = self.instantiator.instantiate(instance_plan, arguments)?;
        self.building.remove(&id);
        self.built.insert(id, instance.clone());
        Ok(instance)
    }

    fn argument(&mut self, argument: &Argument) -> Result<Constructed<T::Instance>, ResolveError> {
        Ok(match argument {
            Argument::Undefined => Constructed::Undefined,
            Argument::Literal(scalar) => Constructed::Literal(scalar.clone()),
            Argument::Iri(iri) => Constructed::Iri(iri.clone()),
            Argument::Instance(id) => Constructed::Instance(self.instance(*id)?),
            Argument::Lazy(inner) => Constructed::Lazy((**inner).clone()),
            Argument::List(items) => Constructed::List(
                items
                    .iter()
                    .map(|item| self.argument(item))
                    .collect::<Result<_, _>>()?,
            ),
            Argument::Map(entries) => Constructed::Map(
                entries
                    .iter()
                    .map(|entry| -> Result<_, ResolveError> {
                        Ok((entry.key.clone(), self.argument(&entry.value)?))
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
