// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The per-VRF SID lifecycle step (§4.4, §4.5 step 1), expressed as a
//! [`rekon::Reconcile`] implementation over a [`sidalloc::SidAllocatorFacade`].

use common::ReconcileError;
use model::{SidInfo, Vrf};
use sidalloc::{DefaultAllocator, LocatorAllocator, SidAllocatorFacade};
use std::future::Future;

/// The current SID binding for a VRF, as recorded by [`store::VrfStore`]:
/// the `SidInfo` itself plus the pool name that produced it (`None` for the
/// default allocator).
pub(crate) type SidObservation = Option<(SidInfo, Option<String>)>;

/// [`rekon::Reconcile`] over a [`SidAllocatorFacade`]: requirement is a VRF
/// snapshot, observation is its current binding, outcome is the binding that
/// should replace it in the store (`None` means "no SID bound").
pub(crate) struct SidReconcile<'f, D, L> {
    facade: &'f SidAllocatorFacade<D, L>,
}

impl<'f, D, L> SidReconcile<'f, D, L> {
    pub(crate) fn new(facade: &'f SidAllocatorFacade<D, L>) -> Self {
        SidReconcile { facade }
    }
}

impl<D, L> rekon::Reconcile for SidReconcile<'_, D, L>
where
    D: DefaultAllocator,
    L: LocatorAllocator,
{
    type Requirement<'a>
        = Vrf
    where
        Self: 'a;
    type Observation<'a>
        = SidObservation
    where
        Self: 'a;
    type Outcome<'a>
        = Result<SidObservation, ReconcileError>
    where
        Self: 'a;

    fn reconcile<'a>(
        &self,
        requirement: Self::Requirement<'a>,
        observation: Self::Observation<'a>,
    ) -> impl Future<Output = Self::Outcome<'a>> + Send
    where
        Self: 'a,
    {
        async move {
            if !requirement.wants_sid() {
                if let Some((info, source)) = observation {
                    self.facade.release(&info, source.as_deref()).await;
                }
                return Ok(None);
            }

            if let Some((info, source)) = &observation {
                if requirement.sid_source_matches(source.as_deref()) {
                    return Ok(observation);
                }
                // Allocator switched (§4.4): release via the old source,
                // then fall through to allocate fresh via the new one.
                self.facade.release(info, source.as_deref()).await;
            }

            let pool = requirement.locator_pool_ref.clone();
            match self.facade.allocate_for(&requirement).await {
                Ok(info) => Ok(Some((info, pool))),
                Err(sidalloc::AllocError::PoolMissing(pool)) => {
                    Err(ReconcileError::PoolMissing { pool })
                }
                Err(err) => Err(ReconcileError::AllocationFailed {
                    vrf: requirement.name,
                    reason: err.to_string(),
                }),
            }
        }
    }
}
