use chrono::NaiveDate;
use tracing::{debug, info};

use crate::collections::OrderedSequence;
use crate::confirmation::{ConfirmationCounter, CounterMark};
use crate::model::*;
use crate::observability::*;

use super::conflict::{check_capacity, check_no_conflict};
use super::policy;
use super::{EngineError, Unit};

impl Unit {
    /// Shared pre-check for new reservations.
    pub fn check_lease_conditions(&self, duration: u32, occupants: u32) -> Result<(), EngineError> {
        if duration < 1 || occupants < 1 {
            return Err(EngineError::InvalidRequest("invalid input"));
        }
        if !self.in_service {
            return Err(EngineError::OutOfService(self.location));
        }
        Ok(())
    }

    pub fn check_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<(), EngineError> {
        policy::check_dates(self.kind, start, end)
    }

    /// Book `duration` months, days or weeks (by kind) starting on `start`.
    ///
    /// Consumes a confirmation number from `counter`; if the request is then
    /// rejected for conflict or capacity the counter is put back.
    pub fn reserve(
        &mut self,
        counter: &mut ConfirmationCounter,
        client: &ClientKey,
        start: NaiveDate,
        duration: u32,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        let result = self.try_reserve(counter, client, start, duration, occupants);
        self.count_attempt(&result);
        result
    }

    fn try_reserve(
        &mut self,
        counter: &mut ConfirmationCounter,
        client: &ClientKey,
        start: NaiveDate,
        duration: u32,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        self.check_lease_conditions(duration, occupants)?;
        let end = policy::derive_end(self.kind, start, duration)?;
        self.check_dates(start, end)?;
        let span = DateSpan::new(start, end)?;

        let mark = counter.mark();
        let candidate = Reservation::new(
            counter.issue(),
            span,
            occupants,
            client.clone(),
            self.key(),
        );
        self.admit(candidate, counter, mark)
    }

    /// Re-create a lease whose confirmation number and end date are already known.
    ///
    /// Skips the service pre-check. Like every attach, the lease is silently not
    /// stored when the unit is out of service.
    pub fn record_existing_lease(
        &mut self,
        counter: &mut ConfirmationCounter,
        number: ConfirmationNumber,
        client: &ClientKey,
        start: NaiveDate,
        end: NaiveDate,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        let result = self.try_record(counter, number, client, start, end, occupants);
        self.count_attempt(&result);
        result
    }

    fn try_record(
        &mut self,
        counter: &mut ConfirmationCounter,
        number: ConfirmationNumber,
        client: &ClientKey,
        start: NaiveDate,
        end: NaiveDate,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        if occupants < 1 {
            return Err(EngineError::InvalidRequest("invalid input"));
        }
        self.check_dates(start, end)?;
        let span = DateSpan::new(start, end)?;

        let mark = counter.mark();
        counter.observe(number);
        let candidate = Reservation::new(
            number,
            span,
            occupants,
            client.clone(),
            self.key(),
        );
        self.admit(candidate, counter, mark)
    }

    fn admit(
        &mut self,
        candidate: Reservation,
        counter: &mut ConfirmationCounter,
        mark: CounterMark,
    ) -> Result<Reservation, EngineError> {
        if let Err(e) = self.try_attach(&candidate) {
            counter.restore(mark);
            metrics::counter!(CONFIRMATION_ROLLBACKS_TOTAL).increment(1);
            debug!(
                "unit {} rejected lease {}: {e}",
                self.location,
                candidate.confirmation()
            );
            return Err(e);
        }
        Ok(candidate)
    }

    /// Conflict and capacity checks, then store. Nothing changes on failure.
    fn try_attach(&mut self, candidate: &Reservation) -> Result<(), EngineError> {
        let span = candidate.span();
        check_no_conflict(self.kind, &self.leases, &span)?;
        check_capacity(
            self.capacity,
            self.occupancy.as_ref(),
            &span,
            candidate.occupants(),
        )?;
        self.store(candidate.clone())
    }

    fn count_attempt(&self, result: &Result<Reservation, EngineError>) {
        metrics::counter!(
            RESERVATIONS_TOTAL,
            "kind" => kind_label(self.kind),
            "status" => status_label(result)
        )
        .increment(1);
    }

    /// Attach an already-built reservation. Does nothing while out of service.
    ///
    /// The lease goes through the same date, conflict and capacity checks as a
    /// fresh booking.
    pub fn add_reservation(&mut self, lease: Reservation) -> Result<(), EngineError> {
        if !self.in_service {
            debug!(
                "unit {} out of service, lease {} not attached",
                self.location,
                lease.confirmation()
            );
            return Ok(());
        }
        if lease.unit().location != self.location {
            return Err(EngineError::InvalidRequest("lease is not for this rental unit"));
        }
        if lease.occupants() < 1 {
            return Err(EngineError::InvalidRequest("invalid input"));
        }
        self.check_dates(lease.start(), lease.end())?;
        self.try_attach(&lease)
    }

    fn store(&mut self, lease: Reservation) -> Result<(), EngineError> {
        if !self.in_service {
            debug!(
                "unit {} out of service, lease {} not attached",
                self.location,
                lease.confirmation()
            );
            return Ok(());
        }
        let span = lease.span();
        let occupants = lease.occupants();
        self.leases.add(lease)?;
        if let Some(calendar) = &mut self.occupancy {
            calendar.book(&span, occupants);
        }
        Ok(())
    }

    pub fn cancel_lease_by_number(
        &mut self,
        number: ConfirmationNumber,
    ) -> Result<Reservation, EngineError> {
        let index = self
            .leases
            .iter()
            .position(|r| r.confirmation() == number)
            .ok_or(EngineError::LeaseNotFound(number))?;
        let lease = self.leases.remove(index)?;
        self.rebuild_occupancy();
        Ok(lease)
    }

    /// Index of the first lease starting on or after `date`.
    pub fn cutoff_index(&self, date: NaiveDate) -> Option<usize> {
        self.leases.iter().position(|r| r.start() >= date)
    }

    /// Take the unit out of service from `date` on.
    ///
    /// Leases starting on or after the aligned cutoff are split off; leases
    /// running past it are shortened, or dropped if the shortened lease is no
    /// longer valid for the kind. Returns everything split off or dropped.
    pub fn remove_from_service_starting(
        &mut self,
        date: NaiveDate,
    ) -> Result<OrderedSequence<Reservation>, EngineError> {
        let cutoff = policy::effective_cutoff(self.kind, date);
        let at = self.cutoff_index(cutoff).unwrap_or(self.leases.len());
        let mut cancelled = self.leases.truncate(at)?;

        let new_end = policy::repaired_end(self.kind, cutoff);
        let mut i = 0;
        while i < self.leases.len() {
            let lease = self.leases.get_mut(i)?;
            if lease.end() >= cutoff {
                let repaired = match new_end {
                    Some(end) => {
                        lease.shorten_end(end).is_ok()
                            && policy::check_dates(self.kind, lease.start(), lease.end()).is_ok()
                    }
                    None => false,
                };
                if !repaired {
                    let dropped = self.leases.remove(i)?;
                    cancelled.add(dropped)?;
                    continue;
                }
            }
            i += 1;
        }

        self.take_out_of_service();
        self.rebuild_occupancy();
        metrics::counter!(CUTOVER_CANCELLED_TOTAL, "kind" => kind_label(self.kind))
            .increment(cancelled.len() as u64);
        info!(
            "unit {} out of service from {cutoff}, {} leases cancelled",
            self.location,
            cancelled.len()
        );
        Ok(cancelled)
    }
}
