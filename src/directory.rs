use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::client::{Client, LeaseRef};
use crate::collections::{OrderedSequence, SequenceError, UnorderedList};
use crate::confirmation::ConfirmationCounter;
use crate::engine::{EngineError, Unit};
use crate::model::*;

/// Registry of every client and rental unit in the building.
///
/// Unit indexes taken by the operations below refer to the filtered listing
/// (see [`filter_rental_units`](Self::filter_rental_units)); client indexes
/// refer to registration order.
#[derive(Debug, Default)]
pub struct Directory {
    clients: UnorderedList<Client>,
    units: OrderedSequence<Unit>,
    counter: ConfirmationCounter,
    kind_filter: Option<UnitKind>,
    in_service_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectorySnapshot {
    pub units: Vec<UnitSnapshot>,
    pub clients: Vec<ClientSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    pub kind: UnitKind,
    pub location: String,
    pub capacity: u32,
    pub in_service: bool,
    pub leases: Vec<LeaseFields>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientSnapshot {
    pub name: String,
    pub id: String,
    pub leases: Vec<LeaseRef>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self) -> &ConfirmationCounter {
        &self.counter
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    /// Every unit, ignoring the current filter.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn filtered_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| self.matches_filter(u))
    }

    fn matches_filter(&self, unit: &Unit) -> bool {
        self.kind_filter.is_none_or(|kind| unit.kind() == kind)
            && (!self.in_service_only || unit.is_in_service())
    }

    fn filtered_position(&self, index: usize) -> Result<usize, EngineError> {
        let mut matched = 0;
        for (pos, unit) in self.units.iter().enumerate() {
            if self.matches_filter(unit) {
                if matched == index {
                    return Ok(pos);
                }
                matched += 1;
            }
        }
        Err(SequenceError::IndexOutOfRange {
            index,
            len: matched,
        }
        .into())
    }

    fn unit_position(&self, location: Location) -> Result<usize, EngineError> {
        self.units
            .iter()
            .position(|u| u.location() == location)
            .ok_or_else(|| EngineError::UnitNotFound(location.to_string()))
    }

    fn client_position(&self, id: &str) -> Result<usize, EngineError> {
        self.clients
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| EngineError::ClientNotFound(id.to_string()))
    }

    // ── Registration ────────────────────────────────────────────

    pub fn add_new_client(&mut self, name: &str, id: &str) -> Result<ClientKey, EngineError> {
        let client = Client::new(name, id)?;
        if self.clients.contains(&client) {
            return Err(EngineError::DuplicateClient(client.id().to_string()));
        }
        let key = client.key();
        self.clients.add(client)?;
        debug!("registered client {key}");
        Ok(key)
    }

    /// `kind` is matched by its leading letter: `O`ffice, `C`onference room, `H`otel suite.
    pub fn add_new_unit(
        &mut self,
        kind: &str,
        location: &str,
        capacity: u32,
    ) -> Result<Location, EngineError> {
        let unit = Unit::new(kind.parse()?, location, capacity)?;
        let location = unit.location();
        if self.units.contains(&unit) {
            return Err(EngineError::LocationConflict(location));
        }
        self.units.add(unit)?;
        debug!("registered rental unit {location}");
        Ok(location)
    }

    /// Restrict unit listings and unit indexes to one kind and/or in-service units.
    pub fn filter_rental_units(&mut self, kind: Option<UnitKind>, in_service_only: bool) {
        self.kind_filter = kind;
        self.in_service_only = in_service_only;
    }

    // ── Leases ──────────────────────────────────────────────────

    pub fn create_lease(
        &mut self,
        client_index: usize,
        unit_index: usize,
        start: NaiveDate,
        duration: u32,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        let key = self.clients.get(client_index)?.key();
        let pos = self.filtered_position(unit_index)?;
        let lease = self
            .units
            .get_mut(pos)?
            .reserve(&mut self.counter, &key, start, duration, occupants)?;
        self.clients.get_mut(client_index)?.add_lease(&lease)?;
        Ok(lease)
    }

    /// Load a lease whose number and dates are already fixed.
    ///
    /// Out-of-service units are put back in service for the duration of the
    /// call so the lease attaches.
    pub fn add_lease_from_file(
        &mut self,
        client_id: &str,
        number: ConfirmationNumber,
        location: Location,
        start: NaiveDate,
        end: NaiveDate,
        occupants: u32,
    ) -> Result<Reservation, EngineError> {
        let client_index = self.client_position(client_id)?;
        let key = self.clients.get(client_index)?.key();
        let pos = self.unit_position(location)?;

        let unit = self.units.get_mut(pos)?;
        if unit.find_lease(number).is_some() {
            return Err(EngineError::InvalidRequest("duplicate confirmation number"));
        }
        let was_out = !unit.is_in_service();
        if was_out {
            unit.return_to_service();
        }
        let result = unit.record_existing_lease(&mut self.counter, number, &key, start, end, occupants);
        if was_out {
            unit.take_out_of_service();
        }
        let lease = result?;

        self.clients.get_mut(client_index)?.add_lease(&lease)?;
        Ok(lease)
    }

    pub fn cancel_clients_lease(
        &mut self,
        client_index: usize,
        lease_index: usize,
    ) -> Result<Reservation, EngineError> {
        let lease_ref = *self.clients.get(client_index)?.lease_refs().get(lease_index)?;
        let pos = self.unit_position(lease_ref.location)?;
        let lease = self
            .units
            .get_mut(pos)?
            .cancel_lease_by_number(lease_ref.confirmation)?;
        self.clients.get_mut(client_index)?.cancel_lease_at(lease_index)?;
        Ok(lease)
    }

    fn release_client_lease(&mut self, lease: &Reservation) -> Result<(), EngineError> {
        let index = self.client_position(&lease.client().id)?;
        self.clients.get_mut(index)?.cancel_lease(&LeaseRef {
            confirmation: lease.confirmation(),
            location: lease.unit().location,
        })?;
        Ok(())
    }

    // ── Service changes ─────────────────────────────────────────

    /// Cut a unit over from `date`; cancelled leases are removed from their clients too.
    pub fn remove_from_service(
        &mut self,
        unit_index: usize,
        date: NaiveDate,
    ) -> Result<OrderedSequence<Reservation>, EngineError> {
        let pos = self.filtered_position(unit_index)?;
        let cancelled = self.units.get_mut(pos)?.remove_from_service_starting(date)?;
        for lease in &cancelled {
            self.release_client_lease(lease)?;
        }
        Ok(cancelled)
    }

    /// Remove a unit from the building, cancelling all of its leases.
    pub fn close_rental_unit(&mut self, unit_index: usize) -> Result<Unit, EngineError> {
        let pos = self.filtered_position(unit_index)?;
        let unit = self.units.remove(pos)?;
        for lease in unit.leases() {
            self.release_client_lease(lease)?;
        }
        info!(
            "closed rental unit {}, {} leases cancelled",
            unit.location(),
            unit.leases().len()
        );
        Ok(unit)
    }

    pub fn return_to_service(&mut self, unit_index: usize) -> Result<(), EngineError> {
        let pos = self.filtered_position(unit_index)?;
        self.units.get_mut(pos)?.return_to_service();
        Ok(())
    }

    /// Mark a unit unavailable without touching its leases.
    pub fn take_out_of_service_at(&mut self, location: Location) -> Result<(), EngineError> {
        let pos = self.unit_position(location)?;
        self.units.get_mut(pos)?.take_out_of_service();
        Ok(())
    }

    // ── Listings ────────────────────────────────────────────────

    pub fn list_rental_units(&self) -> Vec<String> {
        self.filtered_units().map(Unit::description).collect()
    }

    pub fn list_clients(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.key().to_string()).collect()
    }

    pub fn list_client_leases(&self, client_index: usize) -> Result<Vec<String>, EngineError> {
        Ok(self
            .client_lease_fields(self.clients.get(client_index)?)?
            .iter()
            .map(LeaseFields::client_line)
            .collect())
    }

    fn client_lease_fields(&self, client: &Client) -> Result<Vec<LeaseFields>, EngineError> {
        client
            .lease_refs()
            .iter()
            .map(|r| {
                let unit = self.units.get(self.unit_position(r.location)?)?;
                unit.find_lease(r.confirmation)
                    .map(Reservation::fields)
                    .ok_or(EngineError::LeaseNotFound(r.confirmation))
            })
            .collect()
    }

    pub fn list_leases_for_rental_unit(&self, unit_index: usize) -> Result<Vec<String>, EngineError> {
        let pos = self.filtered_position(unit_index)?;
        Ok(self.units.get(pos)?.list_leases())
    }

    pub fn unit_at_location(&self, location: &str) -> Result<&Unit, EngineError> {
        let pos = self.unit_position(location.parse()?)?;
        Ok(self.units.get(pos)?)
    }

    /// Forget every client and unit and restart confirmation numbering at zero.
    pub fn flush_all_data(&mut self) {
        self.clients = UnorderedList::new();
        self.units.clear();
        self.counter = ConfirmationCounter::new();
        info!("directory flushed");
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        let units = self
            .filtered_units()
            .map(|u| UnitSnapshot {
                kind: u.kind(),
                location: u.location().to_string(),
                capacity: u.capacity(),
                in_service: u.is_in_service(),
                leases: u.lease_fields(),
            })
            .collect();
        let clients = self
            .clients
            .iter()
            .map(|c| ClientSnapshot {
                name: c.name().to_string(),
                id: c.id().to_string(),
                leases: c.lease_refs().iter().copied().collect(),
            })
            .collect();
        DirectorySnapshot { units, clients }
    }
}
