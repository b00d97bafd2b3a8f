use serde::Serialize;

use crate::collections::UnorderedList;
use crate::engine::EngineError;
use crate::limits::*;
use crate::model::{ClientKey, ConfirmationNumber, Location, Reservation};

/// Where a client's lease lives: the unit that owns it and its number there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaseRef {
    pub confirmation: ConfirmationNumber,
    pub location: Location,
}

/// A tenant. Clients are equal by id.
#[derive(Debug, Clone)]
pub struct Client {
    name: String,
    id: String,
    leases: UnorderedList<LeaseRef>,
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace())
        && !name.chars().all(char::is_whitespace)
}

fn is_valid_id(id: &str) -> bool {
    id.chars().count() >= MIN_CLIENT_ID_LEN
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || CLIENT_ID_SYMBOLS.contains(&c))
}

impl Client {
    pub fn new(name: &str, id: &str) -> Result<Self, EngineError> {
        let name = name.trim();
        let id = id.trim();
        if !is_valid_name(name) || !is_valid_id(id) {
            return Err(EngineError::InvalidRequest("invalid name/id"));
        }
        Ok(Self {
            name: name.to_string(),
            id: id.to_string(),
            leases: UnorderedList::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> ClientKey {
        ClientKey {
            name: self.name.clone(),
            id: self.id.clone(),
        }
    }

    pub fn lease_refs(&self) -> &UnorderedList<LeaseRef> {
        &self.leases
    }

    pub fn add_lease(&mut self, lease: &Reservation) -> Result<(), EngineError> {
        if lease.client().id != self.id {
            return Err(EngineError::InvalidRequest("lease does not belong to client"));
        }
        self.leases.add(LeaseRef {
            confirmation: lease.confirmation(),
            location: lease.unit().location,
        })?;
        Ok(())
    }

    pub fn cancel_lease_at(&mut self, index: usize) -> Result<LeaseRef, EngineError> {
        Ok(self.leases.remove(index)?)
    }

    /// Drop the reference to one specific lease.
    pub fn cancel_lease(&mut self, lease: &LeaseRef) -> Result<LeaseRef, EngineError> {
        let index = self
            .leases
            .index_of(lease)
            .ok_or(EngineError::LeaseNotFound(lease.confirmation))?;
        self.cancel_lease_at(index)
    }

    pub fn cancel_lease_with_number(
        &mut self,
        number: ConfirmationNumber,
    ) -> Result<LeaseRef, EngineError> {
        let index = self
            .leases
            .iter()
            .position(|l| l.confirmation == number)
            .ok_or(EngineError::LeaseNotFound(number))?;
        self.cancel_lease_at(index)
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Client {}
