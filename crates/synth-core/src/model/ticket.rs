//! Tickets de suscriptor.
//!
//! Un `Ticket` es un token corto y aleatorio que identifica el interés de un
//! llamador en una tarea. Es distinto del fingerprint: varios llamadores
//! comparten token pero cada uno recibe su propio ticket.
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::TICKET_HEX_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// Genera un ticket aleatorio de `TICKET_HEX_LEN` caracteres hex.
    pub fn mint() -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(TICKET_HEX_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticket {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Ticket {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
