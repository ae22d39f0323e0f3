//! Constantes del núcleo de orquestación.

/// Longitud (hex) de un fingerprint: BLAKE3 de 256 bits.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Longitud (hex) de un ticket de suscriptor.
pub const TICKET_HEX_LEN: usize = 8;

/// Workers por defecto del executor si la configuración no indica otro valor.
pub const DEFAULT_WORKERS: usize = 2;

/// Registros que conserva el ledger de fallos antes de descartar los más viejos.
pub const DEFAULT_LEDGER_CAPACITY: usize = 10_000;

/// Mensaje de `cancel` cuando el resultado ya está en cache.
pub const MSG_ALREADY_CACHED: &str = "Task result already in cache.";

/// Mensaje de `cancel` cuando el token o el ticket no corresponden a una tarea viva.
pub const MSG_UNKNOWN_TASK: &str = "Invalid token or code.";
