//! fintrack keeps per-user income/expense books and derives the dashboard
//! views (running balance, monthly groups, category totals) from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("fintrack tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
