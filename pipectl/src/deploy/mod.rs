//! Deploy-and-wait support

pub mod waiter;
