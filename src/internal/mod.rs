//! Internal resolution guards.

mod cycles;

pub(crate) use cycles::{find_cycle, MAX_DEPTH};
