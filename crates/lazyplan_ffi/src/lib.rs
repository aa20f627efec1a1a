//! Flutter bridge surface for `lazyplan_core`.

pub mod api;
