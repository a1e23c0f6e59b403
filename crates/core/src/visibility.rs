//! Publish-window evaluation.

/// Whether content is publicly visible at `now` (epoch seconds).
///
/// Strict on both bounds: not visible at the exact publish instant, and no
/// longer visible at the exact expire instant. `now` is captured once per
/// logical request so one paginated query stays internally consistent.
#[must_use]
pub const fn is_visible(now: i64, publish: i64, expire: i64) -> bool {
    publish < now && expire > now
}
