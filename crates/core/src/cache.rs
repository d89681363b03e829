//! Read-cache keys and the invalidation sets of every testimonial mutation.
//!
//! Each mutation of the testimonial tables lists the read views it makes
//! stale. Services invalidate by these sets only, so a new view needs one
//! new key and an entry in the sets below.

use serde::{Serialize, Serializer};

/// A cached read view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Admin list of pending testimonials.
    PendingList,
    /// Pending-count badge.
    PendingCount,
    /// Public list of approved testimonials.
    ApprovedList,
    /// Admin list of approved testimonials.
    AdminApprovedList,
}

impl CacheKey {
    /// Stable wire name, also used in change-feed payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::PendingList => "pending-testimonials",
            CacheKey::PendingCount => "pending-testimonials-count",
            CacheKey::ApprovedList => "testimonials",
            CacheKey::AdminApprovedList => "admin-testimonials",
        }
    }

    /// Whether results for this key may be held between requests.
    ///
    /// Pending views are always read through: the moderation panel polls them
    /// and any earlier result is treated as stale.
    pub fn is_cacheable(self) -> bool {
        matches!(self, CacheKey::ApprovedList | CacheKey::AdminApprovedList)
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Views made stale by a new submission.
pub const SUBMIT_INVALIDATES: &[CacheKey] = &[CacheKey::PendingList, CacheKey::PendingCount];

/// Views made stale by approving a pending testimonial.
pub const APPROVE_INVALIDATES: &[CacheKey] = &[
    CacheKey::PendingList,
    CacheKey::PendingCount,
    CacheKey::ApprovedList,
    CacheKey::AdminApprovedList,
];

/// Views made stale by rejecting a pending testimonial.
pub const REJECT_INVALIDATES: &[CacheKey] = &[CacheKey::PendingList, CacheKey::PendingCount];

/// Views made stale by changing or deleting an approved testimonial.
pub const APPROVED_CHANGE_INVALIDATES: &[CacheKey] =
    &[CacheKey::ApprovedList, CacheKey::AdminApprovedList];
