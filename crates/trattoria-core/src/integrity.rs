//! # Integrity Verification
//!
//! Whole-store check of every relationship invariant. Operations keep these
//! invariants incrementally; the verifier re-derives them from scratch and
//! is run after every load and on demand.
//!
//! Checked per relationship:
//! - forward and reverse indices agree
//! - every link names a live entity on both ends
//! - no live entity exceeds a `max` bound
//! - no live entity sits below a strict `min` bound
//!
//! Plus the supervision forest (acyclic, managers only) and the
//! customer-reservation index (entries agree with their records).

use crate::extent::Extent;
use crate::relationship::{Association, FloorMode, Side};
use crate::restaurant::Restaurant;
use crate::types::{EntityKey, ReservationId};
use serde::Serialize;
use std::fmt;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A pair is present in one index but not the other.
    Asymmetric {
        relationship: &'static str,
        source: String,
        target: String,
    },
    /// A link names an entity that does not exist.
    MissingEndpoint {
        relationship: &'static str,
        entity: String,
    },
    /// A live entity holds a number of links outside its bounds.
    Cardinality {
        relationship: &'static str,
        role: &'static str,
        entity: String,
        count: usize,
        bounds: String,
    },
    /// Following supervisors from `member` revisits a node.
    Cycle {
        relationship: &'static str,
        member: String,
    },
    /// A supervision link involves a staff member without a manager profile.
    NotAManager { member: String },
    /// The qualified index disagrees with the records it points at.
    QualifiedMismatch {
        relationship: &'static str,
        target: String,
        reason: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asymmetric {
                relationship,
                source,
                target,
            } => write!(f, "{}: {} -> {} is one-sided", relationship, source, target),
            Self::MissingEndpoint {
                relationship,
                entity,
            } => write!(f, "{}: link to missing {}", relationship, entity),
            Self::Cardinality {
                relationship,
                role,
                entity,
                count,
                bounds,
            } => write!(
                f,
                "{}: {} holds {} {} (allowed {})",
                relationship, entity, count, role, bounds
            ),
            Self::Cycle {
                relationship,
                member,
            } => write!(f, "{}: {} is on a cycle", relationship, member),
            Self::NotAManager { member } => write!(f, "supervision: {} is not a manager", member),
            Self::QualifiedMismatch {
                relationship,
                target,
                reason,
            } => write!(f, "{}: {} {}", relationship, target, reason),
        }
    }
}

/// Result of [`verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
    /// Reservations that kept their customer but lost their slot to an
    /// earlier booking. Reported, not a violation.
    pub shadowed: Vec<ReservationId>,
}

impl IntegrityReport {
    /// Whether no invariant is broken.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// Record a cardinality violation when `count` breaks `side`.
fn check_side<K: EntityKey>(
    out: &mut Vec<Violation>,
    relationship: &'static str,
    side: &Side,
    entity: K,
    count: usize,
) {
    let bounds = side.multiplicity;
    let below_floor = side.floor == FloorMode::Strict && count < bounds.min;
    let above_max = bounds.max.is_some_and(|max| count > max);
    if below_floor || above_max {
        out.push(Violation::Cardinality {
            relationship,
            role: side.role,
            entity: entity.to_string(),
            count,
            bounds: bounds.to_string(),
        });
    }
}

/// Check one association against the extents on either end.
fn check_association<S: EntityKey, T: EntityKey, A, B>(
    out: &mut Vec<Violation>,
    association: &Association<S, T>,
    sources: &Extent<S, A>,
    targets: &Extent<T, B>,
) {
    let def = association.def();

    for (source, target) in association.asymmetric_pairs() {
        out.push(Violation::Asymmetric {
            relationship: def.name,
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    for (source, target) in association.pairs() {
        if !sources.contains(source) {
            out.push(Violation::MissingEndpoint {
                relationship: def.name,
                entity: source.to_string(),
            });
        }
        if !targets.contains(target) {
            out.push(Violation::MissingEndpoint {
                relationship: def.name,
                entity: target.to_string(),
            });
        }
    }

    for source in sources.ids() {
        check_side(out, def.name, &def.source, source, association.target_count(source));
    }
    for target in targets.ids() {
        check_side(out, def.name, &def.target, target, association.source_count(target));
    }
}

/// Check every invariant of `restaurant`.
#[must_use]
pub fn verify(r: &Restaurant) -> IntegrityReport {
    let mut violations = Vec::new();
    let out = &mut violations;

    check_association(out, &r.order_payments, &r.orders, &r.payments);
    check_association(out, &r.order_invoice, &r.orders, &r.invoices);
    check_association(out, &r.order_requests, &r.orders, &r.requests);
    check_association(out, &r.customer_orders, &r.customers, &r.orders);
    check_association(out, &r.order_tables, &r.orders, &r.tables);
    check_association(out, &r.order_discounts, &r.orders, &r.discounts);
    check_association(out, &r.menu_contents, &r.menus, &r.menu_items);
    check_association(out, &r.item_ingredients, &r.menu_items, &r.ingredients);
    check_association(out, &r.supplier_ingredients, &r.suppliers, &r.ingredients);
    check_association(out, &r.reservation_tables, &r.reservations, &r.tables);
    check_association(out, &r.customer_feedback, &r.customers, &r.feedback);
    check_association(out, &r.item_feedback, &r.menu_items, &r.feedback);

    // Association classes: both halves, then links present on one half only.
    check_association(out, r.quantities.left(), &r.requests, &r.item_quantities);
    check_association(out, r.quantities.right(), &r.menu_items, &r.item_quantities);
    for line in r.quantities.half_linked() {
        out.push(Violation::MissingEndpoint {
            relationship: r.quantities.right().def().name,
            entity: line.to_string(),
        });
    }
    check_association(out, r.supplies.left(), &r.suppliers, &r.supply_logs);
    check_association(out, r.supplies.right(), &r.ingredients, &r.supply_logs);
    for log in r.supplies.half_linked() {
        out.push(Violation::MissingEndpoint {
            relationship: r.supplies.right().def().name,
            entity: log.to_string(),
        });
    }

    // Supervision.
    let links = r.supervision.links();
    check_association(out, links, &r.staff, &r.staff);
    for member in r.supervision.cyclic_members() {
        out.push(Violation::Cycle {
            relationship: links.def().name,
            member: member.to_string(),
        });
    }
    let mut supervised: Vec<_> = links
        .pairs()
        .flat_map(|(supervisor, subordinate)| [supervisor, subordinate])
        .collect();
    supervised.sort();
    supervised.dedup();
    for member in supervised {
        if r.staff.get(member).is_some_and(|s| !s.is_manager()) {
            out.push(Violation::NotAManager {
                member: member.to_string(),
            });
        }
    }

    // Customer reservations.
    let relationship = r.bookings.name();
    for target in r.bookings.dangling_entries() {
        out.push(Violation::QualifiedMismatch {
            relationship,
            target: target.to_string(),
            reason: "is indexed without a matching owner reference".to_string(),
        });
    }
    for (reservation, customer, key) in r.bookings.references() {
        if !r.customers.contains(customer) {
            out.push(Violation::MissingEndpoint {
                relationship,
                entity: customer.to_string(),
            });
        }
        match r.reservations.get(reservation) {
            None => out.push(Violation::MissingEndpoint {
                relationship,
                entity: reservation.to_string(),
            }),
            Some(record) if record.slot != key => out.push(Violation::QualifiedMismatch {
                relationship,
                target: reservation.to_string(),
                reason: format!("is filed under {} but booked for {}", key, record.slot),
            }),
            Some(_) => {}
        }
    }
    for reservation in r.reservations.ids() {
        if r.bookings.owner_of(reservation).is_none() {
            out.push(Violation::QualifiedMismatch {
                relationship,
                target: reservation.to_string(),
                reason: "has no customer".to_string(),
            });
        }
    }

    if !violations.is_empty() {
        tracing::warn!(count = violations.len(), "integrity violations found");
    }
    IntegrityReport {
        violations,
        shadowed: r.bookings.shadowed(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
