//! Manual ordering: persisted-order merge and drag resolution.

/// Arranges `fetched` according to a persisted manual order.
///
/// Entries named in `persisted` come first, in that order; fetched entries
/// the order does not name follow in fetch order. Ids in `persisted` with no
/// fetched entry are skipped. An empty `persisted` leaves fetch order as is.
#[must_use]
pub fn merge_manual_order<T, Id, F>(fetched: Vec<T>, persisted: &[Id], id_of: F) -> Vec<T>
where
    Id: PartialEq,
    F: Fn(&T) -> &Id,
{
    if persisted.is_empty() {
        return fetched;
    }

    let mut slots: Vec<Option<T>> = fetched.into_iter().map(Some).collect();
    let mut merged = Vec::with_capacity(slots.len());

    for wanted in persisted {
        let found = slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| id_of(item) == wanted))
            .and_then(Option::take);
        if let Some(item) = found {
            merged.push(item);
        }
    }
    merged.extend(slots.into_iter().flatten());
    merged
}

/// Computes the id sequence after dropping `dragged` onto `target`.
///
/// Only entries accepted by `in_scope` take part. The dragged id is removed
/// and reinserted at the position the target held. Returns `None` when the
/// ids are equal or either one is not in scope.
#[must_use]
pub fn resolve_drop<T, Id, F, S>(
    dragged: &Id,
    target: &Id,
    current: &[T],
    id_of: F,
    in_scope: S,
) -> Option<Vec<Id>>
where
    Id: PartialEq + Clone,
    F: Fn(&T) -> &Id,
    S: Fn(&T) -> bool,
{
    if dragged == target {
        return None;
    }

    let mut sequence: Vec<Id> = current
        .iter()
        .filter(|item| in_scope(item))
        .map(|item| id_of(item).clone())
        .collect();
    let from = sequence.iter().position(|id| id == dragged)?;
    let to = sequence.iter().position(|id| id == target)?;

    let moved = sequence.remove(from);
    sequence.insert(to, moved);
    Some(sequence)
}
