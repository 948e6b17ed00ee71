// ── Indexed entity collection ──
//
// An ordered list of ids plus an id-keyed map of entities, with at most one
// "active" id. Every id in `order` has an entry and vice versa; `order`
// never holds duplicates.

use std::collections::HashMap;
use std::hash::Hash;

use crate::effect::Effects;

/// Ordered, id-addressed collection of entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
    active: Option<String>,
}

impl<T> Default for Indexed<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            active: None,
        }
    }
}

impl<T> Indexed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entity` at `id`.
    ///
    /// A new id is appended to `order`; an existing id keeps its position
    /// and only its entry is overwritten.
    pub fn add(mut self, id: impl Into<String>, entity: T) -> Self {
        let id = id.into();
        if self.entries.insert(id.clone(), entity).is_none() {
            self.order.push(id);
        }
        self
    }

    /// Build a collection from scratch. Later duplicates overwrite earlier
    /// entries but keep the first position.
    pub fn from_entities(entities: impl IntoIterator<Item = T>, key: impl Fn(&T) -> String) -> Self {
        entities
            .into_iter()
            .fold(Self::new(), |acc, entity| acc.add(key(&entity), entity))
    }

    /// Replace every entity with `entities`.
    ///
    /// Ids absent from `entities` disappear. The active id survives only if
    /// it is still present.
    pub fn replace_all(
        self,
        entities: impl IntoIterator<Item = T>,
        key: impl Fn(&T) -> String,
    ) -> Self {
        let mut next = Self::from_entities(entities, key);
        next.active = self.active.filter(|id| next.entries.contains_key(id));
        next
    }

    /// Mark `id` as the single active entity. Unknown ids are ignored.
    pub fn activate(mut self, id: &str) -> Self {
        if self.entries.contains_key(id) {
            self.active = Some(id.to_owned());
        }
        self
    }

    /// Clear the active selection.
    pub fn deactivate(mut self) -> Self {
        self.active = None;
        self
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_entry(&self) -> Option<&T> {
        self.active.as_deref().and_then(|id| self.entries.get(id))
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Entities in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (id.as_str(), e)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Build a fresh id → entity map.
pub fn index_with<K, T>(entities: impl IntoIterator<Item = T>, key: impl Fn(&T) -> K) -> HashMap<K, T>
where
    K: Eq + Hash,
{
    entities.into_iter().map(|e| (key(&e), e)).collect()
}

/// Route `action` to the entity at `id`.
///
/// Returns the collection untouched and no effects when `id` is absent.
/// Child effects are tagged with `tag(id, _)` so their results keep
/// targeting the same entity.
pub fn update_with_id<T, A, PA, U, G>(
    update: U,
    tag: G,
    collection: Indexed<T>,
    id: &str,
    action: A,
) -> (Indexed<T>, Effects<PA>)
where
    A: 'static,
    PA: 'static,
    U: FnOnce(T, A) -> (T, Effects<A>),
    G: Fn(String, A) -> PA + Clone + Send + 'static,
{
    let mut collection = collection;
    let Some(entity) = collection.entries.remove(id) else {
        return (collection, Effects::none());
    };

    let (entity, effects) = update(entity, action);
    collection.entries.insert(id.to_owned(), entity);

    let id = id.to_owned();
    (collection, effects.map(move |a| tag(id.clone(), a)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::effect::Task;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        v: u32,
    }

    fn item(id: &'static str, v: u32) -> Item {
        Item { id, v }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ItemAction {
        Bump,
        Announce,
    }

    fn item_update(i: Item, a: ItemAction) -> (Item, Effects<ItemAction>) {
        match a {
            ItemAction::Bump => (Item { v: i.v + 1, ..i }, Effects::none()),
            ItemAction::Announce => (i, Effects::send(ItemAction::Bump)),
        }
    }

    #[derive(Debug, PartialEq)]
    enum ListAction {
        ById(String, ItemAction),
    }

    #[test]
    fn add_keeps_first_insertion_order_and_latest_value() {
        let c = Indexed::new()
            .add("a", 1)
            .add("b", 2)
            .add("a", 3)
            .add("c", 4)
            .add("b", 5);

        assert_eq!(c.order(), ["a", "b", "c"]);
        assert_eq!(c.get("a"), Some(&3));
        assert_eq!(c.get("b"), Some(&5));
        assert_eq!(c.len(), c.iter().count());
    }

    #[test]
    fn from_entities_dedupes() {
        let c = Indexed::from_entities(
            [item("x", 1), item("y", 2), item("x", 9)],
            |i| i.id.to_owned(),
        );
        assert_eq!(c.order(), ["x", "y"]);
        assert_eq!(c.get("x").unwrap().v, 9);
    }

    #[test]
    fn replace_all_drops_stale_ids_and_keeps_surviving_active() {
        let c = Indexed::from_entities([item("a", 1), item("b", 2)], |i| i.id.to_owned())
            .activate("b");

        let kept = c.clone().replace_all([item("b", 3), item("c", 4)], |i| i.id.to_owned());
        assert_eq!(kept.order(), ["b", "c"]);
        assert!(!kept.contains("a"));
        assert_eq!(kept.active(), Some("b"));

        let gone = c.replace_all([item("c", 4)], |i| i.id.to_owned());
        assert_eq!(gone.active(), None);
    }

    #[test]
    fn activate_overwrites_previous_selection() {
        let c = Indexed::new().add("a", 1).add("b", 2).activate("a").activate("b");
        assert_eq!(c.active(), Some("b"));
        assert_eq!(c.active_entry(), Some(&2));
    }

    #[test]
    fn activate_unknown_id_is_ignored() {
        let c = Indexed::new().add("a", 1).activate("a").activate("zzz");
        assert_eq!(c.active(), Some("a"));
        assert_eq!(c.deactivate().active(), None);
    }

    #[test]
    fn index_with_builds_map() {
        let map = index_with([item("a", 1), item("b", 2)], |i| i.id);
        assert_eq!(map["b"].v, 2);
    }

    #[test]
    fn update_with_id_absent_is_noop() {
        let c = Indexed::from_entities([item("a", 1)], |i| i.id.to_owned());
        let (next, fx) = update_with_id(
            item_update,
            ListAction::ById,
            c.clone(),
            "missing",
            ItemAction::Announce,
        );
        assert_eq!(next, c);
        assert!(fx.is_empty());
    }

    #[test]
    fn update_with_id_routes_and_tags() {
        let c = Indexed::from_entities([item("a", 1), item("b", 2)], |i| i.id.to_owned());

        let (c, fx) = update_with_id(item_update, ListAction::ById, c, "b", ItemAction::Bump);
        assert_eq!(c.get("b").unwrap().v, 3);
        assert_eq!(c.get("a").unwrap().v, 1);
        assert_eq!(c.order(), ["a", "b"]);
        assert!(fx.is_empty());

        let (_, fx) = update_with_id(item_update, ListAction::ById, c, "a", ItemAction::Announce);
        let Some(Task::Send(action)) = fx.into_iter().next() else {
            panic!("expected a send");
        };
        assert_eq!(action, ListAction::ById("a".into(), ItemAction::Bump));
    }
}
