// ── Cursor (lens) composition ──
//
// Embeds a child state machine into a parent: read the child out, run the
// child update, write the child back, and tag the child's effects so their
// results come back addressed to the same cursor.

use crate::effect::Effects;

/// A lens from parent state `P` to child state `C`, plus the child update
/// and the tag `T` lifting child actions `CA` into parent actions.
pub struct Cursor<P, C, CA, T> {
    pub get: fn(&P) -> C,
    pub set: fn(P, C) -> P,
    pub update: fn(C, CA) -> (C, Effects<CA>),
    pub tag: T,
}

/// A cursor whose tag is a plain function, typically an enum variant.
pub type Lens<P, C, CA, PA> = Cursor<P, C, CA, fn(CA) -> PA>;

impl<P, C, CA: 'static, T> Cursor<P, C, CA, T> {
    /// Route an un-tagged child action through the child update.
    pub fn update<PA>(&self, parent: P, action: CA) -> (P, Effects<PA>)
    where
        PA: 'static,
        T: Fn(CA) -> PA + Clone + Send + 'static,
    {
        let child = (self.get)(&parent);
        let (child, effects) = (self.update)(child, action);
        ((self.set)(parent, child), effects.map(self.tag.clone()))
    }
}
