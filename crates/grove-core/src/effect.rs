// ── Effect descriptors ──
//
// Update functions never perform I/O. They return `Effects<A>`: a batch of
// `Task`s, each pairing a request with the continuation that wraps its
// outcome into the next action. The runtime executes them and feeds the
// resulting actions back into the update loop.

use std::fmt;

use url::Url;

use crate::error::{FetchError, StoreError};
use crate::model::{PutConfirmation, Recipe, RecordSet};

/// Continuation turning an outcome into an action.
pub type Then<T, A> = Box<dyn FnOnce(T) -> A + Send>;

/// A single pending operation.
pub enum Task<A> {
    /// Deliver an action on the next turn of the loop, no I/O involved.
    Send(A),
    /// Fetch a view of data points from a remote URL.
    Get {
        url: Url,
        then: Then<Result<RecordSet, FetchError>, A>,
    },
    /// Read every document of the local recipe store.
    Restore {
        then: Then<Result<Vec<Recipe>, StoreError>, A>,
    },
    /// Write one recipe document.
    Put {
        recipe: Recipe,
        then: Then<Result<PutConfirmation, StoreError>, A>,
    },
    /// Replicate the local recipe store with a remote origin.
    Sync {
        origin: Url,
        then: Then<Result<(), StoreError>, A>,
    },
    /// Ask the device to start running a recipe.
    StartRecipe {
        id: String,
        then: Then<Result<(), FetchError>, A>,
    },
}

impl<A: 'static> Task<A> {
    /// Wrap the eventual action with `f`.
    pub fn map<B: 'static>(self, f: impl FnOnce(A) -> B + Send + 'static) -> Task<B> {
        match self {
            Self::Send(action) => Task::Send(f(action)),
            Self::Get { url, then } => Task::Get {
                url,
                then: Box::new(move |r| f(then(r))),
            },
            Self::Restore { then } => Task::Restore {
                then: Box::new(move |r| f(then(r))),
            },
            Self::Put { recipe, then } => Task::Put {
                recipe,
                then: Box::new(move |r| f(then(r))),
            },
            Self::Sync { origin, then } => Task::Sync {
                origin,
                then: Box::new(move |r| f(then(r))),
            },
            Self::StartRecipe { id, then } => Task::StartRecipe {
                id,
                then: Box::new(move |r| f(then(r))),
            },
        }
    }
}

impl<A> Task<A> {
    /// Short name of the request, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Send(_) => "send",
            Self::Get { .. } => "get",
            Self::Restore { .. } => "restore",
            Self::Put { .. } => "put",
            Self::Sync { .. } => "sync",
            Self::StartRecipe { .. } => "start_recipe",
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Task<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Self::Get { url, .. } => f.debug_struct("Get").field("url", &url.as_str()).finish(),
            Self::Restore { .. } => f.write_str("Restore"),
            Self::Put { recipe, .. } => f.debug_struct("Put").field("id", &recipe.id).finish(),
            Self::Sync { origin, .. } => f
                .debug_struct("Sync")
                .field("origin", &origin.as_str())
                .finish(),
            Self::StartRecipe { id, .. } => f.debug_struct("StartRecipe").field("id", id).finish(),
        }
    }
}

/// A batch of pending tasks.
///
/// Issuance order is kept, but the runtime executes I/O tasks concurrently,
/// so their results come back in completion order.
#[must_use]
pub struct Effects<A> {
    tasks: Vec<Task<A>>,
}

impl<A: 'static> Effects<A> {
    /// No effects.
    pub fn none() -> Self {
        Self { tasks: Vec::new() }
    }

    /// A single task.
    pub fn task(task: Task<A>) -> Self {
        Self { tasks: vec![task] }
    }

    /// Deliver `action` back to the update loop.
    pub fn send(action: A) -> Self {
        Self::task(Task::Send(action))
    }

    /// Fetch `url`, wrapping the outcome with `then`.
    pub fn get(
        url: Url,
        then: impl FnOnce(Result<RecordSet, FetchError>) -> A + Send + 'static,
    ) -> Self {
        Self::task(Task::Get {
            url,
            then: Box::new(then),
        })
    }

    /// Read the whole local store.
    pub fn restore(
        then: impl FnOnce(Result<Vec<Recipe>, StoreError>) -> A + Send + 'static,
    ) -> Self {
        Self::task(Task::Restore {
            then: Box::new(then),
        })
    }

    /// Write `recipe` to the local store.
    pub fn put(
        recipe: Recipe,
        then: impl FnOnce(Result<PutConfirmation, StoreError>) -> A + Send + 'static,
    ) -> Self {
        Self::task(Task::Put {
            recipe,
            then: Box::new(then),
        })
    }

    /// Replicate the local store with `origin`.
    pub fn sync(
        origin: Url,
        then: impl FnOnce(Result<(), StoreError>) -> A + Send + 'static,
    ) -> Self {
        Self::task(Task::Sync {
            origin,
            then: Box::new(then),
        })
    }

    /// Request a recipe start on the device.
    pub fn start_recipe(
        id: impl Into<String>,
        then: impl FnOnce(Result<(), FetchError>) -> A + Send + 'static,
    ) -> Self {
        Self::task(Task::StartRecipe {
            id: id.into(),
            then: Box::new(then),
        })
    }

    /// Merge several batches, keeping issuance order.
    pub fn batch(batches: impl IntoIterator<Item = Effects<A>>) -> Self {
        Self {
            tasks: batches.into_iter().flat_map(|b| b.tasks).collect(),
        }
    }

    /// Append `other` after these effects.
    pub fn and(mut self, other: Effects<A>) -> Self {
        self.tasks.extend(other.tasks);
        self
    }

    /// Tag every task's eventual action with `f`.
    pub fn map<B: 'static>(self, f: impl Fn(A) -> B + Clone + Send + 'static) -> Effects<B> {
        Effects {
            tasks: self.tasks.into_iter().map(|t| t.map(f.clone())).collect(),
        }
    }
}

impl<A> Effects<A> {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task<A>> {
        self.tasks.iter()
    }

    /// Request kinds in issuance order, for logs and assertions.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.tasks.iter().map(Task::kind).collect()
    }
}

impl<A: 'static> Default for Effects<A> {
    fn default() -> Self {
        Self::none()
    }
}

impl<A> IntoIterator for Effects<A> {
    type Item = Task<A>;
    type IntoIter = std::vec::IntoIter<Task<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<A: fmt::Debug> fmt::Debug for Effects<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tasks).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Child {
        Loaded(usize),
        Failed,
    }

    #[derive(Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn map_wraps_send_immediately() {
        let fx = Effects::send(Child::Failed).map(Parent::Child);
        let task = fx.into_iter().next().unwrap();
        assert!(matches!(task, Task::Send(Parent::Child(Child::Failed))));
    }

    #[test]
    fn map_wraps_continuation_result() {
        let fx = Effects::restore(|r: Result<Vec<Recipe>, StoreError>| match r {
            Ok(docs) => Child::Loaded(docs.len()),
            Err(_) => Child::Failed,
        })
        .map(Parent::Child);

        let Some(Task::Restore { then }) = fx.into_iter().next() else {
            panic!("expected a restore task");
        };
        assert_eq!(then(Ok(vec![])), Parent::Child(Child::Loaded(0)));
    }

    #[test]
    fn batch_keeps_issuance_order() {
        let fx = Effects::batch([
            Effects::restore(|_| Child::Failed),
            Effects::none(),
            Effects::send(Child::Loaded(1)).and(Effects::restore(|_| Child::Failed)),
        ]);
        assert_eq!(fx.kinds(), vec!["restore", "send", "restore"]);
    }

    #[test]
    fn none_is_empty() {
        let fx: Effects<Child> = Effects::none();
        assert!(fx.is_empty());
        assert_eq!(fx.len(), 0);
    }
}
