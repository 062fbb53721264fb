use tracing::debug;

/// The only way to mutate a [`Store`].
#[derive(Debug, Clone)]
pub enum Command<T> {
    Insert(T),
    Update { index: usize, item: T },
    Remove { index: usize },
    Replace(Vec<T>),
    Clear,
}

/// An owned, explicitly versioned collection with a single writer. Every
/// accepted command bumps the version; readers compare versions to decide
/// whether a derived view needs recomputing.
#[derive(Debug, Default)]
pub struct Store<T> {
    items: Vec<T>,
    version: u64,
}

impl<T> Store<T> {
    pub fn new(items: Vec<T>) -> Self {
        Store { items, version: 0 }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies a command and returns the new version, or `None` when the
    /// command addresses an index that does not exist. Rejected commands do
    /// not bump the version.
    pub fn apply(&mut self, command: Command<T>) -> Option<u64> {
        match command {
            Command::Insert(item) => self.items.push(item),
            Command::Update { index, item } => {
                let slot = self.items.get_mut(index)?;
                *slot = item;
            }
            Command::Remove { index } => {
                if index >= self.items.len() {
                    return None;
                }
                self.items.remove(index);
            }
            Command::Replace(items) => self.items = items,
            Command::Clear => self.items.clear(),
        }
        self.version += 1;
        debug!("Store advanced to version {}", self.version);
        Some(self.version)
    }
}
