//! Rotating turn order with deferred elimination.

/// Ordered ring of participants that rotates after every lap.
///
/// Eliminated participants are skipped immediately but only removed from the
/// underlying list once the cursor wraps around, at which point the list is
/// also rotated by the configured amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle<T> {
    elements: Vec<T>,
    rotation: i32,
    position: usize,
    eliminations: Vec<T>,
}

impl<T: Clone + PartialEq> Cycle<T> {
    /// Creates a cycle starting at the first element.
    ///
    /// A positive rotation shifts elements towards the end of the list at
    /// every lap boundary, a negative one towards the front.
    #[must_use]
    pub fn new(elements: Vec<T>, rotation: i32) -> Self {
        Self {
            elements,
            rotation,
            position: 0,
            eliminations: Vec::new(),
        }
    }

    /// Element at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.elements.get(self.position)
    }

    /// Index of the cursor within the current lap.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of elements still stored, including pending eliminations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Reports whether no element is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in their current lap order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter()
    }

    /// Moves the cursor to the next participant that is not eliminated.
    ///
    /// Returns `true` when the lap wrapped around. Does nothing when every
    /// element is pending elimination.
    pub fn advance(&mut self) -> bool {
        if self
            .elements
            .iter()
            .all(|element| self.eliminations.contains(element))
        {
            return false;
        }

        loop {
            self.position += 1;
            match self.elements.get(self.position) {
                Some(element) if self.eliminations.contains(element) => continue,
                _ => break,
            }
        }

        if self.position < self.elements.len() {
            return false;
        }

        self.position = 0;
        let len = i32::try_from(self.elements.len()).unwrap_or(i32::MAX);
        let shift = usize::try_from(self.rotation.rem_euclid(len)).unwrap_or(0);
        self.elements.rotate_right(shift);
        let eliminations = &self.eliminations;
        self.elements.retain(|element| !eliminations.contains(element));
        true
    }

    /// Replaces the set of participants pending elimination.
    pub fn eliminate(&mut self, eliminations: Vec<T>) {
        self.eliminations = eliminations;
    }
}
