//! Recency List Module
//!
//! Arena-backed doubly linked list ordering entries from most to least
//! recently used.

use crate::cache::entry::{Entry, Slot};

// == Recency List ==
/// Owns every cache entry and keeps them in recency order.
///
/// Entries live in a `Vec` arena and link to each other by slot index, so
/// the list can be doubly linked without shared ownership:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Slots released by `remove` are recycled by later inserts. Every
/// operation is O(1).
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    /// Entry arena, `None` marks a free slot
    slots: Vec<Option<Entry<K, V>>>,
    /// Free slots available for reuse
    free: Vec<Slot>,
    /// Most recently used entry
    head: Option<Slot>,
    /// Least recently used entry
    tail: Option<Slot>,
    /// Number of linked entries
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new entry at the head and returns its slot.
    ///
    /// On an empty list the entry becomes both head and tail.
    pub fn push_front(&mut self, mut entry: Entry<K, V>) -> Slot {
        entry.prev = None;
        entry.next = self.head;

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.entry_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks an entry as most recently used. No-op if it is already the head.
    pub fn move_to_front(&mut self, slot: Slot) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);

        let old_head = self.head;
        {
            let entry = self.entry_mut(slot);
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(old_head) => self.entry_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    // == Remove ==
    /// Detaches an entry and releases its slot, returning the entry.
    pub fn remove(&mut self, slot: Slot) -> Entry<K, V> {
        self.unlink(slot);
        let mut entry = self.slots[slot]
            .take()
            .unwrap_or_else(|| panic!("recency slot {slot} is vacant"));
        entry.prev = None;
        entry.next = None;
        self.free.push(slot);
        self.len -= 1;
        entry
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<Entry<K, V>> {
        let slot = self.tail?;
        Some(self.remove(slot))
    }

    // == Accessors ==
    pub fn get(&self, slot: Slot) -> Option<&Entry<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    #[allow(dead_code)]
    pub fn head(&self) -> Option<Slot> {
        self.head
    }

    #[allow(dead_code)]
    pub fn tail(&self) -> Option<Slot> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every entry and resets the list to empty.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Iterates entries from least to most recently used.
    #[allow(dead_code)]
    pub fn iter_rev(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let entry = self.get(cursor?)?;
            cursor = entry.prev;
            Some(entry)
        })
    }

    /// Relinks the neighbours of `slot` around it, fixing head and tail.
    fn unlink(&mut self, slot: Slot) {
        let (prev, next) = {
            let entry = self.entry_mut(slot);
            (entry.prev.take(), entry.next.take())
        };
        match prev {
            Some(prev) => self.entry_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.entry_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    fn entry_mut(&mut self, slot: Slot) -> &mut Entry<K, V> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| panic!("recency slot {slot} is vacant"))
    }
}

// == Iterator ==
/// Iterator over entries from most to least recently used.
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<Slot>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next;
        Some(entry)
    }
}
