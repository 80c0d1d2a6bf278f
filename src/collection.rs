use serde::Serialize;
use std::ops::Index;

use crate::descriptor::TypeDescriptor;

/// Ordered sequence of descriptors. Insertion order is kept and duplicates are
/// allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DescriptorCollection {
    items: Vec<TypeDescriptor>,
}

impl DescriptorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: TypeDescriptor) {
        self.items.push(descriptor);
    }

    /// Appends `other` after the current items.
    pub fn merge(mut self, other: DescriptorCollection) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Keeps the descriptors for which `predicate` returns true, in order.
    pub fn filter<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&TypeDescriptor) -> bool,
    {
        self.items.retain(|d| predicate(d));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypeDescriptor> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&TypeDescriptor> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeDescriptor> {
        self.items.iter()
    }

    /// Fully-qualified names in collection order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(TypeDescriptor::name).collect()
    }

    pub fn into_vec(self) -> Vec<TypeDescriptor> {
        self.items
    }
}

impl Index<usize> for DescriptorCollection {
    type Output = TypeDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl FromIterator<TypeDescriptor> for DescriptorCollection {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<TypeDescriptor> for DescriptorCollection {
    fn extend<I: IntoIterator<Item = TypeDescriptor>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for DescriptorCollection {
    type Item = TypeDescriptor;
    type IntoIter = std::vec::IntoIter<TypeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DescriptorCollection {
    type Item = &'a TypeDescriptor;
    type IntoIter = std::slice::Iter<'a, TypeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
