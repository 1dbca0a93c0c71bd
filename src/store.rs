// File: src/store.rs
use crate::model::Medicine;

/// Insertion-ordered list of tracked medicines.
///
/// Only the most recently added entry can be removed.
#[derive(Debug, Clone, Default)]
pub struct MedicineList {
    pub medicines: Vec<Medicine>,
}

impl MedicineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(medicines: Vec<Medicine>) -> Self {
        Self { medicines }
    }

    /// Append a new medicine. Blank names are ignored.
    pub fn add(&mut self, name: &str) -> Option<Medicine> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let medicine = Medicine::new(name);
        self.medicines.push(medicine.clone());
        Some(medicine)
    }

    pub fn remove_last(&mut self) -> Option<Medicine> {
        self.medicines.pop()
    }

    pub fn get(&self, index: usize) -> Option<&Medicine> {
        self.medicines.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Medicine> {
        self.medicines.iter()
    }

    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }

    pub fn as_slice(&self) -> &[Medicine] {
        &self.medicines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_empty_name_is_noop() {
        let mut list = MedicineList::new();
        assert!(list.add("").is_none());
        assert!(list.add("   ").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut list = MedicineList::new();
        let a = list.add("Aspirin").expect("added");
        let b = list.add("Ibuprofen").expect("added");

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some(&a));
        assert_eq!(list.get(1), Some(&b));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove_last_is_lifo() {
        let mut list = MedicineList::new();
        list.add("A");
        list.add("B");
        list.add("C");

        let removed = list.remove_last().expect("removed");
        assert_eq!(removed.name, "C");
        let names: Vec<&str> = list.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_remove_last_on_empty_is_noop() {
        let mut list = MedicineList::new();
        assert!(list.remove_last().is_none());
        assert!(list.is_empty());
    }
}
