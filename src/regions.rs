//! Upfront registration of signal region names

use std::collections::HashMap;

/// The signal regions of an analysis
///
/// Region names are fixed before any event is processed. Regions are not
/// mutually exclusive: one event may be counted in any number of them.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalRegions {
    names: Vec<String>,
    index: HashMap<String, usize>,
}
//
impl SignalRegions {
    /// Register a list of region names
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut regions = Self {
            names: Vec::new(),
            index: HashMap::new(),
        };
        for name in names {
            let name = name.into();
            assert!(!name.is_empty(), "Signal region names cannot be empty");
            let previous = regions.index.insert(name.clone(), regions.names.len());
            assert!(previous.is_none(), "Signal region {name:?} is declared twice");
            regions.names.push(name);
        }
        regions
    }

    /// Register regions from a semicolon-separated list, e.g. "SR1;SR2"
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(';').map(str::trim).filter(|name| !name.is_empty()))
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Truth that no region is registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registration index of a region
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the region with a given registration index
    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Region names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_lists() {
        let regions = SignalRegions::parse("mT2_90_SF; mT2_90_DF;;Zjets");
        let names: Vec<_> = regions.names().collect();
        assert_eq!(names, ["mT2_90_SF", "mT2_90_DF", "Zjets"]);
        assert_eq!(regions.position("Zjets"), Some(2));
        assert_eq!(regions.position("zjets"), None);
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicates_are_rejected() {
        SignalRegions::parse("SR;SR");
    }
}
