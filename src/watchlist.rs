use crate::chain::canonical_symbol;

/// In-memory, ordered list of symbols the UI tracks.
#[derive(Debug, Clone)]
pub struct Watchlist {
    defaults: Vec<String>,
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new(defaults: &[String]) -> Self {
        let mut list = Self {
            defaults: Vec::new(),
            symbols: Vec::new(),
        };
        for symbol in defaults {
            list.add(symbol);
        }
        list.defaults = list.symbols.clone();
        list
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// False if the symbol is blank or already tracked.
    pub fn add(&mut self, symbol: &str) -> bool {
        match canonical_symbol(symbol) {
            Some(symbol) if !self.symbols.contains(&symbol) => {
                self.symbols.push(symbol);
                true
            }
            _ => false,
        }
    }

    /// False if the symbol was not tracked.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let Some(symbol) = canonical_symbol(symbol) else {
            return false;
        };
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        self.symbols.len() != before
    }

    /// Tracked and default symbols containing `query`, tracked ones first.
    pub fn search(&self, query: &str) -> Vec<String> {
        let Some(query) = canonical_symbol(query) else {
            return Vec::new();
        };
        let mut matches: Vec<String> = Vec::new();
        for symbol in self.symbols.iter().chain(&self.defaults) {
            if symbol.contains(&query) && !matches.contains(symbol) {
                matches.push(symbol.clone());
            }
        }
        matches
    }
}
