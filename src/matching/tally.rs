/// Frequency count over symbols that remembers first-seen order.
///
/// `most_frequent` breaks ties by whichever symbol was seen first, so the
/// same hits always produce the same winner.
#[derive(Debug, Default)]
pub struct SymbolTally<'a> {
    counts: Vec<(&'a str, usize)>,
}

impl<'a> SymbolTally<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, symbol: &'a str) {
        match self.counts.iter_mut().find(|(seen, _)| *seen == symbol) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((symbol, 1)),
        }
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.counts
            .iter()
            .find(|(seen, _)| *seen == symbol)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Highest count wins; empty symbols never do.
    pub fn most_frequent(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for &(symbol, count) in &self.counts {
            if symbol.is_empty() {
                continue;
            }
            // Strict `>` keeps the earliest symbol on ties.
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((symbol, count));
            }
        }
        best.map(|(symbol, _)| symbol)
    }
}

impl<'a> FromIterator<&'a str> for SymbolTally<'a> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Self::new();
        for symbol in iter {
            tally.record(symbol);
        }
        tally
    }
}
