/// A snapshot of a table's shape, for tuning load factors and hashers.
///
/// Returned by `ChainedTable::stats` and `OpenTable::stats` (and the map
/// wrappers). Compiled with the `stats` feature.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of values in the table
    pub len: usize,
    /// Number of buckets (chained) or slots (open addressing)
    pub table_size: usize,
    /// Number of values the table holds before it rehashes
    pub capacity: usize,
    /// Pool entries (chained) or occupied plus deleted slots (open addressing)
    pub occupation: usize,
    /// Load factor the table resizes at
    pub load_factor: f32,
    /// `len / table_size`
    pub fill_ratio: f64,
    /// Buckets with no chain (chained) or free slots (open addressing)
    pub empty_buckets: usize,
    /// Longest chain (chained) or longest run of non-free slots (open
    /// addressing)
    pub longest_run: usize,
    /// Heap bytes held by the table
    pub memory_bytes: usize,
}

impl TableStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% of capacity)",
            self.len,
            self.capacity,
            if self.capacity == 0 {
                0.0
            } else {
                self.len as f64 / self.capacity as f64 * 100.0
            }
        );
        println!(
            "Table: {} slots, {} empty, {:.2}% filled (load factor {:.2})",
            self.table_size,
            self.empty_buckets,
            self.fill_ratio * 100.0,
            self.load_factor
        );
        println!("Occupation: {}", self.occupation);
        println!("Longest run: {}", self.longest_run);
        println!("Total Allocated: {} bytes", self.memory_bytes);
    }
}

/// Prints `hist` as a horizontal bar chart, one row per bin.
#[cfg(feature = "std")]
pub(crate) fn print_histogram(title: &str, population: usize, hist: &[usize]) {
    let max = hist.iter().copied().max().unwrap_or(0);
    if max == 0 {
        println!("{title}: empty");
        return;
    }

    let max_bar = 60usize;
    let total_units = max_bar * 8;
    println!("{title} ({population} entries):");

    let make_bar = |count: usize| -> alloc::string::String {
        if count == 0 {
            return alloc::string::String::new();
        }
        let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
        let full = units / 8;
        let rem = units % 8;
        let mut bar = "█".repeat(full);
        if rem > 0 {
            let ch = match rem {
                1 => '▏',
                2 => '▎',
                3 => '▍',
                4 => '▌',
                5 => '▋',
                6 => '▊',
                7 => '▉',
                _ => unreachable!(),
            };
            bar.push(ch);
        }
        bar
    };

    for (i, &count) in hist.iter().enumerate() {
        println!("{i:>3} | {} ({count})", make_bar(count));
    }
}
