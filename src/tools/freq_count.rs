use rustc_hash::FxHashMap;

/// Returns a frequency count of every char in the text.
pub fn freqs(text: &str) -> FxHashMap<char, u64> {
    let mut freqs = FxHashMap::default();
    text.chars().for_each(|ch| *freqs.entry(ch).or_insert(0) += 1);
    freqs
}
