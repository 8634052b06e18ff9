// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Truncates the dataset to the configured subset and cuts it
// into a training prefix and a test suffix.
//
// There is NO shuffling: the split is reproducible from the
// file contents alone, so two runs over the same files always
// see the same test rows.
//
//   subset_size = 0     → keep every row
//   subset_size = n > 0 → keep the first n rows
//
// The boundary is 90% of the rows actually kept (integer
// floor), so a dataset shorter than subset_size still gets a
// proper 90/10 split instead of an empty test set.
//
// Example with 10 rows and subset_size = 10:
//   train = rows[0..9], test = rows[9..10]
//
// Reference: Rust Book §8 (Vectors)

/// Fraction of kept rows assigned to training, as numerator/denominator
const TRAIN_NUMERATOR:   usize = 9;
const TRAIN_DENOMINATOR: usize = 10;

/// Truncate `samples` to `subset_size` (0 = no truncation) and split
/// into (train, test) as an order-preserving prefix/suffix cut.
pub fn split_train_test<T>(mut samples: Vec<T>, subset_size: usize) -> (Vec<T>, Vec<T>) {
    if subset_size > 0 {
        samples.truncate(subset_size);
    }

    let total    = samples.len();
    let split_at = total * TRAIN_NUMERATOR / TRAIN_DENOMINATOR;

    // After split_off: samples = [0..split_at], test = [split_at..total]
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test (subset_size={})",
        samples.len(),
        test.len(),
        subset_size,
    );

    (samples, test)
}
