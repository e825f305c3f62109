use hashbrown::HashMap;

/// Internal slot handle; stable across phone changes.
pub(crate) type SlotId = u64;

/// Grouping index from a key to the slots sharing it, in join order.
pub(crate) type BucketIndex = HashMap<String, Vec<SlotId>>;

pub(crate) fn link(index: &mut BucketIndex, key: &str, slot: SlotId) {
    match index.get_mut(key) {
        Some(bucket) => bucket.push(slot),
        None => {
            index.insert(key.to_string(), vec![slot]);
        }
    }
}

/// Removes `slot` from its bucket and drops the bucket once empty.
pub(crate) fn unlink(index: &mut BucketIndex, key: &str, slot: SlotId) {
    let Some(bucket) = index.get_mut(key) else {
        return;
    };
    if let Some(pos) = bucket.iter().position(|x| *x == slot) {
        bucket.remove(pos);
    }
    if bucket.is_empty() {
        index.remove(key);
    }
}
