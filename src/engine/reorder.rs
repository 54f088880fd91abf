/// Removes the item at `from` and inserts it at `to` in the shortened list.
///
/// Moving forward therefore lands the item at `to` as counted after the
/// removal: `[A, B, C, D]` with `from = 0, to = 3` gives `[B, C, D, A]`.
/// Either index outside `0..len` leaves the order untouched.
pub fn move_item<T: Clone>(seq: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = seq.to_vec();
    if from >= seq.len() || to >= seq.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    out.insert(to, item);
    out
}
