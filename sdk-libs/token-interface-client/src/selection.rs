use crate::{constants::MAX_INPUT_ACCOUNTS, source::TokenAccountSource};

/// Picks the cold entries to consume for `needed`.
///
/// Entries are taken largest first until `needed` is covered. If that fits
/// in one chunk of `MAX_INPUT_ACCOUNTS`, the chunk is padded with the next
/// largest entries, which ride along on the same proof. Selections spanning
/// several chunks are not padded. If the total falls short every entry is
/// returned.
pub fn select_inputs_for_amount(
    entries: &[TokenAccountSource],
    needed: u64,
) -> Vec<TokenAccountSource> {
    if needed == 0 || entries.is_empty() {
        return Vec::new();
    }

    let mut sorted = entries.to_vec();
    // Stable, so equal amounts keep input order.
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));

    let mut accumulated: u128 = 0;
    let mut count = 0;
    for entry in &sorted {
        if accumulated >= needed as u128 {
            break;
        }
        accumulated += entry.amount as u128;
        count += 1;
    }

    let selected = if count <= MAX_INPUT_ACCOUNTS {
        MAX_INPUT_ACCOUNTS
    } else {
        count
    };
    sorted.truncate(selected);
    sorted
}
