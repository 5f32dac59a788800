//! Alias resolution: folding surface speaker-name variants into canonical
//! names after normalization.

use tracing::debug;

use crate::models::{AliasMap, Record, SpeakerRun, TurnOrder};

/// Merge every speaker whose name matches an alias pattern into its
/// canonical name, rewriting the record in place.
///
/// An empty alias map is a no-op fast path: the record is untouched. When
/// a merge happens, the matched speaker's lines are placed before any
/// lines the canonical speaker already had. Speakers are visited in order
/// of first appearance, and within each the canonical names and their
/// patterns in registration order; the first match wins, so resolution is
/// sensitive to configuration order by design of the contract.
pub fn resolve(aliases: &AliasMap, record: &mut Record) {
    if aliases.is_empty() {
        return;
    }

    let mut merged = 0usize;
    for surface in record.speakers_in_order() {
        // A surface name matching its own canonical entry is not merged,
        // but a later canonical name can still claim it.
        let Some(canonical) = aliases.resolve_other(&surface) else {
            continue;
        };
        let canonical = canonical.to_string();
        let Some(lines) = record.speaker.remove(&surface) else {
            continue;
        };
        match record.speaker.get_mut(&canonical) {
            Some(existing) => {
                // Matched speaker's lines first, then the canonical's.
                let mut combined = lines;
                combined.append(existing);
                *existing = combined;
            }
            None => {
                record.speaker.insert(canonical, lines);
            }
        }
        merged += 1;
    }

    rewrite_order(aliases, &mut record.order);
    debug!(merged, "resolved speaker aliases");
}

/// Replace every order entry with its first matching canonical name.
/// Entries with no match are left as-is.
fn rewrite_order(aliases: &AliasMap, order: &mut TurnOrder) {
    match order {
        TurnOrder::Plain(names) => {
            for name in names.iter_mut() {
                if let Some(canonical) = aliases.resolve(name) {
                    *name = canonical.to_string();
                }
            }
        }
        TurnOrder::Concise(runs) => {
            for run in runs.iter_mut() {
                if let Some(canonical) = aliases.resolve(&run.speaker) {
                    run.speaker = canonical.to_string();
                }
            }
            // Rewriting can make adjacent runs name the same speaker;
            // re-coalesce to keep the encoding canonical.
            let mut coalesced: Vec<SpeakerRun> = Vec::with_capacity(runs.len());
            for run in runs.drain(..) {
                match coalesced.last_mut() {
                    Some(last) if last.speaker == run.speaker => last.count += run.count,
                    _ => coalesced.push(run),
                }
            }
            *runs = coalesced;
        }
    }
}
